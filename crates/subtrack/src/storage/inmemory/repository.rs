//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use subtrack_core::storage::{RepositoryError, Result, SubscriptionRepository};
use subtrack_core::subscription::{summarize, NewSubscription, Subscription, SummaryRange};

#[derive(Debug, Default)]
struct Table {
    rows: HashMap<i64, Subscription>,
    last_id: i64,
}

/// In-memory storage backend for testing.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryRepository {
    async fn get_by_id(&self, id: i64) -> Result<Subscription> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::subscription_not_found(id))
    }

    async fn create(&self, new: &NewSubscription) -> Result<Subscription> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let subscription = Subscription::from_new(table.last_id, new.clone(), Utc::now());
        table.rows.insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn update(&self, subscription: &Subscription) -> Result<Subscription> {
        let mut table = self.table.write().await;
        let stored = table
            .rows
            .get_mut(&subscription.id)
            .ok_or_else(|| RepositoryError::subscription_not_found(subscription.id))?;

        stored.service_name = subscription.service_name.clone();
        stored.price = subscription.price;
        stored.start_date = subscription.start_date;
        stored.end_date = subscription.end_date;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::subscription_not_found(id))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Subscription>> {
        let table = self.table.read().await;
        let mut subscriptions: Vec<Subscription> = table
            .rows
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(subscriptions)
    }

    async fn summary(&self, user_id: &str, service_name: &str, range: SummaryRange) -> Result<i64> {
        let table = self.table.read().await;
        let owned = table.rows.values().filter(|s| s.user_id == user_id);
        summarize(owned, service_name, &range)
            .ok_or_else(|| RepositoryError::QueryFailed("integer overflow".to_string()))
    }
}
