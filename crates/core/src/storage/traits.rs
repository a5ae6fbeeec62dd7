use async_trait::async_trait;

use crate::subscription::{NewSubscription, Subscription, SummaryRange};

use super::Result;

/// Repository for subscription operations.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Gets a subscription by its ID. Missing rows are `RepositoryError::NotFound`.
    async fn get_by_id(&self, id: i64) -> Result<Subscription>;

    /// Persists a new subscription and returns it with storage-assigned fields.
    async fn create(&self, new: &NewSubscription) -> Result<Subscription>;

    /// Updates the mutable fields of an existing subscription.
    ///
    /// `user_id` and `created_at` are never changed; `updated_at` is refreshed.
    async fn update(&self, subscription: &Subscription) -> Result<Subscription>;

    /// Deletes a subscription by its ID.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Lists a user's subscriptions, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<Subscription>>;

    /// Sums the price of the user's subscriptions active within `range`.
    ///
    /// An empty `service_name` matches every service.
    async fn summary(&self, user_id: &str, service_name: &str, range: SummaryRange) -> Result<i64>;
}
