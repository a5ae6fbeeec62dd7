//! The subscription service.
//!
//! Every mutation runs the same sequence: persist, invalidate the owner's
//! cached summaries, emit an event. Only the persist step can fail the call.
//! Once a write is submitted it is awaited to the end, and the follow-up steps
//! run under their own context so a caller that ran out of time still leaves
//! the cache coherent.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use subtrack_core::events::{encode_payload, Publisher};
use subtrack_core::storage::SubscriptionRepository;
use subtrack_core::subscription::{
    DeletedPayload, NewSubscription, Subscription, SubscriptionEventKind, SummaryQuery,
    SUBSCRIPTIONS_DESTINATION,
};

use super::{CallContext, Result, ServiceError};
use crate::cache::SummaryCache;

/// Time allowed for cache invalidation after a committed write.
const FOLLOWUP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepository>,
    summaries: SummaryCache,
    publisher: Arc<dyn Publisher>,
}

impl SubscriptionService {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        summaries: SummaryCache,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            repository,
            summaries,
            publisher,
        }
    }

    pub async fn create(&self, ctx: &CallContext, new: NewSubscription) -> Result<Subscription> {
        let created = ctx.commit(self.repository.create(&new)).await??;
        debug!(id = created.id, user_id = %created.user_id, "Created subscription");

        self.summaries.invalidate(&followup(), &created.user_id).await;
        self.emit(SubscriptionEventKind::Created, &created);

        Ok(created)
    }

    /// Saves the mutable fields of `subscription`.
    ///
    /// The owner is taken from the stored record, not from the argument.
    pub async fn update(&self, ctx: &CallContext, subscription: &Subscription) -> Result<Subscription> {
        let updated = ctx.commit(self.repository.update(subscription)).await??;
        debug!(id = updated.id, user_id = %updated.user_id, "Updated subscription");

        self.summaries.invalidate(&followup(), &updated.user_id).await;
        self.emit(SubscriptionEventKind::Updated, &updated);

        Ok(updated)
    }

    /// Deletes a subscription.
    ///
    /// Without a `user_id` the owner is looked up first. If that lookup fails
    /// the owner is recorded as `""`.
    pub async fn delete(&self, ctx: &CallContext, id: i64, user_id: Option<&str>) -> Result<()> {
        let owner = match user_id.filter(|u| !u.is_empty()) {
            Some(user_id) => user_id.to_string(),
            None => self.lookup_owner(ctx, id).await,
        };

        ctx.commit(self.repository.delete(id)).await??;
        debug!(id, user_id = %owner, "Deleted subscription");

        self.summaries.invalidate(&followup(), &owner).await;
        self.emit(SubscriptionEventKind::Deleted, &DeletedPayload::new(id, owner));

        Ok(())
    }

    pub async fn get(&self, ctx: &CallContext, id: i64) -> Result<Subscription> {
        Ok(ctx.run(self.repository.get_by_id(id)).await??)
    }

    pub async fn list(&self, ctx: &CallContext, user_id: &str) -> Result<Vec<Subscription>> {
        Ok(ctx.run(self.repository.list(user_id)).await??)
    }

    /// Total price of the user's subscriptions active within the query range.
    pub async fn summary(&self, ctx: &CallContext, query: &SummaryQuery) -> Result<i64> {
        self.summaries
            .get_or_compute(
                ctx,
                &query.user_id,
                &query.service_name,
                &query.from,
                &query.to,
                move || async move {
                    let range = query.range()?;
                    let total = ctx
                        .run(self.repository.summary(&query.user_id, &query.service_name, range))
                        .await??;
                    Ok::<_, ServiceError>(total)
                },
            )
            .await
    }

    async fn lookup_owner(&self, ctx: &CallContext, id: i64) -> String {
        match ctx.run(self.repository.get_by_id(id)).await {
            Ok(Ok(subscription)) => subscription.user_id,
            Ok(Err(e)) => {
                warn!(id, error = %e, "Could not look up subscription owner");
                String::new()
            }
            Err(e) => {
                warn!(id, error = %e, "Subscription owner lookup interrupted");
                String::new()
            }
        }
    }

    fn emit<T: serde::Serialize>(&self, kind: SubscriptionEventKind, payload: &T) {
        let result = encode_payload(payload).and_then(|bytes| {
            self.publisher
                .publish(SUBSCRIPTIONS_DESTINATION, kind.classifier(), bytes)
        });
        if let Err(e) = result {
            error!(classifier = kind.classifier(), error = %e, "Failed to publish subscription event");
        }
    }
}

fn followup() -> CallContext {
    CallContext::with_timeout(FOLLOWUP_TIMEOUT)
}
