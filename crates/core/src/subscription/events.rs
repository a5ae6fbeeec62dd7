//! Notification payloads emitted after subscription mutations.

use serde::{Deserialize, Serialize};

/// Logical destination for every subscription event.
pub const SUBSCRIPTIONS_DESTINATION: &str = "subscriptions";

/// Which mutation an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionEventKind {
    Created,
    Updated,
    Deleted,
}

impl SubscriptionEventKind {
    /// Routing classifier sent alongside the payload.
    pub fn classifier(&self) -> &'static str {
        match self {
            SubscriptionEventKind::Created => "created",
            SubscriptionEventKind::Updated => "updated",
            SubscriptionEventKind::Deleted => "deleted",
        }
    }
}

/// Payload of a `deleted` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPayload {
    pub id: i64,
    pub user_id: String,
}

impl DeletedPayload {
    pub fn new(id: i64, user_id: impl Into<String>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
        }
    }
}
