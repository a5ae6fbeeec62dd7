use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MonthYear;
use crate::serde::deserialize_optional_month_year;

/// One user's recurring paid service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Assigned by storage on creation.
    pub id: i64,
    pub service_name: String,
    /// Price in minor currency units.
    pub price: i64,
    /// Opaque owner identifier.
    pub user_id: String,
    pub start_date: MonthYear,
    /// `None` means the subscription is still active.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_month_year"
    )]
    pub end_date: Option<MonthYear>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Materializes a new subscription with storage-assigned fields.
    pub fn from_new(id: i64, new: NewSubscription, now: DateTime<Utc>) -> Self {
        Self {
            id,
            service_name: new.service_name,
            price: new.price,
            user_id: new.user_id,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the subscription has no end date.
    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }
}

/// A subscription that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: MonthYear,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_month_year"
    )]
    pub end_date: Option<MonthYear>,
}

impl NewSubscription {
    pub fn new(
        service_name: impl Into<String>,
        price: i64,
        user_id: impl Into<String>,
        start_date: MonthYear,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            price,
            user_id: user_id.into(),
            start_date,
            end_date: None,
        }
    }

    /// Sets the end date.
    pub fn with_end_date(mut self, end_date: MonthYear) -> Self {
        self.end_date = Some(end_date);
        self
    }
}
