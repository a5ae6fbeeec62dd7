//! Request types for subscription operations.
//!
//! Dates arrive as raw `MM-YYYY` text and are parsed here, so every caller
//! gets the same `FormatError` for malformed input.

use serde::{Deserialize, Serialize};

use super::{normalize_range, FormatError, MonthYear, NewSubscription, RangeError, Subscription, SummaryRange};

fn parse_optional(text: Option<&str>) -> Result<Option<MonthYear>, FormatError> {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => MonthYear::parse(text).map(Some),
        _ => Ok(None),
    }
}

/// Request payload for creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl CreateSubscriptionRequest {
    pub fn new(
        service_name: impl Into<String>,
        price: i64,
        user_id: impl Into<String>,
        start_date: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            price,
            user_id: user_id.into(),
            start_date: start_date.into(),
            end_date: None,
        }
    }

    /// Set the end date text.
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Parses the dates and converts into a NewSubscription.
    pub fn into_new_subscription(self) -> Result<NewSubscription, FormatError> {
        let start_date = MonthYear::parse(self.start_date.trim())?;
        let end_date = parse_optional(self.end_date.as_deref())?;
        Ok(NewSubscription {
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date,
            end_date,
        })
    }
}

/// Request payload for updating a subscription.
///
/// Absent fields keep their stored value. An empty `end_date` clears it,
/// turning the subscription back into an active one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl UpdateSubscriptionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Returns a copy of `existing` with the requested changes applied.
    ///
    /// `id`, `user_id` and the timestamps are carried over untouched.
    pub fn apply_to(self, existing: &Subscription) -> Result<Subscription, FormatError> {
        let mut updated = existing.clone();
        if let Some(service_name) = self.service_name {
            updated.service_name = service_name;
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if let Some(start_date) = self.start_date {
            updated.start_date = MonthYear::parse(start_date.trim())?;
        }
        if self.end_date.is_some() {
            updated.end_date = parse_optional(self.end_date.as_deref())?;
        }
        Ok(updated)
    }
}

/// Query parameters for a spend summary.
///
/// `from` and `to` stay as raw text; they are part of the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryQuery {
    pub user_id: String,
    /// Empty matches every service.
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl SummaryQuery {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    /// Normalizes the raw bounds.
    pub fn range(&self) -> Result<SummaryRange, RangeError> {
        normalize_range(&self.from, &self.to)
    }
}
