//! Pure validation and aggregation rules for subscriptions.

use super::{MonthYear, NewSubscription, Subscription, SummaryRange, ValidationError};

/// Validates a subscription before it is persisted.
pub fn validate_new_subscription(new: &NewSubscription) -> Result<(), ValidationError> {
    validate_fields(
        &new.service_name,
        new.price,
        &new.user_id,
        new.start_date,
        new.end_date,
    )
}

/// Validates an existing subscription before it is updated.
pub fn validate_subscription(sub: &Subscription) -> Result<(), ValidationError> {
    validate_fields(
        &sub.service_name,
        sub.price,
        &sub.user_id,
        sub.start_date,
        sub.end_date,
    )
}

fn validate_fields(
    service_name: &str,
    price: i64,
    user_id: &str,
    start_date: MonthYear,
    end_date: Option<MonthYear>,
) -> Result<(), ValidationError> {
    if service_name.trim().is_empty() {
        return Err(ValidationError::EmptyServiceName);
    }
    if price < 0 {
        return Err(ValidationError::NegativePrice(price));
    }
    if user_id.trim().is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    if start_date.is_zero() {
        return Err(ValidationError::MissingStartDate);
    }
    if end_date.is_some_and(|end| end < start_date) {
        return Err(ValidationError::EndBeforeStart);
    }
    Ok(())
}

/// Returns true if a subscription running from `start` to `end` (inclusive,
/// `None` = still active) intersects the range.
pub fn overlaps_range(start: MonthYear, end: Option<MonthYear>, range: &SummaryRange) -> bool {
    start.as_datetime() <= range.to && end.is_none_or(|end| end.as_datetime() >= range.from)
}

/// Sums the price of every subscription matching the filter and range.
///
/// An empty `service_name` matches every service. Returns `None` if the
/// total does not fit in an `i64`.
pub fn summarize<'a>(
    subscriptions: impl IntoIterator<Item = &'a Subscription>,
    service_name: &str,
    range: &SummaryRange,
) -> Option<i64> {
    subscriptions
        .into_iter()
        .filter(|s| service_name.is_empty() || s.service_name == service_name)
        .filter(|s| overlaps_range(s.start_date, s.end_date, range))
        .try_fold(0i64, |total, s| total.checked_add(s.price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::normalize_range;
    use chrono::Utc;

    fn my(month: u32, year: i32) -> MonthYear {
        MonthYear::new(year, month).unwrap()
    }

    fn sub(id: i64, service: &str, price: i64, start: MonthYear, end: Option<MonthYear>) -> Subscription {
        let mut new = NewSubscription::new(service, price, "u1", start);
        new.end_date = end;
        Subscription::from_new(id, new, Utc::now())
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let new = NewSubscription::new("Spotify", 299, "u1", my(1, 2025)).with_end_date(my(1, 2025));
        assert_eq!(validate_new_subscription(&new), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let base = NewSubscription::new("Spotify", 299, "u1", my(3, 2025));

        let mut new = base.clone();
        new.service_name = "  ".to_string();
        assert_eq!(validate_new_subscription(&new), Err(ValidationError::EmptyServiceName));

        let mut new = base.clone();
        new.price = -1;
        assert_eq!(validate_new_subscription(&new), Err(ValidationError::NegativePrice(-1)));

        let mut new = base.clone();
        new.user_id = String::new();
        assert_eq!(validate_new_subscription(&new), Err(ValidationError::EmptyUserId));

        let mut new = base.clone();
        new.start_date = MonthYear::zero();
        assert_eq!(validate_new_subscription(&new), Err(ValidationError::MissingStartDate));

        let new = base.with_end_date(my(2, 2025));
        assert_eq!(validate_new_subscription(&new), Err(ValidationError::EndBeforeStart));
    }

    #[test]
    fn test_validate_existing_subscription() {
        let mut s = sub(1, "Netflix", 100, my(5, 2025), None);
        assert_eq!(validate_subscription(&s), Ok(()));
        s.end_date = Some(my(4, 2025));
        assert_eq!(validate_subscription(&s), Err(ValidationError::EndBeforeStart));
    }

    #[test]
    fn test_overlaps_range() {
        let range = normalize_range("03-2025", "06-2025").unwrap();

        // Active subscription started before the range end
        assert!(overlaps_range(my(1, 2024), None, &range));
        // Starts after the range
        assert!(!overlaps_range(my(7, 2025), None, &range));
        // Ended before the range starts
        assert!(!overlaps_range(my(1, 2025), Some(my(2, 2025)), &range));
        // Touches the lower bound exactly
        assert!(overlaps_range(my(1, 2025), Some(my(3, 2025)), &range));
        // Touches the upper bound exactly
        assert!(overlaps_range(my(6, 2025), Some(my(9, 2025)), &range));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = normalize_range("12-2025", "01-2025").unwrap();
        assert!(!overlaps_range(my(6, 2025), None, &range));
        assert!(!overlaps_range(my(1, 2025), Some(my(12, 2025)), &range));
    }

    #[test]
    fn test_summarize_filters_by_service_and_range() {
        let subs = vec![
            sub(1, "Netflix", 100, my(1, 2025), None),
            sub(2, "Spotify", 50, my(1, 2025), Some(my(2, 2025))),
            sub(3, "Netflix", 25, my(9, 2025), None),
        ];
        let range = normalize_range("03-2025", "06-2025").unwrap();

        assert_eq!(summarize(&subs, "", &range), Some(100));
        assert_eq!(summarize(&subs, "Spotify", &range), Some(0));

        let all = SummaryRange::unbounded();
        assert_eq!(summarize(&subs, "", &all), Some(175));
        assert_eq!(summarize(&subs, "Netflix", &all), Some(125));
    }

    #[test]
    fn test_summarize_overflow() {
        let subs = vec![
            sub(1, "Netflix", i64::MAX, my(1, 2025), None),
            sub(2, "Netflix", 1, my(1, 2025), None),
        ];
        let all = SummaryRange::unbounded();

        assert_eq!(summarize(&subs, "", &all), None);
        assert_eq!(summarize(&subs[..1], "", &all), Some(i64::MAX));
    }
}
