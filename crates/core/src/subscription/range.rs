use chrono::{DateTime, Utc};

use super::{MonthYear, RangeError};

/// An inclusive timestamp interval for summary queries.
///
/// `from > to` is allowed; such a range simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl SummaryRange {
    /// The range covering every representable month.
    pub fn unbounded() -> Self {
        Self {
            from: MonthYear::zero().as_datetime(),
            to: MonthYear::max_value().as_datetime(),
        }
    }
}

/// Turns two optional `MM-YYYY` bounds into a concrete range.
///
/// An empty `from` becomes `0001-01-01T00:00:00Z` and an empty `to` becomes
/// `9999-12-01T00:00:00Z`.
pub fn normalize_range(from: &str, to: &str) -> Result<SummaryRange, RangeError> {
    let bound = |text: &str, open: MonthYear| -> Result<DateTime<Utc>, RangeError> {
        if text.is_empty() {
            return Ok(open.as_datetime());
        }
        MonthYear::parse(text)
            .map(|my| my.as_datetime())
            .map_err(|source| RangeError {
                from: from.to_string(),
                to: to.to_string(),
                source,
            })
    };

    Ok(SummaryRange {
        from: bound(from, MonthYear::zero())?,
        to: bound(to, MonthYear::max_value())?,
    })
}
