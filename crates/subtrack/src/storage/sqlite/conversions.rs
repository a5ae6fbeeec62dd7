//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;

use subtrack_core::subscription::{MonthYear, Subscription};

/// Convert a SQLite row to a Subscription.
///
/// Expected columns: id, service_name, price, user_id, start_date, end_date, created_at, updated_at
pub fn row_to_subscription(row: &Row) -> rusqlite::Result<Subscription> {
    let id: i64 = row.get(0)?;
    let service_name: String = row.get(1)?;
    let price: i64 = row.get(2)?;
    let user_id: String = row.get(3)?;
    let start_date: String = row.get(4)?;
    let end_date: Option<String> = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Subscription {
        id,
        service_name,
        price,
        user_id,
        start_date: parse_month(4, &start_date)?,
        end_date: end_date.map(|s| parse_month(5, &s)).transpose()?,
        created_at: parse_datetime(6, &created_at)?,
        updated_at: parse_datetime(7, &updated_at)?,
    })
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse a month column stored as `YYYY-MM-DD`. The day is ignored.
fn parse_month(column: usize, s: &str) -> rusqlite::Result<MonthYear> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| conversion_error(column, e))?;
    MonthYear::new(date.year(), date.month()).ok_or_else(|| {
        conversion_error(
            column,
            std::io::Error::other(format!("month out of range: {s}")),
        )
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

/// Format a month for SQLite storage (YYYY-MM-01).
pub fn format_month(month: MonthYear) -> String {
    format_timestamp_date(&month.as_datetime())
}

/// Format a range bound for comparison against month columns.
pub fn format_timestamp_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Format a DateTime for SQLite storage.
///
/// Fixed microsecond precision keeps the text sortable.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
