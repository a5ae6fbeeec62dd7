//! Month-granularity dates.
//!
//! A [`MonthYear`] is a UTC timestamp pinned to midnight on the first day of a
//! month. Its textual form is `MM-YYYY`, e.g. `07-2025`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::FormatError;

/// A calendar month.
///
/// Every constructor normalizes to day 1, 00:00:00 UTC, so equality and
/// ordering only depend on the year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(DateTime<Utc>);

impl MonthYear {
    /// Creates a month from a year and a 1-based month number.
    ///
    /// Returns `None` if the month is out of range or the year is not
    /// representable.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::from_first_day)
    }

    /// The zero value (`01-0001`), used for empty input.
    pub fn zero() -> Self {
        Self::from_first_day(NaiveDate::from_ymd_opt(1, 1, 1).expect("0001-01-01 is a valid date"))
    }

    /// The latest month used as an open upper bound (`12-9999`).
    pub fn max_value() -> Self {
        Self::from_first_day(
            NaiveDate::from_ymd_opt(9999, 12, 1).expect("9999-12-01 is a valid date"),
        )
    }

    /// Truncates a timestamp to the start of its month.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let first = NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1).unwrap_or(dt.date_naive());
        Self::from_first_day(first)
    }

    fn from_first_day(date: NaiveDate) -> Self {
        Self(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }

    /// Parses `MM-YYYY`. The empty string yields [`MonthYear::zero`].
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        if text.is_empty() {
            return Ok(Self::zero());
        }

        let invalid = || FormatError::new(text);
        let (month, year) = text.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 || !all_digits(month) || !all_digits(year) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    /// Renders `MM-YYYY`.
    pub fn format(&self) -> String {
        self.to_string()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the underlying timestamp.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns true for the value produced by empty input.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl Default for MonthYear {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.0.month(), self.0.year())
    }
}

impl FromStr for MonthYear {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<MonthYear> for DateTime<Utc> {
    fn from(value: MonthYear) -> Self {
        value.0
    }
}

impl Serialize for MonthYear {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        let my = MonthYear::parse("07-2025").unwrap();
        assert_eq!(my.as_datetime(), utc(2025, 7, 1));
        assert_eq!(my.year(), 2025);
        assert_eq!(my.month(), 7);
    }

    #[test]
    fn test_format_parse_is_identity_for_valid_text() {
        for text in ["01-2025", "07-2025", "12-1999", "02-0001", "09-9999", "10-0950"] {
            assert_eq!(MonthYear::parse(text).unwrap().format(), text);
        }
    }

    #[test]
    fn test_parse_empty_is_zero() {
        let my = MonthYear::parse("").unwrap();
        assert!(my.is_zero());
        assert_eq!(my.as_datetime(), utc(1, 1, 1));
        assert_eq!(my, MonthYear::default());
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        for text in [
            "13-2025", "00-2025", "2025-07", "7-2025", "07-25", "07/2025", "07-2025 ", "ab-2025",
            "07-+025", "-",
        ] {
            let err = MonthYear::parse(text).unwrap_err();
            assert_eq!(err.input(), text);
            assert!(err.to_string().contains("MM-YYYY"));
        }
    }

    #[test]
    fn test_from_datetime_truncates_to_month() {
        let dt = Utc.with_ymd_and_hms(2024, 2, 29, 17, 45, 12).unwrap();
        let my = MonthYear::from_datetime(dt);
        assert_eq!(my.as_datetime(), utc(2024, 2, 1));
        assert_eq!(my.to_string(), "02-2024");
    }

    #[test]
    fn test_equality_and_ordering_use_month() {
        let a = MonthYear::new(2025, 7).unwrap();
        let b = MonthYear::from_datetime(Utc.with_ymd_and_hms(2025, 7, 19, 8, 0, 0).unwrap());
        let c = MonthYear::new(2025, 8).unwrap();
        assert_eq!(a, b);
        assert!(a < c);
        assert!(MonthYear::zero() < a);
        assert!(c < MonthYear::max_value());
    }

    #[test]
    fn test_new_rejects_invalid_month() {
        assert!(MonthYear::new(2025, 0).is_none());
        assert!(MonthYear::new(2025, 13).is_none());
    }

    #[test]
    fn test_serde_round_trip_uses_text_form() {
        let my = MonthYear::new(2025, 3).unwrap();
        let json = serde_json::to_string(&my).unwrap();
        assert_eq!(json, r#""03-2025""#);

        let back: MonthYear = serde_json::from_str(&json).unwrap();
        assert_eq!(back, my);
    }

    #[test]
    fn test_deserialize_empty_string_is_zero() {
        let my: MonthYear = serde_json::from_str(r#""""#).unwrap();
        assert!(my.is_zero());
    }

    #[test]
    fn test_deserialize_invalid_text_fails() {
        let result: Result<MonthYear, _> = serde_json::from_str(r#""2025-07""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_str() {
        let my: MonthYear = "11-2030".parse().unwrap();
        assert_eq!(my, MonthYear::new(2030, 11).unwrap());
    }
}
