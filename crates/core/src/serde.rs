//! Serde helper functions for optional month/year fields.
//!
//! JSON clients send `""` or `null` for "no end date"; both mean `None`.

use serde::{Deserialize, Deserializer};

use crate::subscription::MonthYear;

/// Deserialize an optional MonthYear, treating empty strings as None.
/// Expects format: MM-YYYY
pub fn deserialize_optional_month_year<'de, D>(
    deserializer: D,
) -> Result<Option<MonthYear>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => MonthYear::parse(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_optional_month_year")]
        end_date: Option<MonthYear>,
    }

    #[test]
    fn test_deserialize_optional_month_year_value() {
        let json = r#"{"end_date": "12-2025"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.end_date, MonthYear::new(2025, 12));
    }

    #[test]
    fn test_deserialize_optional_month_year_empty() {
        let json = r#"{"end_date": ""}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.end_date, None);
    }

    #[test]
    fn test_deserialize_optional_month_year_null() {
        let json = r#"{"end_date": null}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.end_date, None);
    }

    #[test]
    fn test_deserialize_optional_month_year_missing() {
        let result: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(result.end_date, None);
    }

    #[test]
    fn test_deserialize_optional_month_year_invalid() {
        let json = r#"{"end_date": "2025-12"}"#;
        let result: Result<TestStruct, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
