//! Shared Serde deserializers
//!
//! Bus descriptions come from hand-written YAML and from device discovery
//! responses, so numeric identifiers arrive in several shapes:
//! - `null` → None
//! - `""` (empty string) → None
//! - String number `"123"` → Some(123)
//! - Native number `123` → Some(123)

use serde::{Deserialize, Deserializer};

/// Deserialize an optional i64 identifier from null, empty string, string
/// number or native number
///
/// # Example
/// ```ignore
/// #[derive(Deserialize)]
/// struct Record {
///     #[serde(default, deserialize_with = "deserialize_optional_i64")]
///     datasetid: Option<i64>,
/// }
/// ```
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    match Option::<StringOrInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrInt::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrInt::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: {}", s))),
        Some(StringOrInt::Int(i)) => Ok(Some(i)),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // unwrap is acceptable in tests
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct TestRecord {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        value: Option<i64>,
    }

    #[test]
    fn test_null() {
        let record: TestRecord = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(record.value, None);
    }

    #[test]
    fn test_missing() {
        let record: TestRecord = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(record.value, None);
    }

    #[test]
    fn test_empty_string() {
        let record: TestRecord = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert_eq!(record.value, None);
    }

    #[test]
    fn test_string_number() {
        let record: TestRecord = serde_json::from_str(r#"{"value": "123"}"#).unwrap();
        assert_eq!(record.value, Some(123));
    }

    #[test]
    fn test_native_number() {
        let record: TestRecord = serde_json::from_str(r#"{"value": -456}"#).unwrap();
        assert_eq!(record.value, Some(-456));
    }

    #[test]
    fn test_invalid_string() {
        let result: Result<TestRecord, _> = serde_json::from_str(r#"{"value": "not_a_number"}"#);
        assert!(result.is_err());
    }
}
