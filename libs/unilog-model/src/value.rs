//! Measured values
//!
//! A [`Value`] is one reading with its metadata. It is created exactly once
//! per measurement by a `ValueFactory` call, handed to logging collaborators
//! and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form string-keyed metadata attached to values and factories
pub type Metadata = BTreeMap<String, JsonValue>;

/// A measured value with metadata
///
/// Fields are private: once constructed a `Value` is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    value: f64,
    time: DateTime<Utc>,
    name: Option<String>,
    unit: Option<String>,
    datasetid: Option<i64>,
    extra: Metadata,
}

impl Value {
    /// Create a value with metadata
    ///
    /// `time` defaults to the creation time when not supplied. `datasetid`
    /// is the target dataset id in an external database, if any.
    pub fn new(
        value: f64,
        time: Option<DateTime<Utc>>,
        name: Option<String>,
        unit: Option<String>,
        datasetid: Option<i64>,
        extra: Metadata,
    ) -> Self {
        Self {
            value,
            time: time.unwrap_or_else(Utc::now),
            name,
            unit,
            datasetid,
            extra,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn datasetid(&self) -> Option<i64> {
        self.datasetid
    }

    pub fn extra(&self) -> &Metadata {
        &self.extra
    }

    /// The value as a flat record: extra metadata merged with the core
    /// fields, core fields winning on key collision. The timestamp is
    /// ISO-8601 text.
    pub fn to_record(&self) -> Map<String, JsonValue> {
        let mut record = Map::new();
        for (key, value) in &self.extra {
            record.insert(key.clone(), value.clone());
        }
        record.insert("name".to_string(), json!(self.name));
        record.insert("value".to_string(), json!(self.value));
        record.insert("unit".to_string(), json!(self.unit));
        record.insert("time".to_string(), json!(self.time.to_rfc3339()));
        record.insert("datasetid".to_string(), json!(self.datasetid));
        record
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}=", name)?;
        }
        write!(f, "{}", self.value)?;
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        write!(f, " ({})", self.time.format("%d.%m.%Y %H:%M:%S"))?;
        if let Some(datasetid) = self.datasetid {
            write!(f, " ->ds:{}", datasetid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 2, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_default_time_is_now() {
        let before = Utc::now();
        let value = Value::new(1.0, None, None, None, None, Metadata::new());
        let after = Utc::now();
        assert!(value.time() >= before && value.time() <= after);
    }

    #[test]
    fn test_record_merges_extra_with_core_winning() {
        let mut extra = Metadata::new();
        extra.insert("site".to_string(), json!("roof"));
        extra.insert("value".to_string(), json!("bogus"));
        let value = Value::new(
            2.5,
            Some(sample_time()),
            Some("Temp".to_string()),
            Some("C".to_string()),
            Some(42),
            extra,
        );

        let record = value.to_record();
        assert_eq!(record["site"], json!("roof"));
        // core field wins over the colliding extra key
        assert_eq!(record["value"], json!(2.5));
        assert_eq!(record["name"], json!("Temp"));
        assert_eq!(record["unit"], json!("C"));
        assert_eq!(record["datasetid"], json!(42));
        assert_eq!(record["time"], json!("2023-02-01T12:30:00+00:00"));
    }

    #[test]
    fn test_record_keeps_absent_fields_as_null() {
        let value = Value::new(1.0, Some(sample_time()), None, None, None, Metadata::new());
        let record = value.to_record();
        assert_eq!(record["name"], JsonValue::Null);
        assert_eq!(record["datasetid"], JsonValue::Null);
    }

    #[test]
    fn test_display() {
        let value = Value::new(
            25.0,
            Some(sample_time()),
            Some("Temp".to_string()),
            Some("C".to_string()),
            Some(7),
            Metadata::new(),
        );
        assert_eq!(value.to_string(), "Temp=25 C (01.02.2023 12:30:00) ->ds:7");
    }
}
