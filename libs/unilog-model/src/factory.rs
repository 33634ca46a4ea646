//! Value factories
//!
//! A [`ValueFactory`] is a template that turns a raw number into a [`Value`]
//! with all needed metadata. Factories are built once when a bus is
//! configured (from static config or a device-discovery response) and used
//! repeatedly as value generators.

use crate::serde_helpers::deserialize_optional_i64;
use crate::value::{Metadata, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use unilog_calc::{Result, ScaleFunction};

/// A template to create a [`Value`] from a raw reading
///
/// The serialized form is `{name, unit, scalefunction: text-or-null, id,
/// ...extra}`; unknown keys round-trip through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFactory {
    /// Name of the measured item
    pub name: String,

    /// Unit of the measured item
    #[serde(default)]
    pub unit: Option<String>,

    /// Formula transforming the raw reading, absent means identity.
    /// Compiled and validated at load time, never at first use.
    #[serde(default)]
    pub scalefunction: Option<ScaleFunction>,

    /// Stable numeric identifier, used for ordering and display
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub id: Option<i64>,

    /// Target dataset id in an external database
    #[serde(
        default,
        deserialize_with = "deserialize_optional_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub datasetid: Option<i64>,

    /// Extra metadata attached to every produced value
    #[serde(flatten)]
    pub extra: Metadata,
}

impl ValueFactory {
    /// Create a factory without a scale function (identity)
    pub fn new(name: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            unit: unit.map(str::to_string),
            scalefunction: None,
            id: None,
            datasetid: None,
            extra: Metadata::new(),
        }
    }

    /// Create a factory compiling `code` into a scale function
    pub fn with_formula(name: impl Into<String>, unit: Option<&str>, code: &str) -> Result<Self> {
        let mut factory = Self::new(name, unit);
        factory.scalefunction = Some(ScaleFunction::new(code)?);
        Ok(factory)
    }

    /// Create a value from a raw reading, stamped with the current UTC time
    pub fn produce(&self, raw: f64) -> Result<Value> {
        self.produce_with(raw, None, Metadata::new())
    }

    /// Create a value from a raw reading at an explicit measurement time
    pub fn produce_at(&self, raw: f64, time: DateTime<Utc>) -> Result<Value> {
        self.produce_with(raw, Some(time), Metadata::new())
    }

    /// Create a value from a raw reading
    ///
    /// Applies the scale function when present; `time` defaults to now.
    /// `overrides` is merged over the factory's extra metadata, the
    /// call-site winning on key collision.
    pub fn produce_with(
        &self,
        raw: f64,
        time: Option<DateTime<Utc>>,
        overrides: Metadata,
    ) -> Result<Value> {
        let value = match &self.scalefunction {
            Some(function) => function.apply(raw)?,
            None => raw,
        };
        let mut extra = self.extra.clone();
        extra.extend(overrides);
        Ok(Value::new(
            value,
            time,
            Some(self.name.clone()),
            self.unit.clone(),
            self.datasetid,
            extra,
        ))
    }
}

impl fmt::Display for ValueFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scalefunction {
            Some(function) => write!(f, "{}", function.display_for(&self.name))?,
            None => write!(f, "{}", self.name)?,
        }
        if let Some(id) = self.id {
            write!(f, " (id:{})", id)?;
        }
        if let Some(unit) = &self.unit {
            write!(f, " [{}]", unit)?;
        }
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
    use serde_json::json;

    #[test]
    fn test_produce_applies_scale_function() {
        let factory = ValueFactory::with_formula("Temp", Some("C"), "x*0.1-40").unwrap();
        let value = factory.produce(650.0).unwrap();
        assert_eq!(value.value(), 25.0);
        assert_eq!(value.name(), Some("Temp"));
        assert_eq!(value.unit(), Some("C"));
    }

    #[test]
    fn test_produce_identity_without_scale_function() {
        let factory = ValueFactory::new("Hum", Some("%"));
        let value = factory.produce(55.5).unwrap();
        assert_eq!(value.value(), 55.5);
    }

    #[test]
    fn test_produce_stamps_call_time_not_construction_time() {
        let factory = ValueFactory::new("Temp", None);
        std::thread::sleep(std::time::Duration::from_millis(10));
        let before = Utc::now();
        let value = factory.produce(1.0).unwrap();
        let after = Utc::now();
        assert!(value.time() >= before && value.time() <= after);
    }

    #[test]
    fn test_produce_with_overrides_wins() {
        let mut factory = ValueFactory::new("Temp", None);
        factory
            .extra
            .insert("quality".to_string(), json!("raw"));
        factory.extra.insert("site".to_string(), json!("roof"));

        let mut overrides = Metadata::new();
        overrides.insert("quality".to_string(), json!("checked"));

        let value = factory.produce_with(1.0, None, overrides).unwrap();
        assert_eq!(value.extra()["quality"], json!("checked"));
        assert_eq!(value.extra()["site"], json!("roof"));
    }

    #[test]
    fn test_produce_carries_datasetid() {
        let mut factory = ValueFactory::new("Temp", None);
        factory.datasetid = Some(99);
        let value = factory.produce(1.0).unwrap();
        assert_eq!(value.datasetid(), Some(99));
    }

    #[test]
    fn test_invalid_formula_fails_at_load_time() {
        assert!(ValueFactory::with_formula("Temp", None, "21.5").is_err());
        assert!(ValueFactory::with_formula("Temp", None, "x +").is_err());
    }

    #[test]
    fn test_serde_roundtrip_with_extra() {
        let yaml = "name: Temp\nunit: C\nscalefunction: x*0.1-40\nid: '3'\nsensorcode: ABC\n";
        let factory: ValueFactory = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(factory.name, "Temp");
        assert_eq!(factory.id, Some(3));
        assert_eq!(factory.extra["sensorcode"], json!("ABC"));

        let dumped = serde_yaml::to_string(&factory).unwrap();
        let back: ValueFactory = serde_yaml::from_str(&dumped).unwrap();
        assert_eq!(back, factory);
    }

    #[test]
    fn test_serialize_null_scalefunction() {
        let factory = ValueFactory::new("Temp", None);
        let dumped = serde_yaml::to_string(&factory).unwrap();
        assert!(dumped.contains("scalefunction: null"));
    }

    #[test]
    fn test_display() {
        let mut factory = ValueFactory::with_formula("Temp", Some("C"), "x/10").unwrap();
        factory.id = Some(2);
        assert_eq!(factory.to_string(), "Temp/10 (id:2) [C]");
    }
}
