//! Sensors
//!
//! A sensor is a named addressable unit on a bus owning an ordered sequence
//! of value factories. Factory order follows the configuration (insertion
//! order); display flows use the id-sorted order instead.

use crate::factory::ValueFactory;
use crate::serde_helpers::deserialize_optional_i64;
use crate::value::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sensor on a bus (e.g. a VAISALA probe at SDI-12 address 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Sensor name
    pub name: String,

    /// Protocol address on the bus, when the protocol has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Stable numeric identifier, used for ordering and display
    #[serde(
        default,
        deserialize_with = "deserialize_optional_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,

    /// Value factories in configuration order
    #[serde(default)]
    pub valuefactories: Vec<ValueFactory>,

    /// Extra configuration kept for round-trips
    #[serde(flatten)]
    pub extra: Metadata,
}

impl Sensor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            id: None,
            valuefactories: Vec::new(),
            extra: Metadata::new(),
        }
    }

    /// The key a bus uses to look this sensor up: the protocol address when
    /// present, the name otherwise
    pub fn label(&self) -> &str {
        self.address.as_deref().unwrap_or(&self.name)
    }

    /// Factories sorted by id for display, ids missing last, insertion
    /// order preserved among equals
    pub fn sorted_factories(&self) -> Vec<&ValueFactory> {
        let mut factories: Vec<&ValueFactory> = self.valuefactories.iter().collect();
        factories.sort_by_key(|f| (f.id.is_none(), f.id));
        factories
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(address) = &self.address {
            write!(f, " @{}", address)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn factory(name: &str, id: Option<i64>) -> ValueFactory {
        let mut f = ValueFactory::new(name, None);
        f.id = id;
        f
    }

    #[test]
    fn test_label_prefers_address() {
        let mut sensor = Sensor::new("vaisala");
        assert_eq!(sensor.label(), "vaisala");
        sensor.address = Some("0".to_string());
        assert_eq!(sensor.label(), "0");
    }

    #[test]
    fn test_sorted_factories() {
        let mut sensor = Sensor::new("s");
        sensor.valuefactories = vec![
            factory("c", Some(3)),
            factory("a", None),
            factory("b", Some(1)),
        ];
        let names: Vec<&str> = sensor
            .sorted_factories()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_insertion_order_preserved_in_config() {
        let yaml = "name: s\nvaluefactories:\n- name: second\n  id: 2\n- name: first\n  id: 1\n";
        let sensor: Sensor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sensor.valuefactories[0].name, "second");
        assert_eq!(sensor.valuefactories[1].name, "first");
    }

    #[test]
    fn test_serde_roundtrip() {
        let yaml = "name: vaisala\naddress: '2'\nid: 5\nvaluefactories:\n- name: Temp\n  unit: C\n  scalefunction: x*0.1-40\n  id: 1\n";
        let sensor: Sensor = serde_yaml::from_str(yaml).unwrap();
        let dumped = serde_yaml::to_string(&sensor).unwrap();
        let back: Sensor = serde_yaml::from_str(&dumped).unwrap();
        assert_eq!(back, sensor);
    }

    #[test]
    fn test_display() {
        let mut sensor = Sensor::new("vaisala");
        sensor.address = Some("2".to_string());
        assert_eq!(sensor.to_string(), "vaisala @2");
    }
}
