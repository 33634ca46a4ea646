//! In-memory playback bus
//!
//! Serves raw readings straight from its configuration, one number per
//! value factory. Useful for dry-running logger setups without hardware and
//! as the template every protocol bus follows: a serde config struct, a
//! registered constructor and the [`Bus`] capability set.

use crate::bus::{self, Bus};
use crate::error::{BusError, Result};
use crate::registry::register_bus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use unilog_model::{Sensor, Value};

/// Registry tag of the memory bus
pub const MODULE: &str = "memory";

/// A bus replaying configured raw readings
///
/// `readings` maps a sensor label (its address, or name when it has no
/// address) to one raw number per value factory, in factory slot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryBus {
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub readings: BTreeMap<String, Vec<f64>>,
}

impl MemoryBus {
    /// Register this implementation with the global bus registry
    pub fn register() {
        register_bus(MODULE, Self::construct);
    }

    fn construct(data: Mapping) -> Result<Box<dyn Bus>> {
        let bus: MemoryBus = serde_yaml::from_value(serde_yaml::Value::Mapping(data))?;
        Ok(Box::new(bus))
    }
}

#[async_trait]
impl Bus for MemoryBus {
    fn module(&self) -> &'static str {
        MODULE
    }

    fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    async fn read_sensor(
        &self,
        sensor: &Sensor,
        from: Option<DateTime<Utc>>,
        slots: Option<&[usize]>,
    ) -> Result<Vec<Value>> {
        // a playback bus has no history to page through
        let _ = from;
        let raws = self.readings.get(sensor.label()).ok_or_else(|| {
            BusError::read(format!(
                "no readings configured for sensor '{}'",
                sensor.label()
            ))
        })?;
        let mut values = Vec::new();
        for (slot, factory) in sensor.valuefactories.iter().enumerate() {
            if let Some(slots) = slots {
                if !slots.contains(&slot) {
                    continue;
                }
            }
            let raw = raws.get(slot).copied().ok_or_else(|| {
                BusError::read(format!(
                    "sensor '{}' has no raw reading for slot {}",
                    sensor.label(),
                    slot
                ))
            })?;
            values.push(factory.produce(raw)?);
        }
        Ok(values)
    }

    fn as_dict(&self) -> Result<Mapping> {
        bus::config_to_mapping(MODULE, self)
    }
}
