//! The generic bus contract
//!
//! A bus owns sensors and knows how to poll them; every concrete protocol
//! (SDI-12 serial, addUPI HTTP, the in-memory playback bus, ...) implements
//! [`Bus`] and registers a constructor so it can be rebuilt from its own
//! serialized form.

use crate::error::{BusError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use unilog_model::{Sensor, Value};

/// Key naming the concrete implementation in a serialized bus description
pub const MODULE_KEY: &str = "module";

/// A generic bus of sensors
#[async_trait]
pub trait Bus: Send + Sync + std::fmt::Debug {
    /// Registry tag of the concrete implementation, written to the
    /// serialized form as the `module` key
    fn module(&self) -> &'static str;

    /// The sensors owned by this bus, in configuration order
    fn sensors(&self) -> &[Sensor];

    /// Read one sensor
    ///
    /// `from` asks for history since a point in time where the protocol
    /// supports it; `slots` restricts the read to the given value-factory
    /// indices. Protocols ignore what they cannot honor.
    async fn read_sensor(
        &self,
        sensor: &Sensor,
        from: Option<DateTime<Utc>>,
        slots: Option<&[usize]>,
    ) -> Result<Vec<Value>>;

    /// Read all sensors, one at a time
    ///
    /// A failed read aborts the current call only; value sequences returned
    /// by earlier calls are owned by the caller and stay intact.
    async fn read_all(&self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        for sensor in self.sensors() {
            values.extend(self.read_sensor(sensor, None, None).await?);
        }
        Ok(values)
    }

    /// The bus as a mapping it can be reconstructed from
    ///
    /// Must contain the `module` key first, followed by every field needed
    /// to rebuild the bus (sensors, factories, connection parameters).
    fn as_dict(&self) -> Result<Mapping>;
}

/// Serialize a bus config struct into its description mapping, with the
/// `module` tag as the first key
pub fn config_to_mapping<T: Serialize>(module: &str, config: &T) -> Result<Mapping> {
    let mut dict = Mapping::new();
    dict.insert(YamlValue::from(MODULE_KEY), YamlValue::from(module));
    match serde_yaml::to_value(config)? {
        YamlValue::Mapping(fields) => {
            for (key, value) in fields {
                dict.insert(key, value);
            }
        }
        other => {
            return Err(BusError::not_a_bus_description(format!(
                "bus config serialized to {:?}, expected a mapping",
                other
            )))
        }
    }
    Ok(dict)
}

/// Write the bus description as YAML, key order as produced by `as_dict`
pub fn write_to(bus: &dyn Bus, writer: impl Write) -> Result<()> {
    let dict = bus.as_dict()?;
    serde_yaml::to_writer(writer, &dict)?;
    Ok(())
}

/// Save the bus description to a file, e.g. `preferences/sdi12.bus.yaml`
pub fn save(bus: &dyn Bus, path: impl AsRef<Path>) -> Result<()> {
    write_to(bus, File::create(path)?)
}

/// Human readable bus hierarchy: bus, sensors, factories in display order
/// with the factory name substituted into its formula
pub fn describe(bus: &dyn Bus) -> String {
    let sensors = bus.sensors();
    let mut out = format!("{} bus, {} sensors\n", bus.module(), sensors.len());
    for sensor in sensors {
        out.push_str(&format!(
            "  {} ({} values)\n",
            sensor,
            sensor.valuefactories.len()
        ));
        for factory in sensor.sorted_factories() {
            out.push_str(&format!("    {}\n", factory));
        }
    }
    out
}
