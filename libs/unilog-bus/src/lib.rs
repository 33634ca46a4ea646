//! unilog-bus - Bus abstraction for the unilog sensor logger
//!
//! A [`Bus`] owns sensors, polls them asynchronously and serializes itself
//! into a YAML description it can be rebuilt from:
//!
//! ```yaml
//! module: memory
//! sensors:
//! - name: vaisala
//!   address: '0'
//!   valuefactories:
//!   - name: Temp
//!     unit: C
//!     scalefunction: x*0.1-40
//!     id: 1
//! readings:
//!   '0': [650.0]
//! ```
//!
//! Concrete implementations register a constructor under their `module` tag
//! at process start ([`init`] registers the built-ins); [`open_bus`] then
//! reconstructs a bus from a mapping, a reader, a file path or inline text.
//!
//! # Example
//!
//! ```
//! unilog_bus::init();
//! let bus = unilog_bus::open_bus("module: memory\nsensors: []\n").unwrap();
//! assert_eq!(bus.module(), "memory");
//! ```

pub mod bus;
pub mod error;
pub mod memory;
pub mod open;
pub mod registry;

// Re-exports for convenience
pub use bus::{config_to_mapping, describe, save, write_to, Bus, MODULE_KEY};
pub use error::{BusError, Result};
pub use memory::MemoryBus;
pub use open::{from_path, from_reader, open_bus, BusSource};
pub use registry::{from_dict, init, register_bus, BusConstructor, BusRegistry};
