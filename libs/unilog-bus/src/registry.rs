//! Bus implementation registry
//!
//! Bus descriptions declare their implementation by name in the `module`
//! key. Instead of resolving that name by runtime reflection, every
//! implementation registers a constructor under its tag at process start;
//! [`from_dict`] then looks the tag up and hands the remaining keys to the
//! constructor. One tag maps to exactly one constructor, so an ambiguous
//! description cannot exist.

use crate::bus::{Bus, MODULE_KEY};
use crate::error::{BusError, Result};
use crate::memory::MemoryBus;
use parking_lot::RwLock;
use serde_yaml::{Mapping, Value as YamlValue};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Builds a bus from the description keys remaining after `module` is taken
pub type BusConstructor = fn(Mapping) -> Result<Box<dyn Bus>>;

/// Registry mapping a module tag to a bus constructor
#[derive(Default)]
pub struct BusRegistry {
    constructors: HashMap<String, BusConstructor>,
}

impl BusRegistry {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under a module tag
    ///
    /// Re-registering a tag overwrites the previous constructor, the last
    /// registration wins.
    pub fn register(&mut self, module: &str, constructor: BusConstructor) {
        if self
            .constructors
            .insert(module.to_string(), constructor)
            .is_some()
        {
            warn!("bus module '{}' registered twice, keeping the last registration", module);
        }
    }

    /// Build a bus from the tag and its description keys
    pub fn create(&self, module: &str, data: Mapping) -> Result<Box<dyn Bus>> {
        match self.constructors.get(module) {
            Some(constructor) => {
                debug!("found bus module '{}'", module);
                constructor(data)
            }
            None => Err(BusError::UnknownModule {
                module: module.to_string(),
                known: self.modules(),
            }),
        }
    }

    /// Registered module tags, sorted
    pub fn modules(&self) -> Vec<String> {
        let mut modules: Vec<String> = self.constructors.keys().cloned().collect();
        modules.sort();
        modules
    }
}

fn global() -> &'static RwLock<BusRegistry> {
    static REGISTRY: OnceLock<RwLock<BusRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(BusRegistry::new()))
}

/// Register a bus constructor with the global registry
pub fn register_bus(module: &str, constructor: BusConstructor) {
    global().write().register(module, constructor);
}

/// Register all built-in bus implementations
///
/// Call once during application startup, before loading bus descriptions.
pub fn init() {
    MemoryBus::register();
    info!("bus modules initialized: {:?}", global().read().modules());
}

/// Load a bus from a description mapping (e.g. given by YAML or JSON)
///
/// The implementation is picked by the `module` key; the remaining keys are
/// passed verbatim to its constructor.
pub fn from_dict(mut data: Mapping) -> Result<Box<dyn Bus>> {
    let module = match data.remove(&YamlValue::from(MODULE_KEY)) {
        Some(YamlValue::String(module)) => module,
        Some(other) => {
            return Err(BusError::not_a_bus_description(format!(
                "'{}' must be a string, got {:?}",
                MODULE_KEY, other
            )))
        }
        None => return Err(BusError::MissingModule),
    };
    global().read().create(&module, data)
}
