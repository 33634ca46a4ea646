//! unilog-model - Domain model for the unilog sensor logger
//!
//! General hierarchy of the logger system:
//!
//! ```text
//! Bus (eg. SDI-12)
//! --> has sensors (eg. VAISALA @ address 0)
//!     --> has valuefactories (eg. Air Temp)
//! ```
//!
//! This crate holds the protocol-independent pieces: the immutable
//! measurement record [`Value`], the [`ValueFactory`] template that creates
//! it and the [`Sensor`] that owns the factories. The bus abstraction lives
//! in `unilog-bus`.
//!
//! # Example
//!
//! ```
//! use unilog_model::ValueFactory;
//!
//! let factory = ValueFactory::with_formula("Temp", Some("C"), "x*0.1-40").unwrap();
//! let value = factory.produce(650.0).unwrap();
//! assert_eq!(value.value(), 25.0);
//! assert_eq!(value.name(), Some("Temp"));
//! ```

pub mod factory;
pub mod sensor;
pub mod serde_helpers;
pub mod value;

// Re-exports for convenience
pub use factory::ValueFactory;
pub use sensor::Sensor;
pub use value::{Metadata, Value};

// The formula layer, re-exported so bus implementations only need one import
pub use unilog_calc::{CalcError, ScaleFunction};
