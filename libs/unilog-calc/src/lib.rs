//! unilog-calc - Scale function evaluation for unilog
//!
//! Wraps user-supplied formula text (a function of one variable `x`) into a
//! compiled [`ScaleFunction`] that converts raw sensor readings into
//! engineering units.
//!
//! Formula text is arbitrary user input, so evaluation is restricted: only a
//! fixed allow-list of math functions (`sin`, `cos`, `sqrt`, `ln`, `min`,
//! `max`, `pow`, ...) and the constants `pi` and `e` are reachable. There is
//! no general code execution behind a formula.
//!
//! # Example
//!
//! ```
//! use unilog_calc::ScaleFunction;
//!
//! // compiled once at configuration-load time
//! let to_celsius = ScaleFunction::with_testvalue("x * 0.1 - 40", 0.0).unwrap();
//!
//! // applied on every raw reading
//! assert_eq!(to_celsius.apply(650.0).unwrap(), 25.0);
//!
//! // formulas must reference the free variable x
//! assert!(ScaleFunction::new("21.5").is_err());
//! ```

pub mod error;
mod functions;
pub mod scale;

// Re-exports for convenience
pub use error::{CalcError, Result};
pub use scale::{ScaleFunction, FREE_VARIABLE};
