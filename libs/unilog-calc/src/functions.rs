//! Math function allow-list for scale formulas
//!
//! Scale formulas run user-supplied text, so evaluation is restricted to a
//! fixed set of math functions and constants. Anything not registered here
//! is rejected by the evaluator.

use crate::error::{CalcError, Result};
use evalexpr::{ContextWithMutableFunctions, ContextWithMutableVariables, Function, HashMapContext, Value};

/// Unary functions available inside scale formulas
const UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("asin", f64::asin),
    ("acos", f64::acos),
    ("atan", f64::atan),
    ("sqrt", f64::sqrt),
    ("exp", f64::exp),
    ("ln", f64::ln),
    ("log", f64::ln),
    ("log2", f64::log2),
    ("log10", f64::log10),
    ("floor", f64::floor),
    ("ceil", f64::ceil),
    ("round", f64::round),
    ("abs", f64::abs),
];

/// Binary functions available inside scale formulas
const BINARY: &[(&str, fn(f64, f64) -> f64)] = &[
    ("min", f64::min),
    ("max", f64::max),
    ("pow", f64::powf),
    ("atan2", f64::atan2),
];

/// Build the evaluation context holding the allow-listed functions and the
/// constants `pi` and `e`. The free variable is bound per call on a clone.
pub(crate) fn base_context() -> Result<HashMapContext> {
    let mut context = HashMapContext::new();

    context
        .set_value("pi".to_string(), Value::Float(std::f64::consts::PI))
        .map_err(|e| CalcError::expression(format!("Failed to set constant pi: {}", e)))?;
    context
        .set_value("e".to_string(), Value::Float(std::f64::consts::E))
        .map_err(|e| CalcError::expression(format!("Failed to set constant e: {}", e)))?;

    for (name, func) in UNARY {
        let f = *func;
        context
            .set_function(
                (*name).to_string(),
                Function::new(move |arg| {
                    let x = arg.as_number()?;
                    Ok(Value::Float(f(x)))
                }),
            )
            .map_err(|e| CalcError::expression(format!("Failed to register {}: {}", name, e)))?;
    }

    for (name, func) in BINARY {
        let f = *func;
        context
            .set_function(
                (*name).to_string(),
                Function::new(move |arg| {
                    let tuple = arg.as_fixed_len_tuple(2)?;
                    let a = tuple[0].as_number()?;
                    let b = tuple[1].as_number()?;
                    Ok(Value::Float(f(a, b)))
                }),
            )
            .map_err(|e| CalcError::expression(format!("Failed to register {}: {}", name, e)))?;
    }

    Ok(context)
}
