//! ScaleFunction - compiled formula of one variable
//!
//! A scale function wraps user-supplied formula text such as `x*0.1-40` and
//! converts a raw sensor reading into an engineering-unit value. The formula
//! is parsed once at construction time; every later reading only evaluates
//! the precompiled tree.

use crate::error::{CalcError, Result};
use crate::functions::base_context;
use evalexpr::{ContextWithMutableVariables, HashMapContext, Node, Value};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The free variable every formula must reference
pub const FREE_VARIABLE: &str = "x";

/// A user defined function to scale or translate a raw reading into
/// something meaningful
///
/// # Example
/// ```
/// use unilog_calc::ScaleFunction;
///
/// let f = ScaleFunction::new("x * 0.1 - 40").unwrap();
/// assert_eq!(f.apply(650.0).unwrap(), 25.0);
/// assert_eq!(f.code(), "x * 0.1 - 40");
/// ```
#[derive(Debug, Clone)]
pub struct ScaleFunction {
    code: String,
    node: Node,
    context: HashMapContext,
}

impl ScaleFunction {
    /// Compile a formula
    ///
    /// Fails if the formula does not parse or never references the free
    /// variable `x`. The variable check runs on the parsed tree, so an `x`
    /// inside another identifier (e.g. `exp`) does not count.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let node = evalexpr::build_operator_tree(&code).map_err(|e| {
            CalcError::expression(format!("Failed to parse '{}': {}", code, e))
        })?;
        if !node.iter_variable_identifiers().any(|v| v == FREE_VARIABLE) {
            return Err(CalcError::missing_variable(code));
        }
        let context = base_context()?;
        Ok(Self { code, node, context })
    }

    /// Compile a formula and probe it at `testvalue`
    ///
    /// Use this at configuration-load time to reject formulas that parse but
    /// cannot be evaluated (unknown identifiers, wrong arity, ...).
    pub fn with_testvalue(code: impl Into<String>, testvalue: f64) -> Result<Self> {
        let function = Self::new(code)?;
        if let Err(e) = function.apply(testvalue) {
            return Err(CalcError::expression(format!(
                "'{}' fails at x = {}: {}",
                function.code, testvalue, e
            )));
        }
        Ok(function)
    }

    /// Evaluate the formula at `x`
    ///
    /// Evaluation errors propagate to the caller, they are never masked.
    pub fn apply(&self, x: f64) -> Result<f64> {
        let mut context = self.context.clone();
        context
            .set_value(FREE_VARIABLE.to_string(), Value::Float(x))
            .map_err(|e| CalcError::expression(format!("Failed to set variable x: {}", e)))?;
        let result = self.node.eval_with_context(&context).map_err(|e| {
            CalcError::expression(format!(
                "Failed to evaluate '{}' at x = {}: {}",
                self.code, x, e
            ))
        })?;
        match result {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(CalcError::expression(format!(
                "'{}' did not evaluate to a number, got {:?}",
                self.code, other
            ))),
        }
    }

    /// The original formula text, verbatim
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The formula text with `name` substituted for the free variable,
    /// e.g. `x*0.1-40` shown as `AirTemp*0.1-40` in bus listings
    pub fn display_for(&self, name: &str) -> String {
        substitute_variable(&self.code, name)
    }
}

/// Replace standalone occurrences of the free variable with `name`
fn substitute_variable(code: &str, name: &str) -> String {
    let mut out = String::with_capacity(code.len() + name.len());
    let bytes = code.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    for (i, c) in code.char_indices() {
        if c == 'x' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            if !before.is_some_and(is_word) && !after.is_some_and(is_word) {
                out.push_str(name);
                continue;
            }
        }
        out.push(c);
    }
    out
}

impl fmt::Display for ScaleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl PartialEq for ScaleFunction {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ScaleFunction {}

// Serializes as the bare formula text so a ValueFactory round-trips its
// `scalefunction` field as text-or-null.
impl Serialize for ScaleFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

impl<'de> Deserialize<'de> for ScaleFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        ScaleFunction::new(code).map_err(de::Error::custom)
    }
}
