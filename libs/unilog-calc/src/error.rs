//! Error types for unilog-calc

use thiserror::Error;

/// Scale function errors
#[derive(Debug, Error, Clone)]
pub enum CalcError {
    /// The formula never references the free variable
    #[error("invalid formula '{0}': the free variable x is not used")]
    MissingVariable(String),

    /// The formula does not parse or does not evaluate to a number
    #[error("Expression error: {0}")]
    Expression(String),
}

impl CalcError {
    pub fn missing_variable(code: impl Into<String>) -> Self {
        Self::MissingVariable(code.into())
    }

    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
