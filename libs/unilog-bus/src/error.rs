//! Error types for unilog-bus

use thiserror::Error;
use unilog_model::CalcError;

/// Bus loading and reading errors
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus description has no `module` key
    #[error("bus description has no 'module' key")]
    MissingModule,

    /// No bus implementation is registered under the requested tag
    #[error("unknown bus module '{module}', registered modules: {known:?}")]
    UnknownModule { module: String, known: Vec<String> },

    /// The source could not be interpreted as a bus description
    #[error("source does not contain a bus description: {0}")]
    NotABusDescription(String),

    /// Protocol-specific read failure
    #[error("Read error: {0}")]
    Read(String),

    /// Formula compilation or evaluation failure
    #[error("Formula error: {0}")]
    Calc(#[from] CalcError),

    /// YAML parse or dump failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO failure while loading or saving a description file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BusError {
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    pub fn not_a_bus_description(msg: impl Into<String>) -> Self {
        Self::NotABusDescription(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BusError>;
