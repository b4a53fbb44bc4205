//! Error types for the specimen pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, SpecimenError>;

/// Main error type for the specimen pipeline
///
/// Only structural problems in the input tables are fatal for a run.
/// Network and parse failures are absorbed close to where they occur and
/// degrade the affected fields to empty strings instead of surfacing here.
#[derive(Error, Debug)]
pub enum SpecimenError {
    /// Input table does not match its declared shape
    #[error("Structural error in '{file}' (row {row}): {message}")]
    Structural {
        file: String,
        row: usize,
        message: String,
    },

    /// Pre-flight validation found fatal problems
    #[error("Validation failed with {0} fatal problem(s). Fix the input tables and retry.")]
    ValidationFailed(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl SpecimenError {
    /// Create a structural error with a precise location
    pub fn structural(file: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self::Structural {
            file: file.into(),
            row,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
