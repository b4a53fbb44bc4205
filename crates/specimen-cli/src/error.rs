//! Error types for the specimen CLI
//!
//! User-facing errors with actionable messages; pipeline errors pass
//! through with their own locations attached.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Pipeline or validation failure from the engine
    #[error(transparent)]
    Engine(#[from] specimen_common::SpecimenError),

    /// Input table could not be read as CSV
    #[error("Failed to read '{file}': {source}. Check that the file exists and is valid CSV.")]
    TableRead {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Output could not be written anywhere, primary and fallback path both failed
    #[error("Failed to write output to '{0}' or its fallback. Close any program holding the file open and check permissions.")]
    OutputWrite(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a table-read error naming the offending file
    pub fn table_read(file: impl Into<String>, source: csv::Error) -> Self {
        Self::TableRead {
            file: file.into(),
            source,
        }
    }
}
