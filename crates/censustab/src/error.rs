//! Error types for the censustab library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for censustab operations.
#[derive(Debug, Error)]
pub enum CensusError {
    /// A required setting (the data root) is not configured.
    #[error("{what} is not configured: {remedy}")]
    PreconditionMissing { what: String, remedy: String },

    /// The query arguments are contradictory or malformed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A table-content or geo-header code is absent from the year's catalog.
    #[error("Unknown reference(s) for {context}: {}", references.join(", "))]
    UnknownReference {
        context: String,
        references: Vec<String>,
    },

    /// No catalog is registered for this dataset and year.
    #[error("Unsupported dataset: {0}")]
    UnsupportedDataset(String),

    /// The availability collaborator reported the files as missing.
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A structurally required field could not be parsed.
    #[error("Parse error in '{path}' at row {row}: {message}")]
    Parse {
        path: PathBuf,
        row: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CensusError {
    /// Build an `Io` error for a path.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CensusError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts a whole query before any file is read.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CensusError::PreconditionMissing { .. }
                | CensusError::InvalidQuery(_)
                | CensusError::UnknownReference { .. }
                | CensusError::UnsupportedDataset(_)
        )
    }
}

/// Result type alias for censustab operations.
pub type Result<T> = std::result::Result<T, CensusError>;
