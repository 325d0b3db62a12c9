//! Error types for the data-loader crate.
//!
//! Every variant here is fatal at startup: the service refuses to serve
//! when ingestion cannot produce both stores.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be interpreted by a parsing strategy
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A parsing strategy ran but every row was rejected
    #[error("Strategy '{strategy}' produced no usable rows from {file}")]
    NoUsableRows { file: String, strategy: String },

    /// Every parsing strategy failed for this file
    #[error("Could not ingest {file}; tried: {}", .attempts.join("; "))]
    IngestionFailed { file: String, attempts: Vec<String> },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
