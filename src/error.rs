//! Error types for loading and cleaning tables.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum CleanError {
    /// File type tag is not one of `csv`, `excel`, `json`.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Missing-value strategy is unknown, or `fill` was requested without a value.
    #[error("Invalid missing value strategy: {0}")]
    InvalidStrategy(String),

    /// The input file could not be opened or read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Workbook reader error.
    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Input parsed, but its shape cannot be read as a table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl CleanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;
