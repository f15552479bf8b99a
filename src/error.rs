//! Error types for Tulana

use thiserror::Error;

/// Tulana error type
#[derive(Error, Debug)]
pub enum TulanaError {
    /// File could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A log line could not be parsed
    #[error("{path}:{line}: {message}")]
    Parse {
        /// Path of the offending file
        path: String,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A series is structurally unusable (empty, duplicate timestamps)
    #[error("Series error: {0}")]
    Series(String),

    /// Summary export failed
    #[error("Export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for TulanaError {
    fn from(e: serde_json::Error) -> Self {
        TulanaError::Export(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TulanaError>;
