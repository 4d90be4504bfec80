//! Centralized error types for mboxGraph.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mboxGraph library.
#[derive(Error, Debug)]
pub enum GraphError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("MBOX file not found: {0}")]
    FileNotFound(PathBuf),

    /// A logical line exceeded the configured maximum length.
    ///
    /// Truncating the line would silently corrupt sender or date values, so
    /// the scan aborts instead.
    #[error("Line at offset {offset} exceeds the {limit}-byte limit")]
    LineTooLong { offset: u64, limit: usize },

    /// The scan finished without recovering a single sender.
    #[error("No messages with sender and date found in '{0}'")]
    EmptyArchive(PathBuf),

    /// An export operation failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenience alias for `Result<T, GraphError>`.
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `GraphError`
/// when no path context is available (rare — prefer `GraphError::io`).
impl From<std::io::Error> for GraphError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
