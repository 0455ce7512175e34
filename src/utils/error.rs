//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.
//!
//! Only structural problems are errors. Metadata problems are recorded as
//! `ExtractionWarning`s on the document and broken links as `LinkEdge`s; both
//! leave the build running.

use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The root directory does not exist or cannot be read
    #[error("Root not found: {}", .path.display())]
    RootNotFound { path: PathBuf },

    /// Two filesystem entries map to the same logical document
    #[error("Duplicate document path '{path}': {} and {}", .first.display(), .second.display())]
    DuplicatePath {
        path: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two documents handed to the index builder share a logical path
    #[error("Duplicate document path '{path}' in the document set")]
    DuplicateDocument { path: String },

    /// Broken links found while links are strict
    #[error("{count} broken link(s) found")]
    BrokenLinks { count: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a root-not-found error
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound { path: path.into() }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit code for this error: 2 for strict broken links, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::BrokenLinks { .. } => 2,
            _ => 1,
        }
    }
}

/// Convert AppError to a string
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
