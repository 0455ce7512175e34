//! Core Error Types
//!
//! Defines the foundational error types used across the docs-index workspace.
//! Depends only on thiserror to keep the core crate small.
//!
//! The application crate extends these with variants for the filesystem walk,
//! configuration loading and link policy.

use thiserror::Error;

/// Core error type for the docs-index workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Value could not be parsed (audience, status, dates)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
