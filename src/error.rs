//! Error types for postlist evaluation.
//!
//! Recoverable failures are represented by the [`PostListError`] enum. Broken
//! internal contracts between postlists (for example two children of an AND
//! disagreeing about a document's length) are not errors: they panic, since
//! no caller can do anything sensible with a query tree in that state.
//!
//! # Examples
//!
//! ```
//! use postlist::error::{PostListError, Result};
//!
//! fn build() -> Result<()> {
//!     Err(PostListError::invalid_argument("doc ids must be increasing"))
//! }
//!
//! assert!(build().is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for postlist operations.
#[derive(Error, Debug)]
pub enum PostListError {
    /// I/O errors, such as an unreadable configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Posting data errors (malformed or inconsistent postings).
    #[error("Index error: {0}")]
    Index(String),

    /// Query tree construction errors.
    #[error("Query error: {0}")]
    Query(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PostListError.
pub type Result<T> = std::result::Result<T, PostListError>;

impl PostListError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        PostListError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        PostListError::Query(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PostListError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PostListError::Other(format!("Invalid configuration: {}", msg.into()))
    }
}
