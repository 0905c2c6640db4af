//! Error types for the AskMe library.
//!
//! Building and editing a query never fails; errors only arise at the edges
//! of the crate: reading configuration or edit scripts, exporting queries,
//! and talking to the external search engine. All of them are represented by
//! the [`AskmeError`] enum.
//!
//! # Examples
//!
//! ```
//! use askme::error::{AskmeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(AskmeError::config("max_results must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for AskMe operations.
#[derive(Error, Debug)]
pub enum AskmeError {
    /// I/O errors (reading scripts, writing exported queries, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by the search backend
    #[error("Search error: {0}")]
    Search(String),

    /// Malformed search engine responses
    #[error("Response error: {0}")]
    Response(String),

    /// Operations or restored state that would break an invariant
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with AskmeError.
pub type Result<T> = std::result::Result<T, AskmeError>;

impl AskmeError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AskmeError::Config(msg.into())
    }

    /// Create a new search error.
    pub fn search<S: Into<String>>(msg: S) -> Self {
        AskmeError::Search(msg.into())
    }

    /// Create a new response error.
    pub fn response<S: Into<String>>(msg: S) -> Self {
        AskmeError::Response(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        AskmeError::InvalidOperation(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        AskmeError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
