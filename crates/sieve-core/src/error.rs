//! Centralized error types for Sieve.

use thiserror::Error;

/// Main error type for Sieve operations.
#[derive(Error, Debug)]
pub enum SieveError {
    #[error("Request failed with status code {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Classification API error (HTTP {status}): {body}")]
    ClassifierApi { status: u16, body: String },

    #[error("Classification API returned no message content")]
    EmptyCompletion,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for Sieve operations.
pub type SieveResult<T> = Result<T, SieveError>;

impl SieveError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
