//! Error types for learnpulse-core

use thiserror::Error;

/// Main error type for the learnpulse-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A record failed validation before analysis
    #[error("invalid record #{index} (id {id}): {message}")]
    InvalidRecord {
        index: usize,
        id: String,
        message: String,
    },

    /// Transport-level failure talking to the LMS API
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success response from the LMS API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// Whether this is a data-validation failure (as opposed to a load failure).
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidRecord { .. })
    }
}

/// Result type alias for learnpulse-core
pub type Result<T> = std::result::Result<T, Error>;
