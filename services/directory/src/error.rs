//! Custom error types for the directory service

use thiserror::Error;

/// Coarse error classes used for logging and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or non-success HTTP status
    Transport,
    /// The response did not have the expected shape
    Malformed,
    /// The service answered with an exception payload
    Service,
    /// Local input was rejected before any request
    Validation,
    /// The client is not configured correctly
    Configuration,
}

/// Custom error type for the directory service
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Request could not be sent or the response body could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The response body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The service reported an exception
    #[error("LMS error ({errorcode}): {message}")]
    Remote { errorcode: String, message: String },

    /// Local validation failed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] common::error::ConfigError),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::Transport(_) | DirectoryError::Status(_) => ErrorKind::Transport,
            DirectoryError::Decode(_) => ErrorKind::Malformed,
            DirectoryError::Remote { .. } => ErrorKind::Service,
            DirectoryError::Validation(_) => ErrorKind::Validation,
            DirectoryError::Config(_) => ErrorKind::Configuration,
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::Decode(err.to_string())
    }
}

/// Type alias for directory results
pub type DirectoryResult<T> = Result<T, DirectoryError>;
