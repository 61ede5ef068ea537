//! Custom error types for the common library
//!
//! This module defines the errors raised while resolving the connection
//! settings for the remote LMS web service.

use thiserror::Error;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No web service token was provided
    #[error("LMS web service token is not configured (set LMS_TOKEN)")]
    MissingToken,

    /// The endpoint is not an absolute http(s) URL
    #[error("Invalid LMS endpoint: {0}")]
    InvalidEndpoint(String),

    /// The request timeout must be at least one second
    #[error("LMS request timeout must be greater than zero")]
    InvalidTimeout,

    /// The underlying configuration source could not be read or deserialized
    #[error("Configuration source error: {0}")]
    Source(#[from] ::config::ConfigError),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
