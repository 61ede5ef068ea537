//! Common library for the LMS directory services
//!
//! This crate provides shared functionality used across the services that
//! talk to the remote LMS web service: connection configuration and the
//! errors raised while resolving it.

pub mod config;
pub mod error;

/// Example usage of the config module
///
/// ```rust,no_run
/// use common::config::LmsConfig;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = LmsConfig::from_env()?;
///     println!("LMS endpoint: {}", config.endpoint);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
