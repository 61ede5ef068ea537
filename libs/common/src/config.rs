//! Connection settings for the remote LMS web service
//!
//! The token is resolved at startup from the environment and is never
//! embedded in source.

use std::collections::HashMap;
use std::fmt;

use ::config::{Config, Environment};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

/// Default REST endpoint of the IOMAD web service
pub const DEFAULT_ENDPOINT: &str = "https://iomad.bylinelms.com/webservice/rest/server.php";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const ENV_PREFIX: &str = "LMS";

/// LMS web service configuration
#[derive(Clone, Deserialize)]
pub struct LmsConfig {
    /// REST endpoint URL (`server.php`)
    pub endpoint: String,
    /// Web service token sent as `wstoken`
    pub token: String,
    /// Per-request timeout in seconds
    #[serde(deserialize_with = "seconds")]
    pub request_timeout_secs: u64,
}

// Environment values arrive as strings, defaults as integers.
fn seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(secs) => Ok(secs),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number of seconds: {:?}", text))),
    }
}

impl fmt::Debug for LmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LmsConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl LmsConfig {
    /// Create a new LmsConfig from environment variables
    ///
    /// # Environment Variables
    /// - `LMS_ENDPOINT`: REST endpoint (default: the IOMAD `server.php` URL)
    /// - `LMS_TOKEN`: web service token (required)
    /// - `LMS_REQUEST_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Create a new LmsConfig from an explicit set of `LMS_*` variables
    pub fn from_map(vars: HashMap<String, String>) -> ConfigResult<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(source: Environment) -> ConfigResult<Self> {
        let config: LmsConfig = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("token", "")?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        info!("LMS endpoint configured: {}", config.endpoint);

        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_with_token_only() {
        let config = LmsConfig::from_map(vars(&[("LMS_TOKEN", "abc123")]))
            .expect("Failed to create LMS config");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.token, "abc123");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let config = LmsConfig::from_map(vars(&[
            ("LMS_TOKEN", "abc123"),
            ("LMS_ENDPOINT", "http://localhost:8080/webservice/rest/server.php"),
            ("LMS_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .expect("Failed to create LMS config");
        assert_eq!(
            config.endpoint,
            "http://localhost:8080/webservice/rest/server.php"
        );
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = LmsConfig::from_map(HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));

        let err = LmsConfig::from_map(vars(&[("LMS_TOKEN", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = LmsConfig::from_map(vars(&[
            ("LMS_TOKEN", "abc123"),
            ("LMS_ENDPOINT", "iomad.example/server.php"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_numeric_token_is_kept_verbatim() {
        for token in ["00123456789012345678901234567890", "0123", "1e5"] {
            let config = LmsConfig::from_map(vars(&[("LMS_TOKEN", token)]))
                .expect("Failed to create LMS config");
            assert_eq!(config.token, token);
        }
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = LmsConfig::from_map(vars(&[
            ("LMS_TOKEN", "abc123"),
            ("LMS_REQUEST_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        let err = LmsConfig::from_map(vars(&[
            ("LMS_TOKEN", "abc123"),
            ("LMS_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Source(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = LmsConfig::from_map(vars(&[("LMS_TOKEN", "super-secret")]))
            .expect("Failed to create LMS config");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: serialized with every other test touching the environment
        unsafe {
            std::env::set_var("LMS_TOKEN", "env-token");
            std::env::remove_var("LMS_ENDPOINT");
        }

        let config = LmsConfig::from_env().expect("Failed to create LMS config");
        assert_eq!(config.token, "env-token");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        unsafe {
            std::env::remove_var("LMS_TOKEN");
        }
    }
}
