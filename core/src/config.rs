//! Client configuration.
//!
//! Values are resolved once, up front, and handed to
//! [`ApiClient`](crate::ApiClient) explicitly. Nothing below the config layer
//! reads the process environment.
//!
//! | Environment Variable     | Field               | Default                      |
//! |--------------------------|---------------------|------------------------------|
//! | `API_BASE_URL`           | `base_url`          | `https://api.example.com/v1` |
//! | `API_TIMEOUT`            | `timeout` (s)       | `10`                         |
//! | `API_KEY`                | `api_key`           | unset                        |
//! | `API_TEST_DATA_DIR`      | `test_data_dir`     | `test-data`                  |
//! | `API_MAX_RESPONSE_BYTES` | `max_response_size` | unlimited                    |

use std::{env, path::PathBuf, time::Duration};

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, FixtureError};
use crate::fixtures;

pub const DEFAULT_BASE_URL: &str = "https://api.example.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TEST_DATA_DIR: &str = "test-data";
/// Response bodies are read in full; there is no size cap by default.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = u64::MAX;

/// Resolved settings for talking to the objects service.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
    pub test_data_dir: PathBuf,
    /// Largest response body, in bytes, the transport will read.
    pub max_response_size: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("test_data_dir", &self.test_data_dir)
            .field("max_response_size", &self.max_response_size)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            test_data_dir: PathBuf::from(DEFAULT_TEST_DATA_DIR),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`, falling back to the
    /// documented defaults for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("API_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(raw) = lookup("API_TIMEOUT") {
            config.timeout = parse_timeout(&raw)?;
        }

        config.api_key = lookup("API_KEY").filter(|key| !key.is_empty());

        if let Some(dir) = lookup("API_TEST_DATA_DIR") {
            config.test_data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("API_MAX_RESPONSE_BYTES") {
            config.max_response_size = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidResponseSize(raw.clone()))?;
        }

        config.validate()?;
        debug!(?config, "resolved client configuration");
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|key| !key.is_empty());
        self
    }

    pub fn with_max_response_size(mut self, bytes: u64) -> Self {
        self.max_response_size = bytes;
        self
    }

    pub fn with_test_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_data_dir = dir.into();
        self
    }

    /// Check that the base URL is an absolute http(s) URL and the API key
    /// can be sent in a header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed =
            url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: e.to_string(),
            })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        if let Some(key) = &self.api_key {
            if !key.is_ascii() || key.chars().any(|c| c.is_ascii_control()) {
                return Err(ConfigError::InvalidApiKey);
            }
        }

        Ok(())
    }

    /// Headers attached to every request sent with this configuration.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {key}")));
        }
        headers
    }

    /// Load a JSON or YAML fixture from `test_data_dir`.
    pub fn load_test_data(&self, filename: &str) -> Result<Value, FixtureError> {
        fixtures::load_test_data(&self.test_data_dir, filename)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}
