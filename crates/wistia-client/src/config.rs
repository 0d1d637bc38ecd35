//! Configuration for the Wistia API client
//!
//! Credentials are passed explicitly. [`ClientConfig::from_env`] exists for
//! callers and test harnesses that keep the secret in the environment.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Wistia REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.wistia.com/v1/";

/// Basic-auth username expected by the API; the password is the API secret
pub const API_USERNAME: &str = "api";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response format, appended to every target as an extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `.json`
    #[default]
    Json,
    /// `.xml` (responses are passed through undecoded)
    Xml,
}

impl Format {
    /// File extension without the leading dot
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(ApiError::InvalidFormat(other.to_string())),
        }
    }
}

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL
    pub base_url: String,
    /// API password (sent as the basic-auth password)
    pub api_password: String,
    /// Response format
    pub format: Format,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_password", &"<redacted>")
            .field("format", &self.format)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_password: String::new(),
            format: Format::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("wistia-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create configuration for the given API password
    pub fn new(api_password: impl Into<String>) -> Self {
        Self {
            api_password: api_password.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `WISTIA_PASS`: API password (required)
    /// - `WISTIA_FORMAT`: `json` or `xml` (default `json`)
    /// - `WISTIA_API_URL`: Base URL override
    /// - `WISTIA_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let api_password =
            env::var("WISTIA_PASS").map_err(|_| ApiError::missing_env("WISTIA_PASS"))?;

        let format = match env::var("WISTIA_FORMAT") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Format::default(),
        };

        let base_url = env::var("WISTIA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = env::var("WISTIA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self {
            base_url,
            api_password,
            format,
            timeout,
            ..Self::default()
        })
    }

    /// Builder-style method to set the response format
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the User-Agent header
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.api_password.is_empty() {
            return Err(ApiError::config("api_password cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
