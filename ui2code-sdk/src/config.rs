//! SDK configuration
//!
//! Connection, authentication and retry settings for the model API client.

use crate::error::{SdkError, SdkResult};
use std::time::Duration;

/// Default endpoint root, overridable with [`API_BASE_ENV`].
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the bearer token.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the endpoint root.
pub const API_BASE_ENV: &str = "OPENAI_API_BASE";

/// Configuration for the SDK client
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Base URL for the API, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Authentication method
    pub auth: AuthConfig,

    /// Request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_initial_backoff: Duration,

    /// Maximum backoff duration for retries
    pub retry_max_backoff: Duration,

    /// User agent string
    pub user_agent: String,

    /// Enable request/response logging
    pub enable_logging: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: AuthConfig::None,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_initial_backoff: Duration::from_millis(500),
            retry_max_backoff: Duration::from_secs(30),
            user_agent: format!("ui2code-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Configuration from `OPENAI_API_BASE` and `OPENAI_API_KEY`.
    ///
    /// A missing key leaves auth unset; the API will reject the request.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = Self::new(base_url);
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => config.with_bearer_token(key),
            _ => config,
        }
    }

    /// Set the bearer token for authentication
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::BearerToken(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the retry backoff configuration
    pub fn with_retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_initial_backoff = initial;
        self.retry_max_backoff = max;
        self
    }

    /// Enable request/response logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        // Validate URL format
        url::Url::parse(&self.base_url)?;

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Authentication configuration
#[derive(Clone)]
pub enum AuthConfig {
    /// No authentication
    None,

    /// `Authorization: Bearer <token>`
    BearerToken(String),
}

impl AuthConfig {
    /// Check if authentication is configured
    pub fn is_configured(&self) -> bool {
        !matches!(self, AuthConfig::None)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::BearerToken(_) => f.write_str("BearerToken(***)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SdkConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.max_retries, 0);
        assert!(config.timeout.is_none());
        assert!(!config.auth.is_configured());
    }

    #[test]
    fn test_config_setters() {
        let config = SdkConfig::new("https://llm.internal/v1")
            .with_bearer_token("test-key")
            .with_timeout(Duration::from_secs(60))
            .with_max_retries(2);

        assert_eq!(config.base_url, "https://llm.internal/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.max_retries, 2);
        assert!(config.auth.is_configured());
    }

    #[test]
    fn test_debug_hides_token() {
        let config = SdkConfig::default().with_bearer_token("sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(SdkConfig::new("").validate().is_err());
        assert!(SdkConfig::new("not a url").validate().is_err());
        assert!(SdkConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
