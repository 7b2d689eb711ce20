use std::env;
use std::time::Duration;

use url::Url;

use crate::constants::{API_URL, DEFAULT_TIMEOUT};

/// Credentials and endpoint settings for a YooKassa shop.
#[derive(Clone)]
pub struct Config {
    /// Shop identifier, used as the Basic auth username
    pub shop_id: String,
    /// Secret API key, used as the Basic auth password
    pub secret_key: String,
    /// API base URL without a trailing slash
    pub api_url: String,
    /// Per-request timeout enforced by the HTTP transport
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("shop_id", &self.shop_id)
            .field("secret_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn new(shop_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            secret_key: secret_key.into(),
            api_url: API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different API base URL (e.g. a local mock).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_url = normalize_url(api_url.into())?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from `YOOKASSA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let shop_id = env::var("YOOKASSA_SHOP_ID")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingRequired("YOOKASSA_SHOP_ID"))?;

        let secret_key = env::var("YOOKASSA_SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingRequired("YOOKASSA_SECRET_KEY"))?;

        // Optional: API base URL
        let api_url = normalize_url(
            env::var("YOOKASSA_API_URL").unwrap_or_else(|_| API_URL.to_string()),
        )?;

        // Optional: request timeout
        let timeout = match env::var("YOOKASSA_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue("YOOKASSA_TIMEOUT_SECS", raw))?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            shop_id,
            secret_key,
            api_url,
            timeout,
        })
    }
}

fn normalize_url(raw: String) -> Result<String, ConfigError> {
    let parsed = Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl(raw.clone()))?;
    if parsed.scheme() != "https" {
        tracing::warn!(api_url = %raw, "YooKassa API URL does not use HTTPS");
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
