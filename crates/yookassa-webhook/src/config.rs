use std::env;

use yookassa::webhook::{InvalidCidr, TrustedNetworks, YOOKASSA_CIDRS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Clone)]
pub struct ReceiverConfig {
    /// Interface to bind
    pub bind_addr: String,
    /// Listen port
    pub port: u16,
    /// Take the sender from the right-most `X-Forwarded-For` entry.
    /// Only enable behind a reverse proxy that sets the header.
    pub trust_forwarded_for: bool,
    /// Extra networks trusted in addition to the published YooKassa ones
    pub extra_trusted_cidrs: Vec<String>,
    /// Bearer token required for /metrics (None = /metrics disabled)
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for ReceiverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiverConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("extra_trusted_cidrs", &self.extra_trusted_cidrs)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            trust_forwarded_for: false,
            extra_trusted_cidrs: Vec::new(),
            metrics_token: None,
        }
    }
}

impl ReceiverConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let trust_forwarded_for = env::var("TRUST_FORWARDED_FOR")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let extra_trusted_cidrs: Vec<String> = env::var("EXTRA_TRUSTED_CIDRS")
            .ok()
            .map(|cidrs| {
                cidrs
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let metrics_token = env::var("METRICS_TOKEN").ok().filter(|s| !s.is_empty());

        if trust_forwarded_for {
            tracing::warn!(
                "TRUST_FORWARDED_FOR=true: sender addresses are taken from X-Forwarded-For. \
                 Only run this way behind a proxy that overwrites the header"
            );
        }
        if !extra_trusted_cidrs.is_empty() {
            tracing::warn!(
                extra = ?extra_trusted_cidrs,
                "trusting networks beyond the published YooKassa ranges"
            );
        }
        if metrics_token.is_none() {
            tracing::info!("METRICS_TOKEN not set, /metrics is disabled");
        }

        Ok(Self {
            bind_addr,
            port,
            trust_forwarded_for,
            extra_trusted_cidrs,
            metrics_token,
        })
    }

    /// Published YooKassa networks followed by any configured extras.
    pub fn trusted_networks(&self) -> Result<TrustedNetworks, InvalidCidr> {
        if self.extra_trusted_cidrs.is_empty() {
            return Ok(TrustedNetworks::yookassa().clone());
        }
        TrustedNetworks::from_cidrs(
            YOOKASSA_CIDRS
                .iter()
                .copied()
                .chain(self.extra_trusted_cidrs.iter().map(String::as_str)),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error(transparent)]
    InvalidCidr(#[from] InvalidCidr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_networks_are_the_published_ones() {
        let networks = ReceiverConfig::default().trusted_networks().unwrap();
        assert_eq!(networks.ranges(), YOOKASSA_CIDRS);
    }

    #[test]
    fn test_extra_networks_are_appended() {
        let config = ReceiverConfig {
            extra_trusted_cidrs: vec!["203.0.113.0/24".to_string()],
            ..ReceiverConfig::default()
        };
        let networks = config.trusted_networks().unwrap();
        assert_eq!(networks.len(), YOOKASSA_CIDRS.len() + 1);
        assert!(networks.is_trusted("203.0.113.9"));
        assert!(networks.is_trusted("185.71.76.5"));
    }

    #[test]
    fn test_bad_extra_network_fails() {
        let config = ReceiverConfig {
            extra_trusted_cidrs: vec!["203.0.113.0/99".to_string()],
            ..ReceiverConfig::default()
        };
        let err = config.trusted_networks().unwrap_err();
        assert_eq!(err.cidr, "203.0.113.0/99");
    }

    #[test]
    fn test_debug_redacts_metrics_token() {
        let config = ReceiverConfig {
            metrics_token: Some("s3cr3t".to_string()),
            ..ReceiverConfig::default()
        };
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }
}
