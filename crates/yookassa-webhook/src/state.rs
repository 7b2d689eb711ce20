use yookassa::TrustedNetworks;

use crate::config::{ConfigError, ReceiverConfig};

/// Shared, read-only state for the receiver.
pub struct AppState {
    /// Networks allowed to deliver notifications. Never mutated after startup.
    pub networks: TrustedNetworks,
    pub trust_forwarded_for: bool,
    /// Bearer token for /metrics; `None` disables the endpoint.
    pub metrics_token: Option<Vec<u8>>,
}

impl AppState {
    pub fn from_config(config: &ReceiverConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            networks: config.trusted_networks()?,
            trust_forwarded_for: config.trust_forwarded_for,
            metrics_token: config
                .metrics_token
                .as_ref()
                .map(|t| t.as_bytes().to_vec()),
        })
    }
}
