//! reqwest-backed [`Transport`] talking to the real YooKassa API.

use crate::client::{ApiRequest, ApiResponse, Transport};
use crate::config::Config;
use crate::constants::IDEMPOTENCE_KEY_HEADER;
use crate::error::YooKassaError;

/// Authenticated HTTP transport.
///
/// Every request uses HTTP Basic auth with the shop id and secret key.
pub struct HttpTransport {
    http: reqwest::Client,
    config: Config,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(config: Config) -> Result<Self, YooKassaError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http, config })
    }

    /// Use a caller-supplied reqwest client (proxies, custom TLS roots).
    pub fn with_http_client(config: Config, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, YooKassaError> {
        let mut builder = self
            .http
            .request(request.method, self.url(&request.path))
            .basic_auth(&self.config.shop_id, Some(&self.config.secret_key));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(ref key) = request.idempotency_key {
            builder = builder.header(IDEMPOTENCE_KEY_HEADER, key);
        }

        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = Config::new("1", "s")
            .with_api_url("https://api.example.test/v3/")
            .unwrap();
        let transport = HttpTransport::new(config).unwrap();
        assert_eq!(
            transport.url("payouts/po-1"),
            "https://api.example.test/v3/payouts/po-1"
        );
        assert_eq!(
            transport.url("/refunds"),
            "https://api.example.test/v3/refunds"
        );
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let transport = HttpTransport::new(Config::new("shop", "top-secret")).unwrap();
        assert!(!format!("{transport:?}").contains("top-secret"));
    }
}
