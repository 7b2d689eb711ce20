use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by YooKassa client operations.
#[derive(Debug, Error)]
pub enum YooKassaError {
    /// The payout destination type cannot be created through this client.
    #[error("unsupported payout type: {0}")]
    UnsupportedPayoutType(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider rejected the request with a structured error envelope.
    #[error("api error (HTTP {status}): {error}")]
    Api { status: u16, error: ApiError },

    /// A response body (success or error envelope) could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl YooKassaError {
    /// Build the error for a non-success response.
    ///
    /// A body that is not a valid provider envelope becomes [`YooKassaError::Decode`],
    /// so callers can tell a rejected request from an unreadable reply.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiError>(body) {
            Ok(error) => YooKassaError::Api { status, error },
            Err(e) => YooKassaError::Decode(e),
        }
    }

    /// The provider envelope, if this is a provider-reported error.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            YooKassaError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, YooKassaError::Cancelled)
    }

    /// Connection, timeout, or cancellation failures.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            YooKassaError::Http(_) | YooKassaError::Cancelled | YooKassaError::Timeout(_)
        )
    }
}

/// Error envelope returned by the YooKassa API on non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Error category, e.g. `invalid_request` or `not_found`.
    pub code: String,
    #[serde(default)]
    pub description: String,
    /// Name of the offending request parameter, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Suggested delay in milliseconds before repeating the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        if let Some(ref parameter) = self.parameter {
            write!(f, " (parameter: {parameter})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_envelope_decodes_to_api_error() {
        let body = br#"{
            "type": "error",
            "id": "ab5a11cd-13cc-4e33-af8b-75a74e18dd09",
            "code": "invalid_request",
            "description": "Idempotence key duplicated",
            "parameter": "Idempotence-Key"
        }"#;

        let err = YooKassaError::from_response(400, body);
        let api = err.api_error().expect("expected api error");
        assert_eq!(api.code, "invalid_request");
        assert_eq!(api.parameter.as_deref(), Some("Idempotence-Key"));
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "api error (HTTP 400): invalid_request: Idempotence key duplicated (parameter: Idempotence-Key)"
        );
    }

    #[test]
    fn test_envelope_without_code_is_decode_error() {
        let err = YooKassaError::from_response(500, br#"{"description":"oops"}"#);
        assert!(matches!(err, YooKassaError::Decode(_)));
    }

    #[test]
    fn test_non_json_error_body_is_decode_error() {
        let err = YooKassaError::from_response(502, b"<html>Bad Gateway</html>");
        assert!(matches!(err, YooKassaError::Decode(_)));
        assert!(err.api_error().is_none());
    }

    #[test]
    fn test_transport_classification() {
        assert!(YooKassaError::Cancelled.is_transport());
        assert!(YooKassaError::Cancelled.is_cancelled());
        assert!(YooKassaError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(!YooKassaError::UnsupportedPayoutType("bank_card".into()).is_transport());
    }
}
