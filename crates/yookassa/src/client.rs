//! Shared request/response contract used by every resource handler.

use std::future::Future;

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::context::RequestContext;
use crate::error::YooKassaError;
use crate::http_client::HttpTransport;
use crate::payout::PayoutHandler;
use crate::refund::RefundHandler;

/// A single API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path without a leading slash, e.g. `payouts/po-123`.
    pub path: String,
    /// JSON body for create operations.
    pub body: Option<Vec<u8>>,
    pub query: Vec<(String, String)>,
    pub idempotency_key: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            idempotency_key: None,
        }
    }

    pub fn json_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key;
        self
    }
}

/// Raw status and body returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the authenticated exchange with the provider.
///
/// [`HttpTransport`] is the production implementation; tests substitute
/// their own to observe or script traffic.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, YooKassaError>> + Send;
}

/// YooKassa API client.
///
/// Holds no mutable state; share it by reference across handlers and tasks.
pub struct Client<T: Transport = HttpTransport> {
    transport: T,
}

impl Client<HttpTransport> {
    pub fn new(config: Config) -> Result<Self, YooKassaError> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    /// Build a client from `YOOKASSA_*` environment variables.
    pub fn from_env() -> Result<Self, YooKassaError> {
        Self::new(Config::from_env()?)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn payouts(&self) -> PayoutHandler<'_, T> {
        PayoutHandler::new(self)
    }

    pub fn refunds(&self) -> RefundHandler<'_, T> {
        RefundHandler::new(self)
    }

    /// Send a request and return the raw response, whatever its status.
    ///
    /// POST requests without an idempotency key get a fresh UUID v4 key so
    /// the provider accepts them; GET requests only carry a configured key.
    pub async fn make_request(
        &self,
        ctx: &RequestContext,
        mut request: ApiRequest,
    ) -> Result<ApiResponse, YooKassaError> {
        if ctx.is_cancelled() {
            return Err(YooKassaError::Cancelled);
        }

        if request.method == Method::POST && request.idempotency_key.is_none() {
            request.idempotency_key = Some(uuid::Uuid::new_v4().to_string());
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "sending YooKassa API request"
        );

        ctx.run(self.transport.send(request)).await
    }

    /// Send a request and decode a success body into `R`.
    ///
    /// Non-success statuses are decoded as the provider error envelope.
    pub(crate) async fn call<R: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
    ) -> Result<R, YooKassaError> {
        let path = request.path.clone();
        let response = self.make_request(ctx, request).await?;

        if !response.is_success() {
            let err = YooKassaError::from_response(response.status, &response.body);
            match err.api_error() {
                Some(api) => tracing::warn!(
                    path = %path,
                    status = response.status,
                    code = %api.code,
                    "YooKassa API returned an error"
                ),
                None => tracing::warn!(
                    path = %path,
                    status = response.status,
                    "YooKassa API returned an unreadable error body"
                ),
            }
            return Err(err);
        }

        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Build `{endpoint}/{id}`, rejecting ids that would escape the resource path.
pub(crate) fn resource_path(endpoint: &str, id: &str) -> Result<String, YooKassaError> {
    if id.is_empty() {
        return Err(YooKassaError::Validation(format!(
            "{endpoint}: empty object id"
        )));
    }
    if id == "." || id == ".." || id.contains(['/', '?', '#']) {
        return Err(YooKassaError::Validation(format!(
            "{endpoint}: invalid object id {id:?}"
        )));
    }
    Ok(format!("{endpoint}/{id}"))
}
