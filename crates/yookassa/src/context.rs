//! Per-call cancellation and deadline handling.
//!
//! Every handler operation takes a [`RequestContext`]. Dropping the returned
//! future also abandons the request; the context covers the cases where the
//! caller cannot hold on to the future (shutdown signals, request-scoped
//! deadlines shared across several calls).

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::YooKassaError;

/// Cancellation token and optional timeout propagated to the transport.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: Option<CancellationToken>,
    timeout: Option<Duration>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token: Some(token),
            timeout: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: None,
            timeout: Some(timeout),
        }
    }

    /// Add (or replace) the deadline on an existing context.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.token
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }

    /// Drive `fut` to completion unless the token fires or the timeout elapses first.
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, YooKassaError>
    where
        F: Future<Output = Result<T, YooKassaError>>,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(YooKassaError::Timeout(limit)),
                },
                None => fut.await,
            }
        };

        match self.token {
            Some(ref token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(YooKassaError::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_context_passes_result_through() {
        let ctx = RequestContext::background();
        assert!(!ctx.is_cancelled());
        let value = ctx.run(async { Ok::<_, YooKassaError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancelled_token_wins_over_pending_future() {
        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(token.clone());
        token.cancel();
        assert!(ctx.is_cancelled());

        let result = ctx
            .run(std::future::pending::<Result<(), YooKassaError>>())
            .await;
        assert!(matches!(result, Err(YooKassaError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_while_in_flight() {
        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = ctx
            .run(std::future::pending::<Result<(), YooKassaError>>())
            .await;
        assert!(matches!(result, Err(YooKassaError::Cancelled)));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_elapses() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(10));
        let result = ctx
            .run(std::future::pending::<Result<(), YooKassaError>>())
            .await;
        assert!(matches!(result, Err(YooKassaError::Timeout(d)) if d == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_inner_error_is_preserved() {
        let ctx = RequestContext::with_cancellation(CancellationToken::new())
            .timeout(Duration::from_secs(5));
        let result: Result<(), _> = ctx
            .run(async { Err(YooKassaError::Validation("bad".into())) })
            .await;
        assert!(matches!(result, Err(YooKassaError::Validation(_))));
    }
}
