//! Refunds: creation, lookup by id, filtered listing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{resource_path, ApiRequest, Client, Transport};
use crate::common::{Amount, CancellationDetails, DealRef};
use crate::constants::REFUNDS_ENDPOINT;
use crate::context::RequestContext;
use crate::error::YooKassaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Pending,
    Succeeded,
    Canceled,
}

/// Refund object, used both as the create request and the API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Payment being refunded.
    pub payment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RefundStatus>,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_details: Option<CancellationDetails>,
    /// Fiscal receipt state: `pending`, `succeeded` or `canceled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<DealRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl Refund {
    pub fn new(payment_id: impl Into<String>, amount: Amount) -> Self {
        Self {
            id: None,
            payment_id: payment_id.into(),
            status: None,
            amount,
            description: None,
            created_at: None,
            cancellation_details: None,
            receipt_registration: None,
            deal: None,
            metadata: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One page of refunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundList {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub items: Vec<Refund>,
    /// Pass back as [`RefundListFilter::cursor`] to fetch the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query filter for [`RefundHandler::find_refunds`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefundListFilter {
    #[serde(rename = "created_at.gte", skip_serializing_if = "Option::is_none")]
    pub created_at_gte: Option<DateTime<Utc>>,
    #[serde(rename = "created_at.gt", skip_serializing_if = "Option::is_none")]
    pub created_at_gt: Option<DateTime<Utc>>,
    #[serde(rename = "created_at.lte", skip_serializing_if = "Option::is_none")]
    pub created_at_lte: Option<DateTime<Utc>>,
    #[serde(rename = "created_at.lt", skip_serializing_if = "Option::is_none")]
    pub created_at_lt: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RefundStatus>,
    /// Page size, 1..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl RefundListFilter {
    /// Flatten the filter into query pairs through its JSON form.
    pub fn to_query(&self) -> Result<Vec<(String, String)>, YooKassaError> {
        let serde_json::Value::Object(map) = serde_json::to_value(self)? else {
            return Err(YooKassaError::Validation(
                "refund filter must serialize to an object".to_string(),
            ));
        };

        Ok(map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect())
    }
}

/// Refund operations bound to a [`Client`].
pub struct RefundHandler<'c, T: Transport> {
    client: &'c Client<T>,
    idempotency_key: Option<String>,
}

impl<'c, T: Transport> RefundHandler<'c, T> {
    pub fn new(client: &'c Client<T>) -> Self {
        Self {
            client,
            idempotency_key: None,
        }
    }

    /// Copy of this handler that sends `key` as the idempotency key.
    pub fn with_idempotency_key(&self, key: impl Into<String>) -> Self {
        Self {
            client: self.client,
            idempotency_key: Some(key.into()),
        }
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    pub async fn create_refund(
        &self,
        ctx: &RequestContext,
        refund: &Refund,
    ) -> Result<Refund, YooKassaError> {
        let body = serde_json::to_vec(refund)?;
        let request = ApiRequest::new(Method::POST, REFUNDS_ENDPOINT)
            .json_body(body)
            .idempotency_key(self.idempotency_key.clone());
        let created: Refund = self.client.call(ctx, request).await?;

        tracing::info!(
            refund_id = created.id.as_deref().unwrap_or_default(),
            payment_id = %created.payment_id,
            status = ?created.status,
            "refund created"
        );
        Ok(created)
    }

    pub async fn find_refund(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Refund, YooKassaError> {
        let request = ApiRequest::new(Method::GET, resource_path(REFUNDS_ENDPOINT, id)?)
            .idempotency_key(self.idempotency_key.clone());
        self.client.call(ctx, request).await
    }

    pub async fn find_refunds(
        &self,
        ctx: &RequestContext,
        filter: &RefundListFilter,
    ) -> Result<RefundList, YooKassaError> {
        let request = ApiRequest::new(Method::GET, REFUNDS_ENDPOINT)
            .query(filter.to_query()?)
            .idempotency_key(self.idempotency_key.clone());
        self.client.call(ctx, request).await
    }
}
