//! Payouts: SBP bank directory, payout creation and lookup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{resource_path, ApiRequest, Client, Transport};
use crate::common::{Amount, CancellationDetails, DealRef};
use crate::constants::{PAYOUTS_ENDPOINT, SBP_BANKS_ENDPOINT};
use crate::context::RequestContext;
use crate::error::YooKassaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Succeeded,
    Canceled,
}

/// Where the money goes, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutDestination {
    /// Fast Payments System transfer to a phone number.
    Sbp {
        phone: String,
        bank_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recipient_checked: Option<bool>,
    },
    BankCard {
        card: BankCard,
    },
    YooMoney {
        account_number: String,
    },
    #[serde(other)]
    Unknown,
}

impl PayoutDestination {
    /// Wire name of the destination type.
    pub fn kind(&self) -> &'static str {
        match self {
            PayoutDestination::Sbp { .. } => "sbp",
            PayoutDestination::BankCard { .. } => "bank_card",
            PayoutDestination::YooMoney { .. } => "yoo_money",
            PayoutDestination::Unknown => "unknown",
        }
    }
}

/// Card details; `number` is sent on requests, the rest comes back masked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
}

/// Payout object, used both as the create request and the API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PayoutStatus>,
    /// Destination supplied when creating a payout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_destination_data: Option<PayoutDestination>,
    /// Destination as reported back by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_destination: Option<PayoutDestination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal: Option<DealRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_details: Option<CancellationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
}

impl Payout {
    /// Payout request to a phone number through SBP.
    pub fn sbp(amount: Amount, phone: impl Into<String>, bank_id: impl Into<String>) -> Self {
        Self {
            id: None,
            amount,
            status: None,
            payout_destination_data: Some(PayoutDestination::Sbp {
                phone: phone.into(),
                bank_id: bank_id.into(),
                recipient_checked: None,
            }),
            payout_destination: None,
            description: None,
            created_at: None,
            deal: None,
            cancellation_details: None,
            metadata: None,
            test: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A bank participating in SBP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbpBank {
    pub bank_id: String,
    pub name: String,
    pub bic: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SbpBankList {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub items: Vec<SbpBank>,
}

/// Only SBP payouts can be created through this client.
fn check_supported_destination(payout: &Payout) -> Result<(), YooKassaError> {
    match payout.payout_destination_data {
        Some(PayoutDestination::Sbp { .. }) => Ok(()),
        Some(ref other) => Err(YooKassaError::UnsupportedPayoutType(
            other.kind().to_string(),
        )),
        None => Err(YooKassaError::UnsupportedPayoutType("none".to_string())),
    }
}

/// Payout operations bound to a [`Client`].
pub struct PayoutHandler<'c, T: Transport> {
    client: &'c Client<T>,
    idempotency_key: Option<String>,
}

impl<'c, T: Transport> PayoutHandler<'c, T> {
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

    /// List banks available as SBP payout destinations.
    pub async fn get_sbp_banks(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<SbpBank>, YooKassaError> {
        let request = ApiRequest::new(Method::GET, SBP_BANKS_ENDPOINT)
            .idempotency_key(self.idempotency_key.clone());
        let list: SbpBankList = self.client.call(ctx, request).await?;
        Ok(list.items)
    }

    /// Create a payout. Fails locally, without contacting the API, unless the
    /// destination is SBP.
    pub async fn create_payout(
        &self,
        ctx: &RequestContext,
        payout: &Payout,
    ) -> Result<Payout, YooKassaError> {
        check_supported_destination(payout)?;

        let body = serde_json::to_vec(payout)?;
        let request = ApiRequest::new(Method::POST, PAYOUTS_ENDPOINT)
            .json_body(body)
            .idempotency_key(self.idempotency_key.clone());
        let created: Payout = self.client.call(ctx, request).await?;

        tracing::info!(
            payout_id = created.id.as_deref().unwrap_or_default(),
            status = ?created.status,
            "payout created"
        );
        Ok(created)
    }

    pub async fn get_payout(
        &self,
        ctx: &RequestContext,
        payout_id: &str,
    ) -> Result<Payout, YooKassaError> {
        let request = ApiRequest::new(Method::GET, resource_path(PAYOUTS_ENDPOINT, payout_id)?)
            .idempotency_key(self.idempotency_key.clone());
        self.client.call(ctx, request).await
    }
}
