//! Client for the YooKassa payment API.
//!
//! Covers payouts (SBP), refunds, and verification of inbound webhook
//! notifications by sender IP.
//!
//! # Pieces
//!
//! - [`Client`]: authenticated request/response exchange over a [`Transport`]
//!   ([`HttpTransport`] in production)
//! - [`PayoutHandler`] / [`RefundHandler`]: typed resource operations
//! - [`RequestContext`]: per-call cancellation and deadline
//! - [`webhook`]: trusted sender networks and notification payloads
//!
//! # Quick example
//!
//! ```no_run
//! use yookassa::{Amount, Client, Config, Payout, RequestContext};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), yookassa::YooKassaError> {
//! let client = Client::new(Config::new("123456", "live_secret"))?;
//! let ctx = RequestContext::background();
//!
//! let banks = client.payouts().get_sbp_banks(&ctx).await?;
//! let payout = Payout::sbp(Amount::rub("320.00"), "79000000000", &banks[0].bank_id);
//!
//! let created = client
//!     .payouts()
//!     .with_idempotency_key("withdrawal-42")
//!     .create_payout(&ctx, &payout)
//!     .await?;
//! println!("payout {:?} is {:?}", created.id, created.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod http_client;
pub mod payout;
pub mod refund;
pub mod webhook;

// Re-exports
pub use client::{ApiRequest, ApiResponse, Client, Transport};
pub use common::{Amount, CancellationDetails, DealRef};
pub use config::{Config, ConfigError};
pub use context::RequestContext;
pub use error::{ApiError, YooKassaError};
pub use http_client::HttpTransport;
pub use payout::{
    BankCard, Payout, PayoutDestination, PayoutHandler, PayoutStatus, SbpBank, SbpBankList,
};
pub use refund::{Refund, RefundHandler, RefundList, RefundListFilter, RefundStatus};
pub use webhook::{is_notification_ip_trusted, trusted_ip_ranges, TrustedNetworks};

pub use tokio_util::sync::CancellationToken;
