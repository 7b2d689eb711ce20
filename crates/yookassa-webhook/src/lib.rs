//! Reference receiver for YooKassa webhook notifications.
//!
//! Checks the sender address against the published YooKassa networks before
//! decoding the payload, and answers 403 to anyone else. Meant as a starting
//! point for a real integration: the accepted notification is only logged.
//!
//! # Modules
//!
//! - [`routes`]: HTTP endpoints (notification intake, trusted ranges, health, metrics)
//! - [`peer`]: sender address resolution (socket peer or `X-Forwarded-For`)
//! - [`config`]: environment configuration
//! - [`state`]: shared [`AppState`](state::AppState)
//! - [`metrics`]: Prometheus counters

pub mod config;
pub mod metrics;
pub mod peer;
pub mod routes;
pub mod security;
pub mod state;
