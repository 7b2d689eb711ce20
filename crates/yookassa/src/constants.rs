use std::time::Duration;

/// Production YooKassa API base URL (v3).
pub const API_URL: &str = "https://api.yookassa.ru/v3";

/// Default per-request timeout applied by [`crate::HttpTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the idempotency key on mutating requests.
pub const IDEMPOTENCE_KEY_HEADER: &str = "Idempotence-Key";

pub const SBP_BANKS_ENDPOINT: &str = "sbp_banks";
pub const PAYOUTS_ENDPOINT: &str = "payouts";
pub const REFUNDS_ENDPOINT: &str = "refunds";
