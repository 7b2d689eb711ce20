use serde::{Deserialize, Serialize};

/// Monetary amount as the API represents it: a decimal string plus ISO-4217 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Decimal value with a dot separator, e.g. `"100.00"`.
    pub value: String,
    pub currency: String,
}

impl Amount {
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }

    /// Amount in Russian rubles.
    pub fn rub(value: impl Into<String>) -> Self {
        Self::new(value, "RUB")
    }
}

/// Why an operation ended in the `canceled` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationDetails {
    /// Who canceled it: `yoo_kassa`, `payment_network`, `merchant`, ...
    pub party: String,
    pub reason: String,
}

/// Safe deal the operation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRef {
    pub id: String,
}
