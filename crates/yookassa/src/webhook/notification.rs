//! Notification payloads delivered to the merchant's webhook URL.

use serde::{Deserialize, Serialize};

use crate::error::YooKassaError;
use crate::payout::Payout;
use crate::refund::Refund;

/// Event names the API can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationEvent {
    #[serde(rename = "payment.waiting_for_capture")]
    PaymentWaitingForCapture,
    #[serde(rename = "payment.succeeded")]
    PaymentSucceeded,
    #[serde(rename = "payment.canceled")]
    PaymentCanceled,
    #[serde(rename = "payout.succeeded")]
    PayoutSucceeded,
    #[serde(rename = "payout.canceled")]
    PayoutCanceled,
    #[serde(rename = "refund.succeeded")]
    RefundSucceeded,
    #[serde(rename = "deal.closed")]
    DealClosed,
    #[serde(other)]
    Unknown,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::PaymentWaitingForCapture => "payment.waiting_for_capture",
            NotificationEvent::PaymentSucceeded => "payment.succeeded",
            NotificationEvent::PaymentCanceled => "payment.canceled",
            NotificationEvent::PayoutSucceeded => "payout.succeeded",
            NotificationEvent::PayoutCanceled => "payout.canceled",
            NotificationEvent::RefundSucceeded => "refund.succeeded",
            NotificationEvent::DealClosed => "deal.closed",
            NotificationEvent::Unknown => "unknown",
        }
    }

    /// Kind of object carried in [`Notification::object`].
    pub fn object_kind(&self) -> Option<&'static str> {
        match self {
            NotificationEvent::PaymentWaitingForCapture
            | NotificationEvent::PaymentSucceeded
            | NotificationEvent::PaymentCanceled => Some("payment"),
            NotificationEvent::PayoutSucceeded | NotificationEvent::PayoutCanceled => {
                Some("payout")
            }
            NotificationEvent::RefundSucceeded => Some("refund"),
            NotificationEvent::DealClosed => Some("deal"),
            NotificationEvent::Unknown => None,
        }
    }
}

impl std::fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification envelope: `{"type": "notification", "event": ..., "object": {...}}`.
///
/// Check the sender with [`super::is_notification_ip_trusted`] before acting on it,
/// and re-fetch the object through the API when the amount matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: NotificationEvent,
    pub object: serde_json::Value,
}

impl Notification {
    pub fn from_slice(body: &[u8]) -> Result<Self, YooKassaError> {
        let notification: Notification = serde_json::from_slice(body)?;
        if notification.kind != "notification" {
            return Err(YooKassaError::Validation(format!(
                "unexpected envelope type {:?}",
                notification.kind
            )));
        }
        Ok(notification)
    }

    /// Id of the carried object, if present.
    pub fn object_id(&self) -> Option<&str> {
        self.object.get("id").and_then(serde_json::Value::as_str)
    }

    pub fn payout(&self) -> Result<Payout, YooKassaError> {
        self.expect_kind("payout")?;
        Ok(serde_json::from_value(self.object.clone())?)
    }

    pub fn refund(&self) -> Result<Refund, YooKassaError> {
        self.expect_kind("refund")?;
        Ok(serde_json::from_value(self.object.clone())?)
    }

    fn expect_kind(&self, kind: &str) -> Result<(), YooKassaError> {
        if self.event.object_kind() == Some(kind) {
            Ok(())
        } else {
            Err(YooKassaError::Validation(format!(
                "event {} does not carry a {kind}",
                self.event
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::PayoutStatus;

    const PAYOUT_SUCCEEDED: &str = r#"{
        "type": "notification",
        "event": "payout.succeeded",
        "object": {
            "id": "po-285ec15d-0003-5000-a000-08d1bec7dade",
            "amount": {"value": "2.00", "currency": "RUB"},
            "status": "succeeded",
            "payout_destination": {"type": "sbp", "phone": "79000000000", "bank_id": "100000000111"},
            "created_at": "2021-06-21T14:28:45.132Z",
            "test": true
        }
    }"#;

    #[test]
    fn test_payout_notification() {
        let notification = Notification::from_slice(PAYOUT_SUCCEEDED.as_bytes()).unwrap();
        assert_eq!(notification.event, NotificationEvent::PayoutSucceeded);
        assert_eq!(
            notification.object_id(),
            Some("po-285ec15d-0003-5000-a000-08d1bec7dade")
        );

        let payout = notification.payout().unwrap();
        assert_eq!(payout.status, Some(PayoutStatus::Succeeded));
        assert!(matches!(
            notification.refund(),
            Err(YooKassaError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_event_is_tolerated() {
        let body = br#"{"type":"notification","event":"payment_method.active","object":{"id":"pm-1"}}"#;
        let notification = Notification::from_slice(body).unwrap();
        assert_eq!(notification.event, NotificationEvent::Unknown);
        assert!(notification.payout().is_err());
    }

    #[test]
    fn test_wrong_envelope_type() {
        let body = br#"{"type":"list","event":"refund.succeeded","object":{}}"#;
        assert!(matches!(
            Notification::from_slice(body),
            Err(YooKassaError::Validation(_))
        ));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            Notification::from_slice(b"{"),
            Err(YooKassaError::Decode(_))
        ));
    }
}
