//! Inbound webhook support: sender verification and payload decoding.

pub mod notification;
pub mod verification;

pub use notification::{Notification, NotificationEvent};
pub use verification::{
    is_notification_ip_trusted, trusted_ip_ranges, InvalidCidr, TrustedNetworks, YOOKASSA_CIDRS,
};
