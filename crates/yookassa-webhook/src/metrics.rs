use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

/// Registry holding only this service's metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static NOTIFICATIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "yookassa_webhook_notifications_total",
            "Inbound notifications by outcome",
        ),
        &["result"],
    )
    .expect("notification counter options are valid");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("notification counter registers once");
    counter
});

pub fn record(result: &str) {
    NOTIFICATIONS.with_label_values(&[result]).inc();
}

/// Text exposition of [`REGISTRY`].
pub fn metrics_output() -> String {
    LazyLock::force(&NOTIFICATIONS);
    let mut buffer = Vec::new();
    if TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buffer)
        .is_err()
    {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
