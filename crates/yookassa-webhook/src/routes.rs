use actix_web::{get, post, web, HttpRequest, HttpResponse};
use yookassa::webhook::Notification;

use crate::metrics;
use crate::peer::resolve_peer_ip;
use crate::security::bearer_matches;
use crate::state::AppState;

/// Register every receiver endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(trusted_ranges)
        .service(metrics_endpoint)
        .service(receive_notification);
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "yookassa-webhook",
    }))
}

/// Networks accepted as senders, for firewall configuration.
#[get("/trusted-ranges")]
pub async fn trusted_ranges(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "ranges": state.networks.ranges(),
    }))
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let Some(ref token) = state.metrics_token else {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "forbidden",
            "message": "Set METRICS_TOKEN to enable /metrics"
        }));
    };

    let header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok());
    if !bearer_matches(header, token) {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "unauthorized",
            "message": "Valid Bearer token required for /metrics"
        }));
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}

/// Accept a notification only from a trusted sender address.
#[post("/webhooks/yookassa")]
pub async fn receive_notification(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> HttpResponse {
    let peer = resolve_peer_ip(&req, state.trust_forwarded_for);
    let trusted = peer.map(|ip| state.networks.contains(ip)).unwrap_or(false);

    if !trusted {
        tracing::warn!(peer = ?peer, "notification rejected: sender address not trusted");
        metrics::record("untrusted_ip");
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "forbidden",
            "message": "sender address is not trusted"
        }));
    }

    let notification = match Notification::from_slice(&body) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(peer = ?peer, error = %e, "notification rejected: invalid payload");
            metrics::record("invalid_payload");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_payload",
                "message": "body is not a YooKassa notification"
            }));
        }
    };

    tracing::info!(
        peer = ?peer,
        event = %notification.event,
        object_id = notification.object_id().unwrap_or_default(),
        "notification accepted"
    );
    metrics::record("accepted");

    HttpResponse::Ok().json(serde_json::json!({
        "status": "accepted",
        "event": notification.event.as_str(),
    }))
}
