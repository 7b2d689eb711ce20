use std::net::IpAddr;

use actix_web::HttpRequest;

/// Address the notification came from.
///
/// With `trust_forwarded_for`, the right-most `X-Forwarded-For` entry wins,
/// since that is the one written by our own proxy. Repeated header lines are
/// joined in order first. An unreadable header or an entry that is not a bare
/// IP yields `None`, which callers must treat as untrusted.
pub fn resolve_peer_ip(req: &HttpRequest, trust_forwarded_for: bool) -> Option<IpAddr> {
    if trust_forwarded_for {
        let mut last = None;
        for value in req.headers().get_all("x-forwarded-for") {
            let value = value.to_str().ok()?;
            if let Some(entry) = value.rsplit(',').next() {
                last = Some(entry.trim());
            }
        }
        if let Some(entry) = last {
            return entry.parse().ok();
        }
    }
    req.peer_addr().map(|addr| addr.ip())
}
