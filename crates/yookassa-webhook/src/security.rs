use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Check an `Authorization: Bearer <token>` header value against `expected`.
///
/// Both sides are hashed before the constant-time comparison so timing
/// reveals neither content nor length.
pub fn bearer_matches(header: Option<&str>, expected: &[u8]) -> bool {
    let Some(presented) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return false;
    };
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected);
    presented.ct_eq(&expected).into()
}
