//! Webhook HMAC-SHA256 signature verification.
//!
//! The payment provider signs the exact raw request body with a shared secret
//! and sends the hex digest in the `X-Signature` header. Verification must
//! run on the raw bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a hex-encoded HMAC-SHA256 signature over the raw body.
///
/// Returns `false` for malformed hex as well as a digest mismatch. The digest
/// comparison is constant-time via the `Mac` verifier.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    mac_for(secret, body).verify_slice(&expected).is_ok()
}

/// Compute the hex HMAC-SHA256 signature for a body.
///
/// Counterpart of [`verify_signature`]; used by tests and delivery tooling.
pub fn sign(secret: &str, body: &[u8]) -> String {
    hex::encode(mac_for(secret, body).finalize().into_bytes())
}

fn mac_for(secret: &str, body: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac
}
