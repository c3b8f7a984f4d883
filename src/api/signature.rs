use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::error;

/// Header LINE signs every webhook delivery with.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

/// Check `signature` against the base64 HMAC-SHA256 of `request_body`.
pub fn verify_line_signature(request_body: &str, signature: &str, channel_secret: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        error!("Signature header is not valid base64");
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return false;
        }
    };
    mac.update(request_body.as_bytes());

    if mac.verify_slice(&expected).is_ok() {
        true
    } else {
        error!("LINE signature verification failed");
        false
    }
}

pub fn compute_signature(request_body: &str, channel_secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(request_body.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
