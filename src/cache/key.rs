//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Generate a deterministic cache key for an executed request.
///
/// The key is a SHA-256 hash of the upper-cased method, the URL and the
/// request body, so the same request always lands on the same entry.
pub fn cache_key(method: &str, url: &str, body: Option<&str>) -> String {
    let mut hasher = Sha256::new();

    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");

    if let Some(body) = body {
        hasher.update(body.as_bytes());
    }

    format!("{:x}", hasher.finalize())
}
