//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a source document URL.
///
/// The URL is hashed exactly as received, query string included.
pub fn compute_cache_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
