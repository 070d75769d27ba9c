//! Content hashing for fallback record keys.

use xxhash_rust::xxh3::xxh3_64;

/// Stable 64-bit hash of `data`; identical across runs and platforms.
#[must_use]
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}
