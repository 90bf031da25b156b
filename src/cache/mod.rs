pub mod range;
pub mod ratio;

use serde::{Deserialize, Serialize};

/// A cached value plus the time it was fetched.
///
/// Single-writer, multi-reader. `fetched_at_ms` only moves forward; the
/// swap guard in each cache rejects older entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at_ms: u64,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at_ms: u64) -> Self {
        Self {
            value,
            fetched_at_ms,
        }
    }

    /// Whether the entry is still within its TTL at `now_ms`.
    pub fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.fetched_at_ms) < ttl_ms
    }
}
