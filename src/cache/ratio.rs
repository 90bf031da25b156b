use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::CacheEntry;
use crate::market::PriceSource;
use crate::market::types::SpotQuote;
use crate::time::Clock;

/// Short-TTL cache over the spot ratio.
///
/// Freshness and fallback policy:
/// - an entry younger than the TTL is served without a network call
/// - a stale entry triggers exactly one refresh through the price source
/// - a failed refresh falls back to the previous value if one exists
///
/// The lock is only held for read/swap, never across an await.
pub struct RatioCache {
    source: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    ttl_ms: u64,
    entry: Mutex<Option<CacheEntry<SpotQuote>>>,
}

impl RatioCache {
    pub fn new(source: Arc<dyn PriceSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl_ms: ttl.as_millis() as u64,
            entry: Mutex::new(None),
        }
    }

    /// Current (ratio, base price), refreshing if the entry went stale.
    ///
    /// `(None, None)` only when no fetch has ever succeeded.
    pub async fn current(&self) -> (Option<f64>, Option<f64>) {
        let now = self.clock.now_ms();

        if let Some(entry) = *self.entry.lock() {
            if entry.is_fresh(now, self.ttl_ms) {
                debug!(
                    age_ms = now.saturating_sub(entry.fetched_at_ms),
                    "serving cached spot ratio"
                );
                return (Some(entry.value.ratio), Some(entry.value.base_price));
            }
        }

        match self.source.spot_ratio().await {
            Ok(quote) => {
                self.store(CacheEntry::new(quote, self.clock.now_ms()));
                (Some(quote.ratio), Some(quote.base_price))
            }
            Err(e) => {
                warn!(error = %e, "spot refresh failed; serving last known value");
                match *self.entry.lock() {
                    Some(entry) => (Some(entry.value.ratio), Some(entry.value.base_price)),
                    None => (None, None),
                }
            }
        }
    }

    /// Last entry, fresh or stale. Used for snapshot persistence.
    pub fn snapshot(&self) -> Option<CacheEntry<SpotQuote>> {
        *self.entry.lock()
    }

    /// Seed the cache from a persisted snapshot.
    pub fn restore(&self, entry: CacheEntry<SpotQuote>) {
        self.store(entry);
    }

    fn store(&self, new: CacheEntry<SpotQuote>) {
        let mut guard = self.entry.lock();
        // fetched_at_ms only moves forward.
        match *guard {
            Some(cur) if cur.fetched_at_ms > new.fetched_at_ms => {}
            _ => *guard = Some(new),
        }
    }
}
