use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::CacheEntry;
use crate::market::PriceSource;
use crate::market::coingecko::errors::PriceError;
use crate::market::types::{PricePoint, TrackedPair, WeekRange, round2};
use crate::time::Clock;

const YEAR_SECS: u64 = 365 * 24 * 60 * 60;

/// Long-TTL cache over the 52-week ratio range.
///
/// Same freshness and fallback policy as [`RatioCache`], but a refresh is
/// two market-chart calls spanning the trailing 365 days.
///
/// [`RatioCache`]: crate::cache::ratio::RatioCache
pub struct RangeCache {
    source: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    pair: TrackedPair,
    ttl_ms: u64,
    entry: Mutex<Option<CacheEntry<WeekRange>>>,
}

impl RangeCache {
    pub fn new(
        source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
        pair: TrackedPair,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            pair,
            ttl_ms: ttl.as_millis() as u64,
            entry: Mutex::new(None),
        }
    }

    /// 52-week (low, high), refreshing if the entry went stale.
    ///
    /// `(None, None)` only when no refresh has ever produced a valid pair.
    pub async fn week_range(&self) -> (Option<f64>, Option<f64>) {
        let now = self.clock.now_ms();

        if let Some(entry) = *self.entry.lock() {
            if entry.is_fresh(now, self.ttl_ms) {
                debug!(
                    age_ms = now.saturating_sub(entry.fetched_at_ms),
                    "serving cached 52-week range"
                );
                return (Some(entry.value.low), Some(entry.value.high));
            }
        }

        match self.refresh().await {
            Ok(range) => {
                self.store(CacheEntry::new(range, self.clock.now_ms()));
                (Some(range.low), Some(range.high))
            }
            Err(e) => {
                warn!(error = %e, "range refresh failed; serving last known value");
                match *self.entry.lock() {
                    Some(entry) => (Some(entry.value.low), Some(entry.value.high)),
                    None => (None, None),
                }
            }
        }
    }

    async fn refresh(&self) -> Result<WeekRange, PriceError> {
        let to_s = self.clock.now_ms() / 1000;
        let from_s = to_s.saturating_sub(YEAR_SECS);

        let base = self
            .source
            .historical_series(&self.pair.base_id, from_s, to_s)
            .await?;
        let quote = self
            .source
            .historical_series(&self.pair.quote_id, from_s, to_s)
            .await?;

        compute_range(&base, &quote).ok_or_else(|| PriceError::EmptySeries(self.pair.id()))
    }

    /// Last entry, fresh or stale. Used for snapshot persistence.
    pub fn snapshot(&self) -> Option<CacheEntry<WeekRange>> {
        *self.entry.lock()
    }

    /// Seed the cache from a persisted snapshot.
    pub fn restore(&self, entry: CacheEntry<WeekRange>) {
        self.store(entry);
    }

    fn store(&self, new: CacheEntry<WeekRange>) {
        let mut guard = self.entry.lock();
        match *guard {
            Some(cur) if cur.fetched_at_ms > new.fetched_at_ms => {}
            _ => *guard = Some(new),
        }
    }
}

/// Pair the two series by index (shortest-length truncation; the series
/// are assumed time-aligned), ratio each pair, and take the pointwise
/// min/max. A pair with a zero or non-finite price is skipped.
pub fn compute_range(base: &[PricePoint], quote: &[PricePoint]) -> Option<WeekRange> {
    let n = base.len().min(quote.len());
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    let mut valid = 0usize;

    for i in 0..n {
        let (b, q) = (base[i].price, quote[i].price);
        if !b.is_finite() || !q.is_finite() || q == 0.0 {
            continue;
        }

        let ratio = round2(b / q);
        low = low.min(ratio);
        high = high.max(ratio);
        valid += 1;
    }

    (valid > 0).then_some(WeekRange { low, high })
}
