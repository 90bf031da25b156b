use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument, warn};

use crate::cache::range::RangeCache;
use crate::cache::ratio::RatioCache;
use crate::market::PriceSource;
use crate::market::types::{TrackedPair, WeekRange};
use crate::metrics::counters::Counters;
use crate::notify::{NotificationSink, format};
use crate::state::{StateStore, TrackerState};

/// Outcome of a single detector tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Spot data unavailable; nothing persisted.
    Skipped,
    /// First run: state seeded, no notification.
    Seeded(f64),
    /// Integer part unchanged; no action.
    Unchanged(f64),
    /// Alert sent and new ratio persisted.
    Notified { old: f64, new: f64 },
}

/// Watches the spot ratio and alerts when its integer part moves.
///
/// Two states, both durable: `Uninitialized` (no persisted ratio, first
/// tick seeds it silently) and `Tracking` (every tick compares truncated
/// ratios).
pub struct ChangeDetector {
    ratio_cache: Arc<RatioCache>,
    range_cache: Arc<RangeCache>,
    source: Arc<dyn PriceSource>,
    store: Arc<dyn StateStore>,
    sink: Arc<dyn NotificationSink>,
    pair: TrackedPair,
    fx_currency: String,
    counters: Counters,
}

impl ChangeDetector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ratio_cache: Arc<RatioCache>,
        range_cache: Arc<RangeCache>,
        source: Arc<dyn PriceSource>,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn NotificationSink>,
        pair: TrackedPair,
        fx_currency: String,
        counters: Counters,
    ) -> Self {
        Self {
            ratio_cache,
            range_cache,
            source,
            store,
            sink,
            pair,
            fx_currency,
            counters,
        }
    }

    /// One comparison-and-notify cycle.
    ///
    /// Upstream data failures degrade to [`TickOutcome::Skipped`] so the
    /// periodic loop survives them; `Err` is reserved for persistence and
    /// sink I/O.
    #[instrument(skip(self))]
    pub async fn tick(&self) -> anyhow::Result<TickOutcome> {
        self.counters.ticks.fetch_add(1, Ordering::Relaxed);

        let (Some(ratio), Some(base_price)) = self.ratio_cache.current().await else {
            self.counters.ticks_skipped.fetch_add(1, Ordering::Relaxed);
            warn!("spot ratio unavailable; skipping tick");
            return Ok(TickOutcome::Skipped);
        };

        let mut state = self.store.load().await?;

        let Some(last) = state.last_ratio else {
            state.last_ratio = Some(ratio);
            self.persist(state).await?;
            info!(ratio, "seeded initial ratio");
            return Ok(TickOutcome::Seeded(ratio));
        };

        // Truncation, not rounding: only an integer-part move is a change.
        if ratio as i64 == last as i64 {
            return Ok(TickOutcome::Unchanged(ratio));
        }

        let (low, high) = self.range_cache.week_range().await;
        let range = match (low, high) {
            (Some(low), Some(high)) => Some(WeekRange { low, high }),
            _ => None,
        };

        let fx_rate = match self.source.fx_rate("usd", &self.fx_currency).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                warn!(error = %e, "fx rate unavailable; alert will carry a placeholder");
                None
            }
        };

        let text = format::change_alert(
            &self.pair,
            last,
            ratio,
            base_price,
            fx_rate,
            &self.fx_currency,
            range,
        );

        // Persist only after a successful send; a failed send leaves
        // `last_ratio` untouched so the next tick re-alerts.
        self.sink.send(&text).await?;

        state.last_ratio = Some(ratio);
        self.persist(state).await?;

        self.counters.alerts_sent.fetch_add(1, Ordering::Relaxed);
        info!(old = last, new = ratio, "ratio change reported");

        Ok(TickOutcome::Notified {
            old: last,
            new: ratio,
        })
    }

    /// Seed the caches from snapshots persisted by a previous run.
    pub async fn restore_caches(&self) -> anyhow::Result<()> {
        let state = self.store.load().await?;

        if let Some(entry) = state.ratio_cache {
            self.ratio_cache.restore(entry);
        }
        if let Some(entry) = state.range_cache {
            self.range_cache.restore(entry);
        }

        Ok(())
    }

    async fn persist(&self, mut state: TrackerState) -> anyhow::Result<()> {
        state.ratio_cache = self.ratio_cache.snapshot();
        state.range_cache = self.range_cache.snapshot();

        self.store.save(&state).await
    }
}

/// Runs the periodic comparison loop.
///
/// Individual tick failures are logged and retried on the next tick; the
/// loop itself never exits.
pub async fn run_detector_loop(detector: Arc<ChangeDetector>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_s = every.as_secs(), "change detector loop started");

    loop {
        ticker.tick().await;

        match detector.tick().await {
            Ok(outcome) => debug!(?outcome, "tick complete"),
            Err(e) => warn!(error = ?e, "tick failed; retrying next interval"),
        }
    }
}
