use std::sync::Arc;

use tracing::warn;

use crate::cache::range::RangeCache;
use crate::cache::ratio::RatioCache;
use crate::market::PriceSource;
use crate::market::types::TrackedPair;
use crate::notify::format;

/// Routes the three user-facing queries to the caches and renders replies.
///
/// Absent data yields a short apology line, never a crash or partial
/// output.
pub struct Responder {
    ratio_cache: Arc<RatioCache>,
    range_cache: Arc<RangeCache>,
    source: Arc<dyn PriceSource>,
    pair: TrackedPair,
    fx_currency: String,
}

impl Responder {
    pub fn new(
        ratio_cache: Arc<RatioCache>,
        range_cache: Arc<RangeCache>,
        source: Arc<dyn PriceSource>,
        pair: TrackedPair,
        fx_currency: String,
    ) -> Self {
        Self {
            ratio_cache,
            range_cache,
            source,
            pair,
            fx_currency,
        }
    }

    pub async fn show_ratio(&self) -> String {
        let (ratio, base_price) = self.ratio_cache.current().await;

        let fx_rate = if ratio.is_some() {
            match self.source.fx_rate("usd", &self.fx_currency).await {
                Ok(rate) => Some(rate),
                Err(e) => {
                    warn!(error = %e, "fx rate unavailable; reply will carry a placeholder");
                    None
                }
            }
        } else {
            None
        };

        format::ratio_reply(&self.pair, ratio, base_price, fx_rate, &self.fx_currency)
    }

    pub async fn show_range(&self) -> String {
        let (low, high) = self.range_cache.week_range().await;

        format::range_reply(&self.pair, low, high)
    }

    pub fn show_menu(&self) -> String {
        format::menu_reply().to_string()
    }
}
