pub mod coingecko;
pub mod types;

use async_trait::async_trait;

use crate::market::coingecko::errors::PriceError;
use crate::market::types::{PricePoint, SpotQuote};

/// Upstream quote API boundary.
///
/// One implementation talks to CoinGecko; tests substitute a scripted
/// source. Every method performs at most one HTTP call and never retries.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current prices for the tracked pair, collapsed into a spot ratio.
    async fn spot_ratio(&self) -> Result<SpotQuote, PriceError>;

    /// Historical price series for one asset between two UNIX timestamps
    /// (seconds).
    async fn historical_series(
        &self,
        asset: &str,
        from_s: u64,
        to_s: u64,
    ) -> Result<Vec<PricePoint>, PriceError>;

    /// Fiat conversion rate, e.g. USD -> RUB. Callers treat failure as
    /// "omit the converted value", never as fatal.
    async fn fx_rate(&self, base: &str, quote: &str) -> Result<f64, PriceError>;
}
