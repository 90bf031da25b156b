use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::market::PriceSource;
use crate::market::coingecko::errors::PriceError;
use crate::market::coingecko::types::{MarketChart, SimplePrices};
use crate::market::types::{PricePoint, SpotQuote, TrackedPair, round2};

/// Client for the CoinGecko HTTP API.
#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    url: String,
    pair: TrackedPair,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(
        url: String,
        pair: TrackedPair,
        vs_currency: String,
        timeout: Duration,
    ) -> Result<Self, PriceError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            url,
            pair,
            vs_currency,
        })
    }

    async fn simple_price(&self, ids: &str, vs: &str) -> Result<SimplePrices, PriceError> {
        let url = format!("{}/simple/price?ids={}&vs_currencies={}", self.url, ids, vs);

        let resp = self.http.get(&url).send().await?.error_for_status()?;

        Ok(resp.json().await?)
    }

    fn lookup(prices: &SimplePrices, id: &str, vs: &str) -> Result<f64, PriceError> {
        prices
            .get(id)
            .and_then(|by_currency| by_currency.get(vs))
            .copied()
            .ok_or_else(|| PriceError::MissingKey(format!("{id}.{vs}")))
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    #[instrument(skip(self), level = "debug")]
    async fn spot_ratio(&self) -> Result<SpotQuote, PriceError> {
        let ids = format!("{},{}", self.pair.base_id, self.pair.quote_id);
        let prices = self.simple_price(&ids, &self.vs_currency).await?;

        let base = Self::lookup(&prices, &self.pair.base_id, &self.vs_currency)?;
        let quote = Self::lookup(&prices, &self.pair.quote_id, &self.vs_currency)?;

        if quote == 0.0 {
            return Err(PriceError::ZeroPrice(self.pair.quote_id.clone()));
        }

        let spot = SpotQuote {
            ratio: round2(base / quote),
            base_price: base,
        };

        debug!(ratio = spot.ratio, base_price = base, "spot ratio fetched");

        Ok(spot)
    }

    #[instrument(skip(self), fields(asset = %asset), level = "debug")]
    async fn historical_series(
        &self,
        asset: &str,
        from_s: u64,
        to_s: u64,
    ) -> Result<Vec<PricePoint>, PriceError> {
        let url = format!(
            "{}/coins/{}/market_chart/range?vs_currency={}&from={}&to={}",
            self.url, asset, self.vs_currency, from_s, to_s
        );

        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let chart: MarketChart = resp.json().await?;

        debug!(samples = chart.prices.len(), "historical series fetched");

        Ok(chart
            .prices
            .into_iter()
            .map(|(ts_ms, price)| PricePoint {
                ts_ms: ts_ms as u64,
                price,
            })
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn fx_rate(&self, base: &str, quote: &str) -> Result<f64, PriceError> {
        let prices = self.simple_price(base, quote).await?;

        Self::lookup(&prices, base, quote)
    }
}
