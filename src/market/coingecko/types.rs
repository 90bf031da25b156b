use std::collections::HashMap;

use serde::Deserialize;

/// `/simple/price` response shape: `{asset_id: {currency: price}}`.
pub type SimplePrices = HashMap<String, HashMap<String, f64>>;

/// `/coins/{id}/market_chart/range` response.
#[derive(Debug, Deserialize)]
pub struct MarketChart {
    /// `[[ts_ms, price], ...]`
    pub prices: Vec<(f64, f64)>,
}
