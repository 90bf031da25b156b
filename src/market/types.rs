use serde::{Deserialize, Serialize};

/// The asset pair being tracked.
///
/// `*_id` are upstream API identifiers, `*_symbol` the tickers shown to
/// the user.
#[derive(Debug, Clone)]
pub struct TrackedPair {
    pub base_id: String,
    pub quote_id: String,
    pub base_symbol: String,
    pub quote_symbol: String,
}

impl TrackedPair {
    pub fn id(&self) -> String {
        format!("{}/{}", self.base_symbol, self.quote_symbol)
    }
}

/// Spot ratio between the tracked pair plus the base asset's own price.
/// Ephemeral; produced fresh on every upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    /// base/quote price ratio, rounded to 2 decimals.
    pub ratio: f64,
    /// Base asset price in the reference currency.
    pub base_price: f64,
}

/// One sample of a historical price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub ts_ms: u64,
    pub price: f64,
}

/// Pointwise min/max of the trailing-year ratio series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekRange {
    pub low: f64,
    pub high: f64,
}

/// Round to 2 decimal places, the precision every ratio is reported at.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_to_two_decimals() {
        assert_eq!(round2(3.014), 3.01);
        assert_eq!(round2(0.625), 0.63);
        assert_eq!(round2(4.0), 4.0);
    }
}
