use thiserror::Error;

/// Upstream data failures.
///
/// Every variant means "could not determine"; the cache layer converts
/// them into absent values and callers degrade the affected feature.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("missing key in response: {0}")]
    MissingKey(String),

    #[error("zero price for {0}")]
    ZeroPrice(String),

    #[error("no usable samples in series for {0}")]
    EmptySeries(String),
}
