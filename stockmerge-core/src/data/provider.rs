//! Source traits and structured error types.
//!
//! The traits abstract over the two raw inputs (market EOD API, dataset CSV)
//! and the ticker list, so the pipeline can be driven by fixtures in tests.
//! The core consumes only the resulting tables; fetch mechanics stay here.

use polars::prelude::DataFrame;
use thiserror::Error;

/// Structured error types for source adapters.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("empty response from {0}")]
    EmptyResponse(String),

    #[error("dataset read failed: {0}")]
    Csv(String),
}

/// Ordered list of ticker symbols to query.
pub trait TickerSource {
    /// Symbols in list order, already truncated to the configured limit.
    fn tickers(&self) -> Result<Vec<String>, DataError>;
}

/// End-of-day market data, live or fixture.
pub trait MarketSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch raw EOD records for the given symbols as a table.
    ///
    /// The `date` column is left as a string; timestamp standardization is
    /// the normalizer's job, not the adapter's.
    fn fetch_eod(&self, symbols: &[String]) -> Result<DataFrame, DataError>;
}

/// Third-party tabular dataset (pre-downloaded file).
pub trait DatasetSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Load the raw dataset table.
    fn load(&self) -> Result<DataFrame, DataError>;
}
