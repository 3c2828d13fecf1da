//! Pipeline configuration.
//!
//! Everything the original job kept as ambient constants (endpoint URLs,
//! date range, mock toggle) lives here and is injected at construction.
//! No static state — two pipelines with different configs can coexist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Start of the market-data query window (inclusive).
    pub date_from: NaiveDate,

    /// End of the market-data query window (inclusive).
    pub date_to: NaiveDate,

    /// Calendar year the transformation keeps; rows outside it are filtered
    /// during timestamp standardization.
    pub filter_year: i32,

    /// When true, the market source fetches the static fixture URL instead
    /// of issuing a parameterized live query.
    pub mock: bool,

    /// JSON list of ticker symbols.
    pub ticker_url: String,

    /// Live market EOD endpoint (access key appended as a query parameter).
    pub market_api_url: String,

    /// Static fixture with a canned EOD response, used in mock mode.
    pub market_fixture_url: String,

    /// Access key for the live market endpoint. Empty in mock mode.
    #[serde(default)]
    pub access_key: String,

    /// How many tickers from the list are consumed, in list order.
    pub max_tickers: usize,

    /// Local path of the downloaded dataset CSV.
    pub dataset_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            filter_year: 2025,
            mock: true,
            ticker_url: "https://gist.githubusercontent.com/rayyanali00/a311644d6d902100242345d1198a7a53/raw/tickers.json".into(),
            market_api_url: "https://api.marketstack.com/v2/eod".into(),
            market_fixture_url: "https://gist.githubusercontent.com/rayyanali00/ec7fa991d7bb93d51a786ae811563ebc/raw/marketstack_stockdata.json".into(),
            access_key: String::new(),
            max_tickers: 25,
            dataset_path: PathBuf::from("World-Stock-Prices-Dataset.csv"),
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config file {0}: {1}")]
    Io(String, String),

    #[error("parse config TOML: {0}")]
    Parse(String),
}
