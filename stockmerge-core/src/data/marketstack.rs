//! MarketStack EOD data source.
//!
//! Fetches end-of-day records from the v2 `/eod` endpoint, or from a static
//! fixture URL in mock mode. Handles transient network failures with bounded
//! retries and an exponential backoff; the request timeout gives the fetch
//! boundary a bounded-wait contract so a hung upstream cannot stall a run
//! forever.

use super::provider::{DataError, MarketSource};
use crate::config::PipelineConfig;
use polars::prelude::*;
use serde::Deserialize;
use std::time::Duration;

/// MarketStack EOD response envelope.
#[derive(Debug, Deserialize)]
struct EodResponse {
    data: Vec<EodRecord>,
}

/// One raw EOD record. Numeric fields are optional — the provider emits
/// nulls for halted or partially reported instruments.
#[derive(Debug, Deserialize)]
struct EodRecord {
    date: String,
    symbol: String,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
}

/// MarketStack data source (live query or mock fixture).
pub struct MarketstackProvider {
    client: reqwest::blocking::Client,
    api_url: String,
    fixture_url: String,
    access_key: String,
    date_from: String,
    date_to: String,
    mock: bool,
    max_retries: u32,
    base_delay: Duration,
}

impl MarketstackProvider {
    pub fn new(config: &PipelineConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.market_api_url.clone(),
            fixture_url: config.market_fixture_url.clone(),
            access_key: config.access_key.clone(),
            date_from: config.date_from.to_string(),
            date_to: config.date_to.to_string(),
            mock: config.mock,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Build the parameterized live query URL.
    fn eod_url(&self, symbols: &[String]) -> String {
        format!(
            "{}?access_key={}&symbols={}&date_from={}&date_to={}",
            self.api_url,
            self.access_key,
            symbols.join(","),
            self.date_from,
            self.date_to,
        )
    }

    /// Execute a GET with bounded retries on transient failures.
    fn get_with_retry(&self, url: &str) -> Result<EodResponse, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_server_error() {
                        last_error = Some(DataError::Http(format!("HTTP {status}")));
                        continue;
                    }
                    if !status.is_success() {
                        return Err(DataError::Http(format!("HTTP {status}")));
                    }
                    return resp
                        .json::<EodResponse>()
                        .map_err(|e| DataError::Decode(e.to_string()));
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::Http(e.to_string()));
                        continue;
                    }
                    return Err(DataError::Http(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Http("request failed".into())))
    }

    /// Convert decoded records into the raw table handed to the pipeline.
    ///
    /// `date` stays a string column; parsing and UTC standardization happen
    /// in the normalizer so the fixture and live paths share one code path.
    fn records_to_frame(records: Vec<EodRecord>) -> Result<DataFrame, DataError> {
        let n = records.len();
        let mut dates = Vec::with_capacity(n);
        let mut symbols = Vec::with_capacity(n);
        let mut exchanges = Vec::with_capacity(n);
        let mut opens = Vec::with_capacity(n);
        let mut highs = Vec::with_capacity(n);
        let mut lows = Vec::with_capacity(n);
        let mut closes = Vec::with_capacity(n);
        let mut volumes = Vec::with_capacity(n);

        for r in records {
            dates.push(r.date);
            symbols.push(r.symbol);
            exchanges.push(r.exchange);
            opens.push(r.open);
            highs.push(r.high);
            lows.push(r.low);
            closes.push(r.close);
            volumes.push(r.volume);
        }

        df!(
            "date" => dates,
            "symbol" => symbols,
            "exchange" => exchanges,
            "open" => opens,
            "high" => highs,
            "low" => lows,
            "close" => closes,
            "volume" => volumes,
        )
        .map_err(|e| DataError::Decode(e.to_string()))
    }
}

impl MarketSource for MarketstackProvider {
    fn name(&self) -> &str {
        "marketstack"
    }

    fn fetch_eod(&self, symbols: &[String]) -> Result<DataFrame, DataError> {
        let url = if self.mock {
            self.fixture_url.clone()
        } else {
            self.eod_url(symbols)
        };

        let resp = self.get_with_retry(&url)?;
        if resp.data.is_empty() {
            return Err(DataError::EmptyResponse(self.name().into()));
        }
        Self::records_to_frame(resp.data)
    }
}
