//! Ticker list source.
//!
//! The ticker universe is a JSON gist of the form
//! `{ "data": [ { "ticker": "AAPL", ... }, ... ] }`. The pipeline consumes
//! the first `max_tickers` entries in list order, case-sensitive.

use super::provider::{DataError, TickerSource};
use crate::config::PipelineConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TickerResponse {
    data: Vec<TickerEntry>,
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    ticker: String,
}

/// Ticker list fetched from a JSON URL.
pub struct GistTickerSource {
    client: reqwest::blocking::Client,
    url: String,
    limit: usize,
}

impl GistTickerSource {
    pub fn new(config: &PipelineConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Http(e.to_string()))?;

        Ok(Self {
            client,
            url: config.ticker_url.clone(),
            limit: config.max_tickers,
        })
    }

    fn truncate(entries: Vec<TickerEntry>, limit: usize) -> Vec<String> {
        entries.into_iter().take(limit).map(|e| e.ticker).collect()
    }
}

impl TickerSource for GistTickerSource {
    fn tickers(&self) -> Result<Vec<String>, DataError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| DataError::Http(e.to_string()))?;

        let body: TickerResponse = resp.json().map_err(|e| DataError::Decode(e.to_string()))?;
        if body.data.is_empty() {
            return Err(DataError::EmptyResponse(self.url.clone()));
        }
        Ok(Self::truncate(body.data, self.limit))
    }
}
