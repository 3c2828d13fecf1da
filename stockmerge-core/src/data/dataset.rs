//! World-stock-prices dataset reader.
//!
//! The dataset arrives as a pre-downloaded CSV (`Date`, `Ticker`,
//! `Brand_Name`, OHLCV columns with publisher casing). Download and
//! authentication against the dataset provider are out of scope; this
//! adapter only turns the file into a raw table.

use super::provider::{DataError, DatasetSource};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// CSV-backed dataset source.
pub struct CsvDatasetReader {
    path: PathBuf,
}

impl CsvDatasetReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for CsvDatasetReader {
    fn name(&self) -> &str {
        "world-stock-prices"
    }

    /// Read the raw dataset table.
    ///
    /// Dates are kept as strings (no `try_parse_dates`) so the normalizer
    /// owns all timestamp handling, same as the market source.
    fn load(&self) -> Result<DataFrame, DataError> {
        LazyCsvReader::new(&self.path)
            .with_has_header(true)
            .finish()
            .map_err(|e| DataError::Csv(e.to_string()))?
            .collect()
            .map_err(|e| DataError::Csv(e.to_string()))
    }
}
