//! StockMerge Core — two-source daily stock-price ETL.
//!
//! This crate contains the transformation core and its collaborators:
//! - Schema normalization (column names, timestamps, year filter)
//! - Row validation (negative-value filtering)
//! - Feature derivation (daily return, volatility, capital gains)
//! - Daily aggregation per (symbol, calendar day)
//! - Two-source merge with first-occurrence-wins deduplication
//! - Source adapters (market EOD API, ticker list, dataset CSV)
//! - Document-record conversion for the persistence sink
//!
//! Every pipeline step is a total transformation over an in-memory
//! `polars::prelude::DataFrame`; the orchestrator composes them fail-fast.

pub mod config;
pub mod data;
pub mod etl;
pub mod sink;

pub use config::PipelineConfig;
pub use etl::pipeline::{Pipeline, SourceSpec};
pub use etl::EtlError;
