//! Transformation core.
//!
//! One module per pipeline stage, each a free function over a `DataFrame`,
//! plus the orchestrator that composes them per source. Stages never catch
//! each other's errors; a run either yields a complete merged table or the
//! first failure propagates out of `Pipeline::run`.

pub mod aggregate;
pub mod features;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod validate;

pub use pipeline::{Pipeline, SourceSpec};

/// Errors from the transformation core.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    /// A timestamp could not be interpreted. Fatal for the whole source:
    /// silently dropping unparseable rows would understate coverage.
    #[error("timestamp parse failed in column '{column}': {message}")]
    TimestampParse { column: String, message: String },

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("table operation failed: {0}")]
    Table(#[from] polars::error::PolarsError),

    #[error("record conversion failed: {0}")]
    Record(String),
}
