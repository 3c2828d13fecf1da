//! Pipeline orchestrator.
//!
//! The two sources differ only in schema details (date field name, grouping
//! field name, brand fix-up, capital-gains derivation), so one generic
//! per-source pipeline runs twice under a `SourceSpec` instead of branching
//! inside each step.

use super::{aggregate, features, merge, normalize, validate, EtlError};
use crate::config::PipelineConfig;
use polars::prelude::DataFrame;

/// Per-source schema mapping for the generic pipeline.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    /// Source label for error context and logging.
    pub name: &'static str,
    /// Raw (pre-normalization) name of the timestamp column.
    pub date_field: String,
    /// Raw name of the ticker/symbol column.
    pub group_field: String,
    /// Brand-name column to title-case before name normalization, if any.
    pub brand_field: Option<String>,
    /// Whether to derive `capital_gains` before validation.
    pub derive_capital_gains: bool,
}

impl SourceSpec {
    /// The market-data API source.
    pub fn market() -> Self {
        Self {
            name: "marketstack",
            date_field: "date".into(),
            group_field: "symbol".into(),
            brand_field: None,
            derive_capital_gains: false,
        }
    }

    /// The world-stock-prices dataset source.
    pub fn dataset() -> Self {
        Self {
            name: "world-stock-prices",
            date_field: "Date".into(),
            group_field: "Ticker".into(),
            brand_field: Some("Brand_Name".into()),
            derive_capital_gains: true,
        }
    }
}

/// Straight-line batch orchestrator. Holds only configuration; each run's
/// tables are independent and nothing leaks between runs.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one source through the full per-source stage sequence:
    /// timestamps → fix-ups → name normalization → derivation → validation
    /// → features → daily aggregation.
    ///
    /// Fail-fast: the first stage error propagates, nothing is recovered.
    pub fn transform_source(
        &self,
        raw: DataFrame,
        spec: &SourceSpec,
    ) -> Result<DataFrame, EtlError> {
        let mut df =
            normalize::standardize_timestamps(raw, &spec.date_field, self.config.filter_year)?;

        if let Some(brand) = &spec.brand_field {
            normalize::title_case_column(&mut df, brand)?;
        }

        let df = normalize::normalize_column_names(df)?;
        let date_field = normalize::normalize_name(&spec.date_field);
        let group_field = normalize::normalize_name(&spec.group_field);

        let df = if spec.derive_capital_gains {
            features::add_capital_gains(df)?
        } else {
            df
        };

        let df = validate::drop_negative_rows(df)?;
        let df = features::add_features(df)?;
        aggregate::aggregate_daily(df, &date_field, &group_field)
    }

    /// Full batch run: transform both raw inputs independently, then merge
    /// with market-data precedence. Returns the final table or the first
    /// error; there is no partial output.
    pub fn run(
        &self,
        market_raw: DataFrame,
        dataset_raw: DataFrame,
    ) -> Result<DataFrame, EtlError> {
        let market = self.transform_source(market_raw, &SourceSpec::market())?;
        let dataset = self.transform_source(dataset_raw, &SourceSpec::dataset())?;
        merge::merge_sources(market, dataset)
    }
}
