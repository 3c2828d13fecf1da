//! Two-source merge with first-occurrence-wins deduplication.

use super::EtlError;
use polars::prelude::*;

/// Union two aggregated tables and dedupe on (`symbol`, `date_only`).
///
/// `primary` rows precede `secondary` rows, and `unique_stable` keeps the
/// first occurrence of each key, so the primary (market-data) side wins any
/// overlap. Columns present in only one side are null-filled on the other;
/// no row from either input is mutated.
pub fn merge_sources(primary: DataFrame, secondary: DataFrame) -> Result<DataFrame, EtlError> {
    let merged = concat(
        [primary.lazy(), secondary.lazy()],
        UnionArgs {
            diagonal: true,
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .unique_stable(
        Some(vec!["symbol".into(), "date_only".into()]),
        UniqueKeepStrategy::First,
    )
    .collect()?;

    Ok(merged)
}
