//! Row validation: drop rows with negative price or volume values.

use super::EtlError;
use polars::prelude::*;

/// Fields checked for negative values when present.
const CHECKED_FIELDS: [&str; 5] = ["open", "close", "high", "low", "volume"];

/// Drop any row where a present OHLCV field is negative.
///
/// Absent fields are ignored. The filter is conjunctive, so check order
/// cannot change the result. Rows with a null in a checked field fail the
/// predicate and are dropped as well. Values are never mutated.
pub fn drop_negative_rows(df: DataFrame) -> Result<DataFrame, EtlError> {
    let schema = df.schema();
    let predicate = CHECKED_FIELDS
        .iter()
        .filter(|f| schema.contains(f))
        .map(|f| col(*f).gt_eq(lit(0.0)))
        .reduce(|a, b| a.and(b));

    match predicate {
        Some(predicate) => Ok(df.lazy().filter(predicate).collect()?),
        None => Ok(df),
    }
}
