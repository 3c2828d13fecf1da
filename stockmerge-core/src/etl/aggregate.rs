//! Daily aggregation: one row per (symbol, calendar day).

use super::EtlError;
use polars::prelude::*;

/// Per-field reducers applied during the daily rollup. Columns outside this
/// set (e.g. `capital_gains`, exchange metadata) are dropped by aggregation.
const REDUCERS: [(&str, Reducer); 7] = [
    ("open", Reducer::Mean),
    ("close", Reducer::Mean),
    ("high", Reducer::Max),
    ("low", Reducer::Min),
    ("volume", Reducer::Sum),
    ("daily_return", Reducer::Mean),
    ("volatility", Reducer::Mean),
];

#[derive(Clone, Copy)]
enum Reducer {
    Mean,
    Max,
    Min,
    Sum,
}

impl Reducer {
    fn apply(self, field: &str) -> Expr {
        match self {
            Reducer::Mean => col(field).mean(),
            Reducer::Max => col(field).max(),
            Reducer::Min => col(field).min(),
            Reducer::Sum => col(field).sum(),
        }
    }
}

/// Collapse intraday/duplicate rows into one row per (`group_field`,
/// calendar day).
///
/// `date_field` is truncated to a UTC calendar date as `date_only`; the
/// grouping column is renamed to the shared name `symbol` in the output,
/// whatever the source called it. Groups are exhaustive and disjoint, so
/// summed fields partition: total volume in equals total volume out.
/// Output rows are sorted by (`symbol`, `date_only`).
pub fn aggregate_daily(
    df: DataFrame,
    date_field: &str,
    group_field: &str,
) -> Result<DataFrame, EtlError> {
    let schema = df.schema();
    for required in [date_field, group_field] {
        if !schema.contains(required) {
            return Err(EtlError::MissingColumn(required.to_string()));
        }
    }

    let aggs: Vec<Expr> = REDUCERS
        .iter()
        .filter(|(field, _)| schema.contains(field))
        .map(|(field, reducer)| reducer.apply(field))
        .collect();

    let mut grouped = df
        .lazy()
        .with_column(col(date_field).cast(DataType::Date).alias("date_only"))
        .group_by_stable([col(group_field), col("date_only")])
        .agg(aggs);

    if group_field != "symbol" {
        grouped = grouped.rename([group_field], ["symbol"], true);
    }

    Ok(grouped
        .sort(
            ["symbol", "date_only"],
            SortMultipleOptions::default()
                .with_order_descending_multi([false, false])
                .with_maintain_order(true),
        )
        .collect()?)
}
