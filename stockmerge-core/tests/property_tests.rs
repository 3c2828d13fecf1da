//! Property tests for core transformation invariants.
//!
//! Uses proptest to verify:
//! 1. Aggregation partition — total volume is preserved across the rollup
//! 2. Validator monotonicity — output is a negative-free subset of the input
//! 3. Merge key uniqueness — no (symbol, date_only) key appears twice

use polars::prelude::*;
use proptest::prelude::*;
use stockmerge_core::etl::{aggregate, merge, validate};

const SYMBOLS: [&str; 4] = ["AAPL", "MSFT", "GOOG", "AMZN"];
const DAYS: [&str; 3] = ["2025-03-02", "2025-03-03", "2025-03-04"];

fn arb_rows() -> impl Strategy<Value = Vec<(usize, usize, f64)>> {
    prop::collection::vec((0..SYMBOLS.len(), 0..DAYS.len(), 0.0..1e6_f64), 0..60)
}

fn rows_to_frame(rows: &[(usize, usize, f64)]) -> DataFrame {
    let symbols: Vec<&str> = rows.iter().map(|(s, _, _)| SYMBOLS[*s]).collect();
    let days: Vec<&str> = rows.iter().map(|(_, d, _)| DAYS[*d]).collect();
    let volumes: Vec<f64> = rows.iter().map(|(_, _, v)| *v).collect();
    df!(
        "symbol" => symbols,
        "date" => days,
        "volume" => volumes,
    )
    .unwrap()
}

proptest! {
    /// Every input row lands in exactly one group, so summed volume is
    /// conserved by the daily rollup.
    #[test]
    fn aggregation_preserves_total_volume(rows in arb_rows()) {
        let df = rows_to_frame(&rows);
        let total_in: f64 = rows.iter().map(|(_, _, v)| v).sum();

        let out = aggregate::aggregate_daily(df, "date", "symbol").unwrap();
        let total_out: f64 = out
            .column("volume")
            .unwrap()
            .f64()
            .unwrap()
            .sum()
            .unwrap_or(0.0);

        prop_assert!((total_in - total_out).abs() <= 1e-6 * total_in.max(1.0));
    }

    /// Group count never exceeds distinct (symbol, day) pairs.
    #[test]
    fn aggregation_groups_are_distinct_keys(rows in arb_rows()) {
        let distinct: std::collections::HashSet<(usize, usize)> =
            rows.iter().map(|(s, d, _)| (*s, *d)).collect();

        let out = aggregate::aggregate_daily(rows_to_frame(&rows), "date", "symbol").unwrap();
        prop_assert_eq!(out.height(), distinct.len());
    }

    /// The validator removes rows but never values: the output is a subset
    /// and contains no negative volume.
    #[test]
    fn validator_output_is_negative_free_subset(
        volumes in prop::collection::vec(-1e3..1e3_f64, 0..40),
    ) {
        let df = df!("volume" => volumes.clone()).unwrap();
        let expected = volumes.iter().filter(|v| **v >= 0.0).count();

        let out = validate::drop_negative_rows(df).unwrap();
        prop_assert_eq!(out.height(), expected);

        let kept = out.column("volume").unwrap().f64().unwrap();
        prop_assert!(kept.iter().flatten().all(|v| v >= 0.0));
    }

    /// After merging, each (symbol, date_only) key appears exactly once.
    #[test]
    fn merge_yields_unique_keys(
        a in arb_rows(),
        b in arb_rows(),
    ) {
        let left = aggregate::aggregate_daily(rows_to_frame(&a), "date", "symbol").unwrap();
        let right = aggregate::aggregate_daily(rows_to_frame(&b), "date", "symbol").unwrap();

        let merged = merge::merge_sources(left, right).unwrap();

        let distinct: std::collections::HashSet<(usize, usize)> = a
            .iter()
            .chain(b.iter())
            .map(|(s, d, _)| (*s, *d))
            .collect();
        prop_assert_eq!(merged.height(), distinct.len());
    }
}
