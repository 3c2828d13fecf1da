//! Derived per-row financial metrics.

use super::EtlError;
use polars::prelude::*;

/// All four must be present for `daily_return` and `volatility`.
const REQUIRED_FIELDS: [&str; 4] = ["open", "close", "high", "low"];

/// Add `daily_return = (close - open) / open` and `volatility = high - low`.
///
/// If any of the four source fields is absent the table passes through
/// unchanged — the derivation is suppressed for the whole table, never
/// per-row. A zero `open` yields an IEEE non-finite `daily_return` rather
/// than an error, so a single bad row cannot abort downstream aggregation.
pub fn add_features(df: DataFrame) -> Result<DataFrame, EtlError> {
    let schema = df.schema();
    if !REQUIRED_FIELDS.iter().all(|f| schema.contains(f)) {
        return Ok(df);
    }

    let open = col("open").cast(DataType::Float64);
    let close = col("close").cast(DataType::Float64);
    let high = col("high").cast(DataType::Float64);
    let low = col("low").cast(DataType::Float64);

    Ok(df
        .lazy()
        .with_columns([
            ((close - open.clone()) / open).alias("daily_return"),
            (high - low).alias("volatility"),
        ])
        .collect()?)
}

/// Add `capital_gains = close - open`. Dataset source only; the field is
/// derived before validation and dropped again by aggregation.
pub fn add_capital_gains(df: DataFrame) -> Result<DataFrame, EtlError> {
    let schema = df.schema();
    for field in ["open", "close"] {
        if !schema.contains(field) {
            return Err(EtlError::MissingColumn(field.to_string()));
        }
    }

    Ok(df
        .lazy()
        .with_column(
            (col("close").cast(DataType::Float64) - col("open").cast(DataType::Float64))
                .alias("capital_gains"),
        )
        .collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_return_and_volatility() {
        let df = df!(
            "open" => &[100.0, 50.0],
            "close" => &[110.0, 45.0],
            "high" => &[112.0, 51.0],
            "low" => &[99.0, 44.0],
        )
        .unwrap();

        let out = add_features(df).unwrap();
        let returns = out.column("daily_return").unwrap().f64().unwrap();
        let vols = out.column("volatility").unwrap().f64().unwrap();

        assert!((returns.get(0).unwrap() - 0.1).abs() < 1e-12);
        assert!((returns.get(1).unwrap() - (-0.1)).abs() < 1e-12);
        assert_eq!(vols.get(0), Some(13.0));
        assert_eq!(vols.get(1), Some(7.0));
    }

    #[test]
    fn every_row_gets_both_fields_when_inputs_exist() {
        let df = df!(
            "open" => &[100.0, 0.0, 25.0],
            "close" => &[101.0, 5.0, 26.0],
            "high" => &[102.0, 6.0, 27.0],
            "low" => &[99.0, 4.0, 24.0],
        )
        .unwrap();

        let out = add_features(df).unwrap();
        assert_eq!(out.column("daily_return").unwrap().null_count(), 0);
        assert_eq!(out.column("volatility").unwrap().null_count(), 0);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn zero_open_yields_non_finite_not_error() {
        let df = df!(
            "open" => &[0.0],
            "close" => &[5.0],
            "high" => &[6.0],
            "low" => &[4.0],
        )
        .unwrap();

        let out = add_features(df).unwrap();
        let r = out.column("daily_return").unwrap().f64().unwrap().get(0);
        assert!(r.is_some());
        assert!(!r.unwrap().is_finite());
        // The row itself survives.
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn missing_input_suppresses_derivation_for_whole_table() {
        let df = df!(
            "open" => &[100.0],
            "close" => &[101.0],
            // no high/low
        )
        .unwrap();

        let out = add_features(df).unwrap();
        assert!(out.column("daily_return").is_err());
        assert!(out.column("volatility").is_err());
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn capital_gains_is_close_minus_open() {
        let df = df!(
            "open" => &[100.0, 50.0],
            "close" => &[103.5, 48.0],
        )
        .unwrap();

        let out = add_capital_gains(df).unwrap();
        let gains = out.column("capital_gains").unwrap().f64().unwrap();
        assert_eq!(gains.get(0), Some(3.5));
        assert_eq!(gains.get(1), Some(-2.0));
    }

    #[test]
    fn capital_gains_requires_open_and_close() {
        let df = df!("close" => &[1.0]).unwrap();
        let err = add_capital_gains(df).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn(_)));
    }
}
