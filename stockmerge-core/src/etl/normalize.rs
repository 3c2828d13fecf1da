//! Schema normalization: column names, timestamps, year filter.

use super::EtlError;
use polars::prelude::*;

/// Normalize a single field name: trim, lowercase, whitespace to `_`.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Normalize all column names of a table. Row-preserving and idempotent.
pub fn normalize_column_names(mut df: DataFrame) -> Result<DataFrame, EtlError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| normalize_name(n))
        .collect();
    df.set_column_names(names)?;
    Ok(df)
}

/// Parse `date_field` into a UTC-aware datetime and keep only rows whose
/// UTC year equals `year`.
///
/// String columns are parsed strictly: one unparseable date fails the whole
/// step. Naive datetimes are assumed to already be UTC; zoned datetimes are
/// converted.
pub fn standardize_timestamps(
    df: DataFrame,
    date_field: &str,
    year: i32,
) -> Result<DataFrame, EtlError> {
    let dtype = df
        .column(date_field)
        .map_err(|_| EtlError::MissingColumn(date_field.to_string()))?
        .dtype()
        .clone();

    // Empty tables flow through with the canonical dtype; strict parsing
    // has nothing to infer a format from.
    if df.height() == 0 {
        return df
            .lazy()
            .with_column(
                col(date_field).cast(DataType::Datetime(TimeUnit::Milliseconds, Some("UTC".into()))),
            )
            .collect()
            .map_err(EtlError::from);
    }

    let parsed = match dtype {
        DataType::String => col(date_field).str().to_datetime(
            Some(TimeUnit::Milliseconds),
            Some("UTC".into()),
            StrptimeOptions {
                format: None,
                strict: true,
                exact: true,
                cache: true,
            },
            lit("raise"),
        ),
        DataType::Datetime(unit, None) => {
            col(date_field).cast(DataType::Datetime(unit, Some("UTC".into())))
        }
        DataType::Datetime(_, Some(_)) => col(date_field).dt().convert_time_zone("UTC".into()),
        other => {
            return Err(EtlError::TimestampParse {
                column: date_field.to_string(),
                message: format!("unsupported dtype {other:?}"),
            })
        }
    };

    df.lazy()
        .with_column(parsed.alias(date_field))
        .filter(col(date_field).dt().year().eq(lit(year)))
        .collect()
        .map_err(|e| EtlError::TimestampParse {
            column: date_field.to_string(),
            message: e.to_string(),
        })
}

/// Title-case a string column in place (first letter of each word upper,
/// rest lower). Source-specific fix-up for the dataset's brand names.
pub fn title_case_column(df: &mut DataFrame, field: &str) -> Result<(), EtlError> {
    let ca = df
        .column(field)
        .map_err(|_| EtlError::MissingColumn(field.to_string()))?
        .str()?;

    let titled: Vec<Option<String>> = ca.iter().map(|opt| opt.map(title_case)).collect();
    df.replace(field, Series::new(field.into(), titled))?;
    Ok(())
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_casing_and_whitespace() {
        assert_eq!(normalize_name("  Brand Name "), "brand_name");
        assert_eq!(normalize_name("Close"), "close");
        assert_eq!(normalize_name("adj_close"), "adj_close");
    }

    #[test]
    fn column_normalization_is_idempotent() {
        let df = df!(
            "Date" => &["2025-03-02T00:00:00Z"],
            "Brand Name" => &["Apple"],
            "Open" => &[100.0],
        )
        .unwrap();

        let once = normalize_column_names(df).unwrap();
        let names: Vec<String> = once
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["date", "brand_name", "open"]);

        let twice = normalize_column_names(once.clone()).unwrap();
        assert_eq!(twice.get_column_names(), once.get_column_names());
        assert_eq!(twice.height(), once.height());
    }

    #[test]
    fn year_filter_boundary_is_exact() {
        let df = df!(
            "date" => &[
                "2024-12-31T23:59:59Z",
                "2025-01-01T00:00:00Z",
                "2025-06-15T12:00:00Z",
            ],
            "open" => &[1.0, 2.0, 3.0],
        )
        .unwrap();

        let out = standardize_timestamps(df, "date", 2025).unwrap();
        assert_eq!(out.height(), 2);
        let opens = out.column("open").unwrap().f64().unwrap();
        assert_eq!(opens.get(0), Some(2.0));
        assert_eq!(opens.get(1), Some(3.0));
    }

    #[test]
    fn parsed_column_is_utc_aware() {
        let df = df!(
            "date" => &["2025-03-02T10:30:00+0000"],
            "open" => &[1.0],
        )
        .unwrap();

        let out = standardize_timestamps(df, "date", 2025).unwrap();
        match out.column("date").unwrap().dtype() {
            DataType::Datetime(_, Some(tz)) => assert_eq!(tz.as_str(), "UTC"),
            other => panic!("expected UTC datetime, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_date_is_fatal() {
        let df = df!(
            "date" => &["2025-03-02T00:00:00Z", "not a date"],
            "open" => &[1.0, 2.0],
        )
        .unwrap();

        let err = standardize_timestamps(df, "date", 2025).unwrap_err();
        assert!(matches!(err, EtlError::TimestampParse { .. }));
    }

    #[test]
    fn empty_table_standardizes_without_error() {
        let df = df!(
            "date" => &Vec::<String>::new(),
            "open" => &Vec::<f64>::new(),
        )
        .unwrap();

        let out = standardize_timestamps(df, "date", 2025).unwrap();
        assert_eq!(out.height(), 0);
        assert!(matches!(
            out.column("date").unwrap().dtype(),
            DataType::Datetime(_, Some(_))
        ));
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let df = df!("open" => &[1.0]).unwrap();
        let err = standardize_timestamps(df, "date", 2025).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn(_)));
    }

    #[test]
    fn title_cases_brand_names() {
        let mut df = df!(
            "Brand_Name" => &[Some("apple inc"), Some("MICROSOFT"), None],
        )
        .unwrap();

        title_case_column(&mut df, "Brand_Name").unwrap();
        let brands = df.column("Brand_Name").unwrap().str().unwrap();
        assert_eq!(brands.get(0), Some("Apple Inc"));
        assert_eq!(brands.get(1), Some("Microsoft"));
        assert_eq!(brands.get(2), None);
    }
}
