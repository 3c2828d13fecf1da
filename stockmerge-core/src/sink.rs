//! Persistence-record conversion.
//!
//! The core never holds a database handle. The merged table is flattened to
//! plain JSON objects — one per row, dates rendered as ISO strings — and the
//! caller hands them to whatever document store it uses, only after a fully
//! successful run.

use crate::etl::EtlError;
use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use serde_json::{Map, Number, Value};

/// Flatten a table into one JSON object per row.
///
/// `Date` values become `YYYY-MM-DD` strings and datetimes RFC 3339 strings,
/// so no field is left as a non-serializable temporal type. Non-finite
/// floats become JSON null (JSON has no inf/NaN representation).
pub fn to_documents(df: &DataFrame) -> Result<Vec<Map<String, Value>>, EtlError> {
    let columns = df.get_columns();
    let mut documents = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let mut doc = Map::with_capacity(columns.len());
        for column in columns {
            let value = column.get(row).map_err(|e| EtlError::Record(e.to_string()))?;
            doc.insert(column.name().to_string(), json_value(value)?);
        }
        documents.push(doc);
    }

    Ok(documents)
}

fn json_value(value: AnyValue) -> Result<Value, EtlError> {
    Ok(match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int32(v) => Value::Number(v.into()),
        AnyValue::Int64(v) => Value::Number(v.into()),
        AnyValue::UInt32(v) => Value::Number(v.into()),
        AnyValue::UInt64(v) => Value::Number(v.into()),
        AnyValue::Float32(v) => float_value(f64::from(v)),
        AnyValue::Float64(v) => float_value(v),
        AnyValue::Date(days) => Value::String(date_from_days(days)?.to_string()),
        AnyValue::Datetime(ts, unit, _) => Value::String(datetime_string(ts, unit)?),
        AnyValue::DatetimeOwned(ts, unit, _) => Value::String(datetime_string(ts, unit)?),
        other => {
            return Err(EtlError::Record(format!(
                "unsupported value in output table: {other:?}"
            )))
        }
    })
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn date_from_days(days: i32) -> Result<NaiveDate, EtlError> {
    NaiveDate::from_num_days_from_ce_opt(days + 719_163)
        .ok_or_else(|| EtlError::Record(format!("date out of range: {days} days since epoch")))
}

fn datetime_string(ts: i64, unit: TimeUnit) -> Result<String, EtlError> {
    let dt = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(ts),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(ts),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(ts)),
    }
    .ok_or_else(|| EtlError::Record(format!("timestamp out of range: {ts}")))?;
    Ok(dt.to_rfc3339())
}
