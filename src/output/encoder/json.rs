use serde_json::{json, Value};

use super::encoder::Encoder;
use crate::error::Result;
use crate::rrd::TimeSeries;
use crate::table::ColumnValue;

/// Encodes each result row as a JSON array of column values. A time
/// series becomes `[start, end, step, v1, v2, ...]` with `null` holes.
pub struct JsonEncoder {}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, row: &[ColumnValue]) -> Result<Vec<u8>> {
        let values: Vec<Value> = row.iter().map(to_json).collect();

        serde_json::to_vec(&Value::Array(values))
            .map_err(|e| ("JSON serialization failed", e).into())
    }
}

fn to_json(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::String(s) => json!(s),
        ColumnValue::Int(v) => json!(v),
        ColumnValue::Double(v) if v.is_finite() => json!(v),
        ColumnValue::Double(_) => Value::Null,
        ColumnValue::Time(t) => json!(t),
        ColumnValue::List(items) => json!(items),
        ColumnValue::Series(series) => series_to_json(series),
        ColumnValue::Null => Value::Null,
    }
}

fn series_to_json(series: &TimeSeries) -> Value {
    if series.is_empty() {
        return json!([]);
    }

    let mut out = vec![json!(series.start), json!(series.end), json!(series.step)];
    out.extend(series.values.iter().map(|v| match v {
        Some(v) if v.is_finite() => json!(v),
        _ => Value::Null,
    }));
    Value::Array(out)
}
