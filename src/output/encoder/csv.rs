use super::encoder::Encoder;
use crate::error::Result;
use crate::rrd::TimeSeries;
use crate::table::ColumnValue;

const FIELD_SEPARATOR: char = ';';
const LIST_SEPARATOR: char = ',';

/// Encodes result rows with the classic monitoring-CSV conventions:
/// ';' between fields, ',' within lists and time series, no quoting.
pub struct CsvEncoder {}

impl CsvEncoder {
    pub fn new() -> Self {
        Self {}
    }
}

impl Encoder for CsvEncoder {
    fn encode(&self, row: &[ColumnValue]) -> Result<Vec<u8>> {
        let fields: Vec<String> = row.iter().map(to_field).collect();
        Ok(fields
            .join(&FIELD_SEPARATOR.to_string())
            .into_bytes())
    }
}

fn to_field(value: &ColumnValue) -> String {
    match value {
        ColumnValue::String(s) => s.clone(),
        ColumnValue::Int(v) => v.to_string(),
        ColumnValue::Double(v) => v.to_string(),
        ColumnValue::Time(t) => t.to_string(),
        ColumnValue::List(items) => items.join(&LIST_SEPARATOR.to_string()),
        ColumnValue::Series(series) => series_to_field(series),
        ColumnValue::Null => String::new(),
    }
}

fn series_to_field(series: &TimeSeries) -> String {
    if series.is_empty() {
        return String::new();
    }

    let mut fields = vec![
        series.start.to_string(),
        series.end.to_string(),
        series.step.to_string(),
    ];
    fields.extend(series.values.iter().map(|v| match v {
        Some(v) => v.to_string(),
        None => String::new(),
    }));
    fields.join(&LIST_SEPARATOR.to_string())
}
