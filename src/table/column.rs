use super::row::Row;
use crate::model::{SampleValue, Timestamp};
use crate::rrd::TimeSeries;

/// A value derived from a row. Absent values are a typed Null - e.g. a
/// column applied to a row of the wrong kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValue {
    String(String),
    Int(i64),
    Double(SampleValue),
    Time(Timestamp),
    List(Vec<String>),
    Series(TimeSeries),
    Null,
}

impl ColumnValue {
    /// Numeric view used by comparison filters. Time is its Unix value.
    pub fn as_number(&self) -> Option<SampleValue> {
        match self {
            ColumnValue::Int(v) => Some(*v as SampleValue),
            ColumnValue::Double(v) => Some(*v),
            ColumnValue::Time(t) => Some(*t as SampleValue),
            _ => None,
        }
    }

    /// Textual view used by string and regex filters.
    pub fn to_text(&self) -> String {
        match self {
            ColumnValue::String(s) => s.clone(),
            ColumnValue::Int(v) => v.to_string(),
            ColumnValue::Double(v) => v.to_string(),
            ColumnValue::Time(t) => t.to_string(),
            ColumnValue::List(items) => items.join(","),
            ColumnValue::Series(_) => String::new(),
            ColumnValue::Null => String::new(),
        }
    }
}

/// Column kinds drive how filter values are coerced before matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnKind {
    String,
    Int,
    Time,
    List,
}

/// A named accessor deriving one value from a row.
pub struct TableColumn {
    name: &'static str,
    kind: ColumnKind,
    value: fn(&Row) -> ColumnValue,
}

impl TableColumn {
    pub fn new(name: &'static str, kind: ColumnKind, value: fn(&Row) -> ColumnValue) -> Self {
        Self { name, kind, value }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn value(&self, row: &Row) -> ColumnValue {
        (self.value)(row)
    }
}
