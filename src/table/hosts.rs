use lazy_static::lazy_static;

use super::column::{ColumnKind, ColumnValue, TableColumn};
use super::row::Row;

fn with_host(row: &Row, value: fn(&crate::model::Host) -> ColumnValue) -> ColumnValue {
    row.host().map_or(ColumnValue::Null, value)
}

lazy_static! {
    pub(super) static ref COLUMNS: Vec<TableColumn> = vec![
        TableColumn::new("name", ColumnKind::String, |row| {
            with_host(row, |h| ColumnValue::String(h.name.clone()))
        }),
        TableColumn::new("alias", ColumnKind::String, |row| {
            with_host(row, |h| ColumnValue::String(h.alias.clone()))
        }),
        TableColumn::new("address", ColumnKind::String, |row| {
            with_host(row, |h| ColumnValue::String(h.address.clone()))
        }),
        TableColumn::new("state", ColumnKind::Int, |row| {
            with_host(row, |h| ColumnValue::Int(h.state))
        }),
        TableColumn::new("plugin_output", ColumnKind::String, |row| {
            with_host(row, |h| ColumnValue::String(h.plugin_output.clone()))
        }),
        TableColumn::new("last_check", ColumnKind::Time, |row| {
            with_host(row, |h| ColumnValue::Time(h.last_check))
        }),
        TableColumn::new("performance_data", ColumnKind::String, |row| {
            with_host(row, |h| ColumnValue::String(h.performance_data.clone()))
        }),
        TableColumn::new("metrics", ColumnKind::List, |row| {
            with_host(row, |h| {
                ColumnValue::List(h.metrics().into_iter().map(|p| p.name).collect())
            })
        }),
    ];
}
