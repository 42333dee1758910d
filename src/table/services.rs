use lazy_static::lazy_static;

use super::column::{ColumnKind, ColumnValue, TableColumn};
use super::row::Row;

fn with_service(row: &Row, value: fn(&crate::model::Service) -> ColumnValue) -> ColumnValue {
    row.service().map_or(ColumnValue::Null, value)
}

lazy_static! {
    pub(super) static ref COLUMNS: Vec<TableColumn> = vec![
        TableColumn::new("host_name", ColumnKind::String, |row| {
            with_service(row, |s| ColumnValue::String(s.host_name.clone()))
        }),
        TableColumn::new("description", ColumnKind::String, |row| {
            with_service(row, |s| ColumnValue::String(s.description.clone()))
        }),
        TableColumn::new("state", ColumnKind::Int, |row| {
            with_service(row, |s| ColumnValue::Int(s.state))
        }),
        TableColumn::new("plugin_output", ColumnKind::String, |row| {
            with_service(row, |s| ColumnValue::String(s.plugin_output.clone()))
        }),
        TableColumn::new("last_check", ColumnKind::Time, |row| {
            with_service(row, |s| ColumnValue::Time(s.last_check))
        }),
        TableColumn::new("performance_data", ColumnKind::String, |row| {
            with_service(row, |s| ColumnValue::String(s.performance_data.clone()))
        }),
        TableColumn::new("metrics", ColumnKind::List, |row| {
            with_service(row, |s| {
                ColumnValue::List(s.metrics().into_iter().map(|p| p.name).collect())
            })
        }),
    ];
}
