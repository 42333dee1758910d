mod column;
mod hosts;
mod row;
mod services;

pub use column::{ColumnKind, ColumnValue, TableColumn};
pub use row::Row;

use std::convert::TryFrom;

use crate::error::Error;

/// The queryable tables.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Table {
    Hosts,
    Services,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Hosts => "hosts",
            Table::Services => "services",
        }
    }

    /// Columns in registry order - also the projection used when a
    /// query has no Columns: header.
    pub fn columns(self) -> &'static [TableColumn] {
        match self {
            Table::Hosts => &hosts::COLUMNS[..],
            Table::Services => &services::COLUMNS[..],
        }
    }

    pub fn column(self, name: &str) -> Option<&'static TableColumn> {
        self.columns().iter().find(|c| c.name() == name)
    }
}

impl TryFrom<&str> for Table {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self, Error> {
        match name {
            "hosts" => Ok(Table::Hosts),
            "services" => Ok(Table::Services),
            _ => Err(format!("unknown table '{}'", name).into()),
        }
    }
}
