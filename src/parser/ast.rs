use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::rrd::RrdDataRequest;
use crate::table::Table;

#[derive(Debug, PartialEq)]
pub struct Query {
    pub table: Table,
    pub headers: Vec<Header>,
}

#[derive(Debug, PartialEq)]
pub enum Header {
    Columns(Vec<ColumnSpec>),
    Filter(FilterSpec),
    And(usize),
    Or(usize),
    Negate,
    Limit(usize),
    OutputFormat(OutputFormat),
}

#[derive(Debug, PartialEq)]
pub enum ColumnSpec {
    Name(String),
    RrdData(RrdDataRequest),
}

#[derive(Debug, PartialEq)]
pub struct FilterSpec {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterOp {
    Eql,
    Neq,
    EqlRe,
    NeqRe,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl TryFrom<&str> for FilterOp {
    type Error = Error;

    fn try_from(op: &str) -> Result<Self> {
        match op {
            "=" => Ok(FilterOp::Eql),
            "!=" => Ok(FilterOp::Neq),
            "~" => Ok(FilterOp::EqlRe),
            "!~" => Ok(FilterOp::NeqRe),
            "<" => Ok(FilterOp::Lt),
            ">" => Ok(FilterOp::Gt),
            "<=" => Ok(FilterOp::Lte),
            ">=" => Ok(FilterOp::Gte),
            _ => Err(format!("unknown filter operator '{}'", op).into()),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl TryFrom<&str> for OutputFormat {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        match name {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("unknown output format '{}'", name).into()),
        }
    }
}
