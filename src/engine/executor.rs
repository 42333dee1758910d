use std::cell::RefCell;

use log::debug;

use super::filter::Predicate;
use crate::error::{Error, Result};
use crate::model::Status;
use crate::output::{CsvEncoder, Encoder, JsonEncoder, Output};
use crate::parser::ast::{ColumnSpec, Header, OutputFormat, Query};
use crate::rrd::{host_metric_location, service_metric_location, RrdDataRequest, RrdFetcher};
use crate::table::{ColumnValue, Row, Table, TableColumn};

/// One projected output column: either a table column from the
/// registry or an rrddata fetch.
enum OutputColumn {
    Table(&'static TableColumn),
    RrdData(RrdDataRequest),
}

pub struct Executor {
    status: Status,
    fetcher: RrdFetcher,
    output: RefCell<Output>,
}

impl Executor {
    pub fn new(status: Status, fetcher: RrdFetcher, output: Output) -> Self {
        Self {
            status,
            fetcher,
            output: RefCell::new(output),
        }
    }

    /// Runs one query: select the table, stream matching rows through
    /// the projection, stop at the limit. Query errors (unknown
    /// columns, bad filters) surface before the first row is emitted.
    pub fn execute(&self, query: Query) -> Result<()> {
        let columns = self.compile_columns(query.table, &query.headers)?;
        let predicate = Predicate::compile(query.table, &query.headers)?;
        let limit = limit(&query.headers);

        if let Some(format) = output_format(&query.headers) {
            self.output.borrow_mut().set_encoder(match format {
                OutputFormat::Json => Box::new(JsonEncoder::new()) as Box<dyn Encoder>,
                OutputFormat::Csv => Box::new(CsvEncoder::new()),
            });
        }

        let mut emitted = 0;
        for row in self.rows(query.table) {
            if emitted >= limit {
                break;
            }
            if !predicate.matches(&row) {
                continue;
            }

            let values: Vec<ColumnValue> = columns
                .iter()
                .map(|column| self.project(query.table, &row, column))
                .collect();
            self.output.borrow_mut().write(&values)?;
            emitted += 1;
        }

        debug!(
            "query on '{}' done, {} row(s) emitted",
            query.table.name(),
            emitted
        );
        Ok(())
    }

    fn rows(&self, table: Table) -> Box<dyn Iterator<Item = Row> + '_> {
        match table {
            Table::Hosts => Box::new(self.status.hosts.iter().map(Row::Host)),
            Table::Services => Box::new(self.status.services.iter().map(Row::Service)),
        }
    }

    fn compile_columns(&self, table: Table, headers: &[Header]) -> Result<Vec<OutputColumn>> {
        let mut specs: Option<&[ColumnSpec]> = None;
        for header in headers {
            if let Header::Columns(columns) = header {
                if specs.is_some() {
                    return Err(Error::new("duplicate Columns: header"));
                }
                specs = Some(columns);
            }
        }

        let specs = match specs {
            Some(specs) => specs,
            // Without a Columns: header every table column is emitted.
            None => {
                return Ok(table.columns().iter().map(OutputColumn::Table).collect());
            }
        };

        specs
            .iter()
            .map(|spec| match spec {
                ColumnSpec::Name(name) => {
                    table.column(name).map(OutputColumn::Table).ok_or_else(|| {
                        Error::from(format!(
                            "table '{}' has no column '{}'",
                            table.name(),
                            name
                        ))
                    })
                }
                ColumnSpec::RrdData(req) => {
                    if !self.fetcher.is_configured() {
                        return Err(Error::new(
                            "rrddata columns require --rrd-dir and --rrdcached",
                        ));
                    }
                    Ok(OutputColumn::RrdData(req.clone()))
                }
            })
            .collect()
    }

    fn project(&self, table: Table, row: &Row, column: &OutputColumn) -> ColumnValue {
        match column {
            OutputColumn::Table(c) => c.value(row),
            OutputColumn::RrdData(req) => self.rrd_data(table, row, req),
        }
    }

    fn rrd_data(&self, table: Table, row: &Row, req: &RrdDataRequest) -> ColumnValue {
        let base = match self.fetcher.base_dir() {
            Some(base) => base,
            None => return ColumnValue::Null,
        };

        let location = match table {
            Table::Hosts => host_metric_location(base, row, &req.metric, req.cf),
            Table::Services => service_metric_location(base, row, &req.metric, req.cf),
        };

        match location {
            Some(location) => ColumnValue::Series(self.fetcher.fetch(&location, req)),
            None => ColumnValue::Null,
        }
    }
}

fn limit(headers: &[Header]) -> usize {
    headers
        .iter()
        .filter_map(|h| match h {
            Header::Limit(n) => Some(*n),
            _ => None,
        })
        .min()
        .unwrap_or(usize::MAX)
}

fn output_format(headers: &[Header]) -> Option<OutputFormat> {
    headers.iter().rev().find_map(|h| match h {
        Header::OutputFormat(format) => Some(*format),
        _ => None,
    })
}
