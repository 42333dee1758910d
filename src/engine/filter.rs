use regex::Regex;

use crate::common::time::parse_timestamp;
use crate::error::{Error, Result};
use crate::model::SampleValue;
use crate::parser::ast::{FilterOp, FilterSpec, Header};
use crate::table::{ColumnKind, ColumnValue, Row, Table, TableColumn};

/// A filter bound to its column, with the value operand pre-coerced to
/// the column's kind so row matching stays cheap.
pub(super) struct Filter {
    column: &'static TableColumn,
    op: FilterOp,
    value: String,
    num: Option<SampleValue>,
    re: Option<Regex>,
}

impl Filter {
    pub fn new(table: Table, spec: &FilterSpec) -> Result<Self> {
        let column = table.column(&spec.column).ok_or_else(|| {
            Error::from(format!(
                "table '{}' has no column '{}'",
                table.name(),
                spec.column
            ))
        })?;

        let re = match spec.op {
            FilterOp::EqlRe | FilterOp::NeqRe => Some(Regex::new(&spec.value).map_err(|e| {
                (format!("invalid regex in filter on '{}'", spec.column), e)
            })?),
            _ => None,
        };

        // Regex operators always match textually, even on numeric columns.
        let num = match (column.kind(), re.is_some()) {
            (ColumnKind::Int, false) => Some(parse_number(&spec.column, &spec.value)?),
            (ColumnKind::Time, false) => {
                Some(parse_timestamp(&spec.value)? as SampleValue)
            }
            _ => None,
        };

        Ok(Self {
            column,
            op: spec.op,
            value: spec.value.clone(),
            num,
            re,
        })
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self.column.value(row) {
            ColumnValue::Null => false,
            ColumnValue::List(items) => self.matches_list(&items),
            value => {
                if let (Some(want), Some(got)) = (self.num, value.as_number()) {
                    return compare_num(self.op, got, want);
                }
                self.matches_text(&value.to_text())
            }
        }
    }

    fn matches_text(&self, text: &str) -> bool {
        match self.op {
            FilterOp::Eql => text == self.value,
            FilterOp::Neq => text != self.value,
            FilterOp::EqlRe => self.regex().is_match(text),
            FilterOp::NeqRe => !self.regex().is_match(text),
            FilterOp::Lt => text < self.value.as_str(),
            FilterOp::Gt => text > self.value.as_str(),
            FilterOp::Lte => text <= self.value.as_str(),
            FilterOp::Gte => text >= self.value.as_str(),
        }
    }

    // List matching: equality means membership, an empty value matches
    // the empty list.
    fn matches_list(&self, items: &[String]) -> bool {
        match self.op {
            FilterOp::Eql if self.value.is_empty() => items.is_empty(),
            FilterOp::Neq if self.value.is_empty() => !items.is_empty(),
            FilterOp::Eql => items.iter().any(|i| *i == self.value),
            FilterOp::Neq => !items.iter().any(|i| *i == self.value),
            FilterOp::EqlRe => items.iter().any(|i| self.regex().is_match(i)),
            FilterOp::NeqRe => !items.iter().any(|i| self.regex().is_match(i)),
            _ => false,
        }
    }

    fn regex(&self) -> &Regex {
        self.re
            .as_ref()
            .expect("regex is always compiled for regex operators")
    }
}

fn parse_number(column: &str, value: &str) -> Result<SampleValue> {
    value
        .trim()
        .parse::<SampleValue>()
        .map_err(|e| (format!("filter on '{}' needs a numeric value", column), e).into())
}

fn compare_num(op: FilterOp, got: SampleValue, want: SampleValue) -> bool {
    match op {
        FilterOp::Eql => got == want,
        FilterOp::Neq => got != want,
        FilterOp::Lt => got < want,
        FilterOp::Gt => got > want,
        FilterOp::Lte => got <= want,
        FilterOp::Gte => got >= want,
        FilterOp::EqlRe | FilterOp::NeqRe => unreachable!("regex operators match textually"),
    }
}

/// The filter part of a query header, folded into a single predicate:
/// each Filter: pushes one, And:/Or: pop n and push the combination,
/// Negate: pops one, and whatever remains is implicitly AND-ed.
pub(super) enum Predicate {
    Leaf(Filter),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compile(table: Table, headers: &[Header]) -> Result<Predicate> {
        let mut stack: Vec<Predicate> = vec![];

        for header in headers {
            match header {
                Header::Filter(spec) => stack.push(Predicate::Leaf(Filter::new(table, spec)?)),
                Header::And(n) => {
                    let popped = pop_filters(&mut stack, *n, "And")?;
                    stack.push(Predicate::And(popped));
                }
                Header::Or(n) => {
                    let popped = pop_filters(&mut stack, *n, "Or")?;
                    stack.push(Predicate::Or(popped));
                }
                Header::Negate => {
                    let popped = stack
                        .pop()
                        .ok_or_else(|| Error::new("Negate: without a filter to negate"))?;
                    stack.push(Predicate::Not(Box::new(popped)));
                }
                _ => (),
            }
        }

        Ok(match stack.len() {
            1 => stack.pop().unwrap(),
            _ => Predicate::And(stack),
        })
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Predicate::Leaf(filter) => filter.matches(row),
            Predicate::And(ps) => ps.iter().all(|p| p.matches(row)),
            Predicate::Or(ps) => ps.iter().any(|p| p.matches(row)),
            Predicate::Not(p) => !p.matches(row),
        }
    }
}

fn pop_filters(stack: &mut Vec<Predicate>, n: usize, what: &str) -> Result<Vec<Predicate>> {
    if n == 0 {
        return Err(format!("{}: must combine at least one filter", what).into());
    }
    if n > stack.len() {
        return Err(format!(
            "{}: {} combines more filters than the {} on the stack",
            what,
            n,
            stack.len()
        )
        .into());
    }
    Ok(stack.split_off(stack.len() - n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Host, Service};
    use crate::parser::parse_query;

    fn predicate(headers_text: &str) -> Predicate {
        let q = parse_query(&format!("GET services\n{}", headers_text)).unwrap();
        Predicate::compile(Table::Services, &q.headers).unwrap()
    }

    fn host_predicate(headers_text: &str) -> Predicate {
        let q = parse_query(&format!("GET hosts\n{}", headers_text)).unwrap();
        Predicate::compile(Table::Hosts, &q.headers).unwrap()
    }

    fn service(host_name: &str, description: &str, state: i64) -> Service {
        Service {
            host_name: host_name.to_string(),
            description: description.to_string(),
            state,
            last_check: 1620000000,
            performance_data: "load1=0.42 load5=0.23".to_string(),
            ..Service::default()
        }
    }

    #[test]
    fn test_filter_string_ops() {
        let svc = service("web01", "CPU load", 0);
        let row = Row::Service(&svc);

        assert!(predicate("Filter: host_name = web01").matches(&row));
        assert!(!predicate("Filter: host_name = web02").matches(&row));
        assert!(predicate("Filter: host_name != web02").matches(&row));
        assert!(predicate("Filter: description = CPU load").matches(&row));
        assert!(predicate("Filter: host_name ~ ^web").matches(&row));
        assert!(predicate("Filter: host_name !~ ^db").matches(&row));
        assert!(predicate("Filter: host_name < web02").matches(&row));
        assert!(predicate("Filter: host_name >= web01").matches(&row));
    }

    #[test]
    fn test_filter_numeric_ops() {
        let svc = service("web01", "CPU load", 2);
        let row = Row::Service(&svc);

        assert!(predicate("Filter: state = 2").matches(&row));
        assert!(predicate("Filter: state != 0").matches(&row));
        assert!(predicate("Filter: state > 1").matches(&row));
        assert!(predicate("Filter: state <= 2").matches(&row));
        assert!(!predicate("Filter: state < 2").matches(&row));
    }

    #[test]
    fn test_filter_time_ops() {
        let svc = service("web01", "CPU load", 0);
        let row = Row::Service(&svc);

        assert!(predicate("Filter: last_check >= 1620000000").matches(&row));
        assert!(predicate("Filter: last_check < 2021-05-04T00:00:00Z").matches(&row));
        assert!(!predicate("Filter: last_check > 2021-05-04T00:00:00Z").matches(&row));
    }

    #[test]
    fn test_filter_list_ops() {
        let svc = service("web01", "CPU load", 0);
        let row = Row::Service(&svc);

        assert!(predicate("Filter: metrics = load1").matches(&row));
        assert!(!predicate("Filter: metrics = load15").matches(&row));
        assert!(predicate("Filter: metrics != load15").matches(&row));
        assert!(predicate("Filter: metrics ~ ^load").matches(&row));

        let bare = service("web01", "PING", 0);
        let bare = Service {
            performance_data: String::new(),
            ..bare
        };
        assert!(predicate("Filter: metrics =").matches(&Row::Service(&bare)));
        assert!(!predicate("Filter: metrics =").matches(&row));
    }

    #[test]
    fn test_filter_on_wrong_row_kind_never_matches() {
        let host = Host {
            name: "web01".to_string(),
            ..Host::default()
        };

        // Both the filter and its negation miss: Null matches nothing.
        assert!(!predicate("Filter: description = PING").matches(&Row::Host(&host)));
        assert!(!predicate("Filter: description != PING").matches(&Row::Host(&host)));
    }

    #[test]
    fn test_predicate_stack() {
        let ok = service("web01", "CPU load", 0);
        let warn = service("web02", "CPU load", 1);
        let crit = service("db01", "CPU load", 2);

        let p = predicate("Filter: state = 1\nFilter: state = 2\nOr: 2");
        assert!(!p.matches(&Row::Service(&ok)));
        assert!(p.matches(&Row::Service(&warn)));
        assert!(p.matches(&Row::Service(&crit)));

        let p = predicate("Filter: state != 0\nFilter: host_name ~ ^web\nAnd: 2");
        assert!(p.matches(&Row::Service(&warn)));
        assert!(!p.matches(&Row::Service(&crit)));

        let p = predicate("Filter: state = 0\nNegate:");
        assert!(!p.matches(&Row::Service(&ok)));
        assert!(p.matches(&Row::Service(&crit)));

        // Leftover filters AND together.
        let p = predicate("Filter: state != 0\nFilter: host_name ~ ^web");
        assert!(p.matches(&Row::Service(&warn)));
        assert!(!p.matches(&Row::Service(&crit)));
    }

    #[test]
    fn test_predicate_empty_matches_all() {
        let svc = service("web01", "CPU load", 0);
        assert!(predicate("").matches(&Row::Service(&svc)));
    }

    #[test]
    fn test_compile_errors() {
        let q = parse_query("GET hosts\nFilter: no_such_column = 1").unwrap();
        assert!(Predicate::compile(Table::Hosts, &q.headers).is_err());

        let q = parse_query("GET hosts\nFilter: state = broken").unwrap();
        assert!(Predicate::compile(Table::Hosts, &q.headers).is_err());

        let q = parse_query("GET hosts\nFilter: name ~ [").unwrap();
        assert!(Predicate::compile(Table::Hosts, &q.headers).is_err());

        let q = parse_query("GET hosts\nAnd: 2").unwrap();
        assert!(Predicate::compile(Table::Hosts, &q.headers).is_err());

        let q = parse_query("GET hosts\nNegate:").unwrap();
        assert!(Predicate::compile(Table::Hosts, &q.headers).is_err());

        let q = parse_query("GET hosts\nFilter: state = 0\nAnd: 0").unwrap();
        assert!(Predicate::compile(Table::Hosts, &q.headers).is_err());
    }

    #[test]
    fn test_host_predicate() {
        let host = Host {
            name: "web01".to_string(),
            state: 1,
            ..Host::default()
        };

        assert!(host_predicate("Filter: state = 1").matches(&Row::Host(&host)));
        assert!(host_predicate("Filter: name ~ 01$").matches(&Row::Host(&host)));
    }
}
