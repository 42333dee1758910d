use std::convert::TryFrom;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char as nom_char, line_ending, not_line_ending, space0, space1},
    combinator::opt,
    multi::many1,
    sequence::preceded,
};

use super::ast::{ColumnSpec, FilterOp, FilterSpec, Header, OutputFormat, Query};
use super::common::{column_identifier, metric_identifier, signed_number, unsigned_number};
use super::result::{IResult, ParseError, Span};
use crate::error::Result;
use crate::rrd::{ConsolidationFn, RrdDataRequest};
use crate::table::Table;

/// Parses a complete query:
///
///   GET <table>
///   Columns: <col> [<col> ...]
///   Filter: <col> <op> <value>
///   And: <n> | Or: <n> | Negate:
///   Limit: <n>
///   OutputFormat: json|csv
///
/// Blank lines and '#' comment lines between header lines are ignored.
pub fn parse_query(input: &str) -> Result<Query> {
    match query(Span::new(input)) {
        Ok((_, q)) => Ok(q),
        Err(err) => Err(ParseError::from(err).into()),
    }
}

fn query(input: Span) -> IResult<Query> {
    let (rest, _) = skip_junk(input)?;
    let (mut rest, table) = get_line(rest)?;

    let mut headers = vec![];
    loop {
        let (r, _) = skip_junk(rest)?;
        if r.fragment().trim().is_empty() {
            rest = r;
            break;
        }

        let (r, header) = header_line(r)?;
        headers.push(header);
        rest = r;
    }

    Ok((rest, Query { table, headers }))
}

fn get_line(input: Span) -> IResult<Table> {
    let (rest, _) = match tag::<_, _, ParseError>("GET")(input) {
        Ok(ok) => ok,
        Err(_) => {
            return Err(nom::Err::Failure(ParseError::partial(
                "query",
                "GET <table>",
                input,
            )))
        }
    };
    let (rest, _) = space1(rest)?;
    let (rest, name) = column_identifier(rest)?;
    let (rest, _) = end_of_line(rest)?;

    match Table::try_from(name.as_str()) {
        Ok(table) => Ok((rest, table)),
        Err(err) => Err(nom::Err::Failure(ParseError::new(
            err.message().to_string(),
            input,
        ))),
    }
}

fn header_line(input: Span) -> IResult<Header> {
    match alt((
        columns_header,
        filter_header,
        and_header,
        or_header,
        negate_header,
        limit_header,
        output_format_header,
    ))(input)
    {
        Err(nom::Err::Error(_)) => Err(nom::Err::Failure(ParseError::partial(
            "query",
            "a header line (Columns:, Filter:, And:, Or:, Negate:, Limit:, OutputFormat:)",
            input,
        ))),
        other => other,
    }
}

fn columns_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("Columns:")(input)?;
    let (rest, columns) = commit(
        many1(preceded(space1, column_spec))(rest),
        "Columns: header",
        "a column list",
        rest,
    )?;
    let (rest, _) = end_of_line(rest)?;
    Ok((rest, Header::Columns(columns)))
}

fn column_spec(input: Span) -> IResult<ColumnSpec> {
    alt((rrddata_spec, plain_column))(input)
}

fn plain_column(input: Span) -> IResult<ColumnSpec> {
    let (rest, name) = column_identifier(input)?;
    Ok((rest, ColumnSpec::Name(name)))
}

// rrddata:<metric>:<start>:<end>:<resolution>[:<cf>]
fn rrddata_spec(input: Span) -> IResult<ColumnSpec> {
    let (rest, _) = tag("rrddata:")(input)?;

    let (rest, req) = commit(
        rrddata_args(rest),
        "rrddata column",
        "rrddata:<metric>:<start>:<end>:<resolution>[:<cf>]",
        rest,
    )?;

    if req.resolution == 0 {
        return Err(nom::Err::Failure(ParseError::new(
            "rrddata resolution must be greater than 0".to_string(),
            input,
        )));
    }
    if req.end < req.start {
        return Err(nom::Err::Failure(ParseError::new(
            "rrddata end time is before start time".to_string(),
            input,
        )));
    }

    Ok((rest, ColumnSpec::RrdData(req)))
}

fn rrddata_args(input: Span) -> IResult<RrdDataRequest> {
    let (rest, metric) = metric_identifier(input)?;
    let (rest, _) = nom_char(':')(rest)?;
    let (rest, start) = signed_number(rest)?;
    let (rest, _) = nom_char(':')(rest)?;
    let (rest, end) = signed_number(rest)?;
    let (rest, _) = nom_char(':')(rest)?;
    let (rest, resolution) = unsigned_number(rest)?;
    let (rest, cf) = opt(preceded(nom_char(':'), consolidation_fn))(rest)?;

    Ok((
        rest,
        RrdDataRequest {
            metric,
            start,
            end,
            resolution,
            cf: cf.unwrap_or_default(),
        },
    ))
}

fn consolidation_fn(input: Span) -> IResult<ConsolidationFn> {
    let (rest, name) = alpha1(input)?;
    match ConsolidationFn::try_from(*name.fragment()) {
        Ok(cf) => Ok((rest, cf)),
        Err(err) => Err(nom::Err::Failure(ParseError::new(
            err.message().to_string(),
            input,
        ))),
    }
}

fn filter_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("Filter:")(input)?;
    commit(
        filter_args(rest),
        "Filter: header",
        "<column> <op> <value>",
        rest,
    )
}

fn filter_args(input: Span) -> IResult<Header> {
    let (rest, _) = space1(input)?;
    let (rest, column) = column_identifier(rest)?;
    let (rest, _) = space1(rest)?;
    let (rest, op) = filter_op(rest)?;
    let (rest, value) = filter_value(rest)?;

    Ok((rest, Header::Filter(FilterSpec { column, op, value })))
}

fn filter_op(input: Span) -> IResult<FilterOp> {
    let (rest, m) = alt((
        tag("<="),
        tag(">="),
        tag("!="),
        tag("!~"),
        tag("="),
        tag("~"),
        tag("<"),
        tag(">"),
    ))(input)?;

    match FilterOp::try_from(*m.fragment()) {
        Ok(op) => Ok((rest, op)),
        Err(_) => unreachable!(),
    }
}

fn filter_value(input: Span) -> IResult<String> {
    let (rest, v) = not_line_ending(input)?;
    let (rest, _) = opt(line_ending)(rest)?;
    Ok((rest, v.fragment().trim().to_string()))
}

fn and_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("And:")(input)?;
    let (rest, n) = commit(count_arg(rest), "And: header", "a filter count", rest)?;
    Ok((rest, Header::And(n)))
}

fn or_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("Or:")(input)?;
    let (rest, n) = commit(count_arg(rest), "Or: header", "a filter count", rest)?;
    Ok((rest, Header::Or(n)))
}

fn negate_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("Negate:")(input)?;
    let (rest, _) = end_of_line(rest)?;
    Ok((rest, Header::Negate))
}

fn limit_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("Limit:")(input)?;
    let (rest, n) = commit(count_arg(rest), "Limit: header", "a row count", rest)?;
    Ok((rest, Header::Limit(n)))
}

fn output_format_header(input: Span) -> IResult<Header> {
    let (rest, _) = tag("OutputFormat:")(input)?;
    let (rest, _) = space1(rest)?;
    let (rest, name) = alpha1(rest)?;
    let (rest, _) = end_of_line(rest)?;

    match OutputFormat::try_from(*name.fragment()) {
        Ok(format) => Ok((rest, Header::OutputFormat(format))),
        Err(err) => Err(nom::Err::Failure(ParseError::new(
            err.message().to_string(),
            input,
        ))),
    }
}

fn count_arg(input: Span) -> IResult<usize> {
    let (rest, _) = space1(input)?;
    let (rest, n) = unsigned_number(rest)?;
    let (rest, _) = end_of_line(rest)?;
    Ok((rest, n as usize))
}

/// Once a header's keyword matched, the rest of the line is committed:
/// a recoverable error becomes a failure with a header-specific message.
fn commit<'a, O>(
    result: IResult<'a, O>,
    wherein: &'static str,
    expected: &'static str,
    at: Span<'a>,
) -> IResult<'a, O> {
    match result {
        Err(nom::Err::Error(_)) => Err(nom::Err::Failure(ParseError::partial(
            wherein, expected, at,
        ))),
        other => other,
    }
}

fn end_of_line(input: Span) -> IResult<()> {
    let (rest, _) = space0(input)?;
    if rest.fragment().is_empty() {
        return Ok((rest, ()));
    }
    let (rest, _) = line_ending(rest)?;
    Ok((rest, ()))
}

/// Consumes blank lines and '#' comment lines.
fn skip_junk(input: Span) -> IResult<()> {
    let mut rest = input;
    loop {
        let (r, _) = space0(rest)?;
        let (r, comment) = opt(preceded(nom_char('#'), not_line_ending))(r)?;
        let (r, nl) = opt(line_ending)(r)?;

        if comment.is_none() && nl.is_none() {
            // Not a junk line; hand the line back untouched.
            return Ok((rest, ()));
        }
        if nl.is_none() {
            // Trailing comment without a newline.
            return Ok((r, ()));
        }
        rest = r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(column: &str, op: FilterOp, value: &str) -> Header {
        Header::Filter(FilterSpec {
            column: column.to_string(),
            op,
            value: value.to_string(),
        })
    }

    #[test]
    fn test_parse_query_minimal() {
        let q = parse_query("GET hosts").unwrap();
        assert_eq!(Table::Hosts, q.table);
        assert!(q.headers.is_empty());
    }

    #[test]
    fn test_parse_query_full() {
        let q = parse_query(
            "GET services\n\
             Columns: host_name description state\n\
             Filter: state != 0\n\
             Filter: host_name ~ ^web\n\
             Or: 2\n\
             Limit: 10\n\
             OutputFormat: csv\n",
        )
        .unwrap();

        assert_eq!(Table::Services, q.table);
        assert_eq!(
            vec![
                Header::Columns(vec![
                    ColumnSpec::Name("host_name".to_string()),
                    ColumnSpec::Name("description".to_string()),
                    ColumnSpec::Name("state".to_string()),
                ]),
                filter("state", FilterOp::Neq, "0"),
                filter("host_name", FilterOp::EqlRe, "^web"),
                Header::Or(2),
                Header::Limit(10),
                Header::OutputFormat(OutputFormat::Csv),
            ],
            q.headers
        );
    }

    #[test]
    fn test_parse_query_rrddata_column() {
        let q = parse_query(
            "GET services\n\
             Columns: description rrddata:load1:1620000000:1620003600:60\n",
        )
        .unwrap();

        assert_eq!(
            vec![Header::Columns(vec![
                ColumnSpec::Name("description".to_string()),
                ColumnSpec::RrdData(RrdDataRequest {
                    metric: "load1".to_string(),
                    start: 1620000000,
                    end: 1620003600,
                    resolution: 60,
                    cf: ConsolidationFn::Average,
                }),
            ])],
            q.headers
        );
    }

    #[test]
    fn test_parse_query_rrddata_with_cf_and_odd_metric() {
        let q = parse_query("GET hosts\nColumns: rrddata:read.ops/s:0:600:300:max\n").unwrap();

        assert_eq!(
            vec![Header::Columns(vec![ColumnSpec::RrdData(RrdDataRequest {
                metric: "read.ops/s".to_string(),
                start: 0,
                end: 600,
                resolution: 300,
                cf: ConsolidationFn::Max,
            })])],
            q.headers
        );
    }

    #[test]
    fn test_parse_query_filter_values_keep_spaces() {
        let q = parse_query("GET services\nFilter: description = CPU load\n").unwrap();
        assert_eq!(
            vec![filter("description", FilterOp::Eql, "CPU load")],
            q.headers
        );
    }

    #[test]
    fn test_parse_query_filter_empty_value() {
        let q = parse_query("GET hosts\nFilter: alias =\n").unwrap();
        assert_eq!(vec![filter("alias", FilterOp::Eql, "")], q.headers);
    }

    #[test]
    fn test_parse_query_filter_ops() {
        #[rustfmt::skip]
        let tests = [
            ("=", FilterOp::Eql),
            ("!=", FilterOp::Neq),
            ("~", FilterOp::EqlRe),
            ("!~", FilterOp::NeqRe),
            ("<", FilterOp::Lt),
            (">", FilterOp::Gt),
            ("<=", FilterOp::Lte),
            (">=", FilterOp::Gte),
        ];

        for (op_str, op) in &tests {
            let q = parse_query(&format!("GET hosts\nFilter: state {} 1\n", op_str)).unwrap();
            assert_eq!(vec![filter("state", *op, "1")], q.headers, "for op '{}'", op_str);
        }
    }

    #[test]
    fn test_parse_query_junk_lines() {
        let q = parse_query(
            "# state of the web farm\n\
             GET hosts\n\
             \n\
             # only broken ones\n\
             Filter: state != 0\n\
             \n",
        )
        .unwrap();

        assert_eq!(vec![filter("state", FilterOp::Neq, "0")], q.headers);
    }

    #[test]
    fn test_parse_query_negate_and_stack_headers() {
        let q = parse_query(
            "GET hosts\n\
             Filter: state = 0\n\
             Negate:\n\
             Filter: name ~ db\n\
             And: 2\n",
        )
        .unwrap();

        assert_eq!(
            vec![
                filter("state", FilterOp::Eql, "0"),
                Header::Negate,
                filter("name", FilterOp::EqlRe, "db"),
                Header::And(2),
            ],
            q.headers
        );
    }

    #[test]
    fn test_parse_query_invalid() {
        #[rustfmt::skip]
        let tests = [
            "",
            "PUT hosts",
            "GET nonsense",
            "GET hosts\nWaitCondition: state = 0",
            "GET hosts\nColumns:",
            "GET hosts\nFilter: state",
            "GET hosts\nFilter: state ? 1",
            "GET hosts\nLimit: many",
            "GET hosts\nOutputFormat: xml",
            "GET hosts\nColumns: rrddata:load1:100:50:60",
            "GET hosts\nColumns: rrddata:load1:0:600:0",
            "GET hosts\nColumns: rrddata:load1:0:600:60:median",
        ];

        for input in &tests {
            assert!(parse_query(input).is_err(), "while parsing '{}'", input);
        }
    }

    #[test]
    fn test_parse_query_error_position() {
        let err = parse_query("GET hosts\nFilter: state ? 1\n").unwrap_err();
        assert!(
            err.message().starts_with("2:"),
            "unexpected message: {}",
            err.message()
        );
    }
}
