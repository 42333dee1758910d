use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric1, digit1},
    combinator::{opt, recognize},
    multi::many0,
    sequence::pair,
};

use super::result::{IResult, ParseError, Span};

pub(super) fn column_identifier(input: Span) -> IResult<String> {
    // [a-zA-Z_][a-zA-Z0-9_]*
    let (rest, m) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)?;
    Ok((rest, String::from(*m.fragment())))
}

pub(super) fn metric_identifier(input: Span) -> IResult<String> {
    // Anything up to the next ':' or whitespace - metric names come
    // from performance data and are not identifier-shaped.
    let (rest, m) = is_not(": \t\r\n")(input)?;
    Ok((rest, String::from(*m.fragment())))
}

pub(super) fn unsigned_number(input: Span) -> IResult<u64> {
    let (rest, m) = digit1(input)?;
    match m.fragment().parse::<u64>() {
        Ok(n) => Ok((rest, n)),
        Err(_) => Err(nom::Err::Failure(ParseError::new(
            format!("number '{}' is out of range", m.fragment()),
            input,
        ))),
    }
}

pub(super) fn signed_number(input: Span) -> IResult<i64> {
    let (rest, m) = recognize(pair(opt(tag("-")), digit1))(input)?;
    match m.fragment().parse::<i64>() {
        Ok(n) => Ok((rest, n)),
        Err(_) => Err(nom::Err::Failure(ParseError::new(
            format!("number '{}' is out of range", m.fragment()),
            input,
        ))),
    }
}
