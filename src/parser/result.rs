use nom_locate::LocatedSpan;

use crate::error;

pub type Span<'a> = LocatedSpan<&'a str>;

pub type IResult<'a, O> = nom::IResult<Span<'a>, O, ParseError<'a>>;

#[derive(Debug, PartialEq)]
pub struct ParseError<'a> {
    message: String,
    wherein: Span<'a>,
}

impl<'a> ParseError<'a> {
    pub fn new(message: String, wherein: Span<'a>) -> Self {
        Self { message, wherein }
    }

    pub fn partial(wherein: &'static str, expected: &'static str, span: Span<'a>) -> Self {
        Self::new(
            format!(
                "unexpected {} in {}, expected {}",
                unexpected(span.fragment()),
                wherein,
                expected
            ),
            span,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> u32 {
        self.wherein.location_line()
    }

    pub fn offset(&self) -> usize {
        self.wherein.get_utf8_column()
    }
}

fn unexpected(found: &str) -> String {
    match found.lines().next().unwrap_or("") {
        "" => String::from("end of query"),
        v => format!("\"{}\"", v),
    }
}

impl<'a> nom::error::ParseError<Span<'a>> for ParseError<'a> {
    fn from_error_kind(input: Span<'a>, kind: nom::error::ErrorKind) -> Self {
        Self::new(format!("parse error {:?}", kind), input)
    }

    fn append(_input: Span<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: Span<'a>, c: char) -> Self {
        Self::new(format!("unexpected character '{}'", c), input)
    }
}

impl<'a> From<nom::Err<ParseError<'a>>> for ParseError<'a> {
    fn from(err: nom::Err<ParseError<'a>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            nom::Err::Incomplete(_) => unreachable!(),
        }
    }
}

impl<'a> From<ParseError<'a>> for error::Error {
    fn from(err: ParseError) -> Self {
        error::Error::new(&format!(
            "{}:{}: {}",
            err.line(),
            err.offset(),
            err.message()
        ))
    }
}
