/*!
Parsing of ISO 8601 / RFC 9557 date-time strings.

The grammar is the Temporal flavor of ISO 8601: a date, an optional
wall-clock time, an optional UTC designator or offset, an optional
bracketed time zone annotation, and zero or more bracketed `key=value`
annotations, any of which may carry the `!` critical flag.

Six top-level grammars compose those fragments, one per kind of value a
caller may expect. [`parse_with`] tries grammars in the caller's priority
order and accepts the first that both matches structurally and passes
semantic validation; the convenience entry points bake in the default
orders. Later grammars in a list are deliberately less specific fallbacks:
the month-day and year-month forms first try the full date-time grammar so
that `10-01` in `2024-10-01` is never misread as a bare month-day.
*/

use crate::{
    civil::IsoTime,
    error::{err, Error, ErrorContext},
};

mod parser;

/// A top-level grammar to try matching an input against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Grammar {
    ZonedDateTime,
    DateTime,
    Instant,
    Time,
    YearMonth,
    MonthDay,
}

/// The time-of-day portion of a parsed string.
///
/// A string with no time portion means "start of day", which is distinct
/// from an explicit midnight: in a zone whose day starts mid-hour after a
/// daylight gap, the two resolve differently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Clock {
    StartOfDay,
    Time(IsoTime),
}

/// The date portion of a parsed string. A missing year means the grammar
/// was a bare month-day, to be resolved against a reference year.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParsedDate {
    pub year: Option<i32>,
    pub month: i8,
    pub day: i8,
}

/// A parsed UTC offset, with the original text preserved for callers that
/// need to distinguish `+01:00` from `+01:00:00`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedOffset {
    pub nanoseconds: i64,
    pub text: String,
}

/// A bracketed time zone annotation, e.g. `[America/New_York]` or
/// `[!+02:00]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TzAnnotation {
    pub id: String,
    pub critical: bool,
}

/// Everything a successfully parsed string conveys.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedTemporal {
    pub date: Option<ParsedDate>,
    pub clock: Clock,
    /// Whether the string carried the `Z` designator.
    pub is_utc: bool,
    pub offset: Option<ParsedOffset>,
    pub tz_annotation: Option<TzAnnotation>,
    /// The `u-ca` calendar annotation, verbatim.
    pub calendar: Option<String>,
}

/// Tries each grammar in order and returns the first match that passes
/// semantic validation.
pub fn parse_with(
    grammars: &[Grammar],
    input: &str,
) -> Result<ParsedTemporal, Error> {
    let bytes = input.as_bytes();
    let mut last_err = None;
    for &grammar in grammars {
        match parser::parse_grammar(grammar, bytes) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => last_err = Some(e),
        }
    }
    let err = last_err
        .unwrap_or_else(|| err!("no grammars were given to try"));
    Err(err).with_context(|| {
        err!("failed to parse {input:?} as a date-time string")
    })
}

pub fn parse_zoned_date_time(input: &str) -> Result<ParsedTemporal, Error> {
    parse_with(&[Grammar::ZonedDateTime], input)
}

pub fn parse_date_time(input: &str) -> Result<ParsedTemporal, Error> {
    parse_with(&[Grammar::DateTime], input)
}

pub fn parse_instant(input: &str) -> Result<ParsedTemporal, Error> {
    parse_with(&[Grammar::Instant], input)
}

/// Parses a wall-clock time, accepting a full date-time string and using
/// only its time portion.
pub fn parse_time(input: &str) -> Result<ParsedTemporal, Error> {
    if let Ok(parsed) = parse_with(&[Grammar::DateTime], input) {
        if matches!(parsed.clock, Clock::Time(_)) {
            return Ok(parsed);
        }
    }
    parse_with(&[Grammar::Time], input)
}

pub fn parse_month_day(input: &str) -> Result<ParsedTemporal, Error> {
    parse_with(&[Grammar::DateTime, Grammar::MonthDay], input)
}

pub fn parse_year_month(input: &str) -> Result<ParsedTemporal, Error> {
    parse_with(&[Grammar::DateTime, Grammar::YearMonth], input)
}
