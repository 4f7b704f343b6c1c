/*!
The grammar fragments and their assembly into top-level grammars.

Every fragment takes a byte slice and returns a `Parsed` pair of value and
unconsumed tail. Structural failures and semantic failures are both plain
errors here; the caller decides whether a failure means "try the next
grammar" or "report it".
*/

use crate::{
    civil::{IsoDate, IsoTime},
    error::{err, Error},
    util::parse::{digits, fraction_to_nanos, parse_i64, slicer, Parsed},
};

use super::{
    Clock, Grammar, ParsedDate, ParsedOffset, ParsedTemporal, TzAnnotation,
};

/// The year against which a bare month-day is validated. It is a leap
/// year, so `02-29` is admissible.
const REFERENCE_YEAR: i32 = 1972;

pub(super) fn parse_grammar(
    grammar: Grammar,
    input: &[u8],
) -> Result<ParsedTemporal, Error> {
    match grammar {
        Grammar::ZonedDateTime => zoned_date_time(input),
        Grammar::DateTime => date_time(input),
        Grammar::Instant => instant(input),
        Grammar::Time => bare_time(input),
        Grammar::YearMonth => year_month(input),
        Grammar::MonthDay => month_day(input),
    }
}

// ---------- top-level grammars ----------

struct Body {
    date: RawDate,
    clock: Clock,
    is_utc: bool,
    offset: Option<ParsedOffset>,
}

fn zoned_date_time(input: &[u8]) -> Result<ParsedTemporal, Error> {
    let Parsed { value: body, input } = date_time_body(input)?;
    let (tz, anns) = tail(input)?;
    let tz = tz.ok_or_else(|| {
        err!("a zoned date-time requires a bracketed time zone annotation")
    })?;
    finish_full_date(body, Some(tz), anns)
}

fn date_time(input: &[u8]) -> Result<ParsedTemporal, Error> {
    let Parsed { value: body, input } = date_time_body(input)?;
    if body.is_utc {
        return Err(err!(
            "the Z designator is not permitted on a plain date-time"
        ));
    }
    let (tz, anns) = tail(input)?;
    finish_full_date(body, tz, anns)
}

fn instant(input: &[u8]) -> Result<ParsedTemporal, Error> {
    let Parsed { value: body, input } = date_time_body(input)?;
    if !matches!(body.clock, Clock::Time(_)) {
        return Err(err!("an instant requires a time component"));
    }
    if !body.is_utc && body.offset.is_none() {
        return Err(err!(
            "an instant requires the Z designator or a UTC offset"
        ));
    }
    let (tz, anns) = tail(input)?;
    finish_full_date(body, tz, anns)
}

fn finish_full_date(
    body: Body,
    tz: Option<TzAnnotation>,
    anns: Vec<Annotation>,
) -> Result<ParsedTemporal, Error> {
    IsoDate::new(body.date.year, body.date.month, body.date.day)?;
    let calendar = resolve_calendar(&anns)?;
    Ok(ParsedTemporal {
        date: Some(ParsedDate {
            year: Some(body.date.year),
            month: body.date.month,
            day: body.date.day,
        }),
        clock: body.clock,
        is_utc: body.is_utc,
        offset: body.offset,
        tz_annotation: tz,
        calendar,
    })
}

fn bare_time(input: &[u8]) -> Result<ParsedTemporal, Error> {
    let input = match input.first() {
        Some(&(b'T' | b't')) => &input[1..],
        _ => input,
    };
    let Parsed { value: parsed_time, input } = time(input)?;
    let mut parsed_offset = None;
    let mut input = input;
    match input.first() {
        Some(&(b'Z' | b'z')) => {
            return Err(err!(
                "the Z designator is not permitted on a wall-clock time"
            ));
        }
        Some(&(b'+' | b'-')) => {
            let p = offset(input)?;
            parsed_offset = Some(p.value);
            input = p.input;
        }
        _ => {}
    }
    let (tz, anns) = tail(input)?;
    let calendar = resolve_calendar(&anns)?;
    Ok(ParsedTemporal {
        date: None,
        clock: Clock::Time(parsed_time),
        is_utc: false,
        offset: parsed_offset,
        tz_annotation: tz,
        calendar,
    })
}

fn year_month(input: &[u8]) -> Result<ParsedTemporal, Error> {
    let Parsed { value: year, input } = year(input)?;
    let input = match input.first() {
        Some(&b'-') => &input[1..],
        _ => input,
    };
    let Parsed { value: month, input } = exact_digits(input, 2)?;
    let (tz, anns) = tail(input)?;
    let month = month as i8;
    IsoDate::new(year, month, 1)?;
    let calendar = resolve_calendar(&anns)?;
    require_iso_calendar(calendar.as_deref())?;
    Ok(ParsedTemporal {
        date: Some(ParsedDate { year: Some(year), month, day: 1 }),
        clock: Clock::StartOfDay,
        is_utc: false,
        offset: None,
        tz_annotation: tz,
        calendar,
    })
}

fn month_day(input: &[u8]) -> Result<ParsedTemporal, Error> {
    let input = input.strip_prefix(b"--").unwrap_or(input);
    let Parsed { value: month, input } = exact_digits(input, 2)?;
    let input = match input.first() {
        Some(&b'-') => &input[1..],
        _ => input,
    };
    let Parsed { value: day, input } = exact_digits(input, 2)?;
    let (tz, anns) = tail(input)?;
    let (month, day) = (month as i8, day as i8);
    IsoDate::new(REFERENCE_YEAR, month, day)?;
    let calendar = resolve_calendar(&anns)?;
    require_iso_calendar(calendar.as_deref())?;
    Ok(ParsedTemporal {
        date: Some(ParsedDate { year: None, month, day }),
        clock: Clock::StartOfDay,
        is_utc: false,
        offset: None,
        tz_annotation: tz,
        calendar,
    })
}

// Annotation values are case-sensitive, so the comparison here is exact.
fn require_iso_calendar(calendar: Option<&str>) -> Result<(), Error> {
    match calendar {
        Some(id) if id != "iso8601" => Err(err!(
            "a date without a year or day requires the iso8601 calendar, \
             but the string is annotated with {id:?}",
        )),
        _ => Ok(()),
    }
}

// ---------- fragments ----------

struct RawDate {
    year: i32,
    month: i8,
    day: i8,
}

/// Parses a date, an optional time with its separator and an optional
/// absolute marker (Z or offset). The marker is only admitted after a
/// time.
fn date_time_body(input: &[u8]) -> Result<Parsed<'_, Body>, Error> {
    let Parsed { value: date, input } = date(input)?;
    let mut clock = Clock::StartOfDay;
    let mut is_utc = false;
    let mut parsed_offset = None;
    let mut input = input;
    if matches!(input.first(), Some(&(b'T' | b't' | b' '))) {
        let p = time(&input[1..])?;
        clock = Clock::Time(p.value);
        input = p.input;
        match input.first() {
            Some(&(b'Z' | b'z')) => {
                is_utc = true;
                input = &input[1..];
            }
            Some(&(b'+' | b'-')) => {
                let p = offset(input)?;
                parsed_offset = Some(p.value);
                input = p.input;
            }
            _ => {}
        }
    }
    Ok(Parsed {
        value: Body { date, clock, is_utc, offset: parsed_offset },
        input,
    })
}

fn date(input: &[u8]) -> Result<Parsed<'_, RawDate>, Error> {
    let Parsed { value: year, input } = year(input)?;
    let extended = input.first() == Some(&b'-');
    let input = if extended { &input[1..] } else { input };
    let Parsed { value: month, input } = exact_digits(input, 2)?;
    let input = if extended {
        match input.first() {
            Some(&b'-') => &input[1..],
            _ => return Err(err!("expected '-' between month and day")),
        }
    } else {
        input
    };
    let Parsed { value: day, input } = exact_digits(input, 2)?;
    Ok(Parsed {
        value: RawDate { year, month: month as i8, day: day as i8 },
        input,
    })
}

fn year(input: &[u8]) -> Result<Parsed<'_, i32>, Error> {
    match input.first() {
        Some(&sign @ (b'+' | b'-')) => {
            let Parsed { value, input } = exact_digits(&input[1..], 6)?;
            if sign == b'-' && value == 0 {
                return Err(err!("-000000 is not a permitted year form"));
            }
            let year = if sign == b'-' { -value } else { value };
            Ok(Parsed { value: year as i32, input })
        }
        _ => {
            let Parsed { value, input } = exact_digits(input, 4)?;
            Ok(Parsed { value: value as i32, input })
        }
    }
}

fn time(input: &[u8]) -> Result<Parsed<'_, IsoTime>, Error> {
    let Parsed { value: hour, input } = exact_digits(input, 2)?;
    let mut minute = 0;
    let mut second = 0;
    let mut nanos = 0;
    let mut input = input;
    if input.first() == Some(&b':') {
        let p = exact_digits(&input[1..], 2)?;
        minute = p.value;
        input = p.input;
        if input.first() == Some(&b':') {
            let p = exact_digits(&input[1..], 2)?;
            second = p.value;
            input = p.input;
            let p = fraction(input)?;
            nanos = p.value;
            input = p.input;
        }
    } else if input.first().is_some_and(|b| b.is_ascii_digit()) {
        let p = exact_digits(input, 2)?;
        minute = p.value;
        input = p.input;
        if input.first().is_some_and(|b| b.is_ascii_digit()) {
            let p = exact_digits(input, 2)?;
            second = p.value;
            input = p.input;
            let p = fraction(input)?;
            nanos = p.value;
            input = p.input;
        }
    }
    // A leap second on input clamps to the last representable second.
    if second == 60 {
        second = 59;
    }
    let time = IsoTime::new(
        hour as i8,
        minute as i8,
        second as i8,
        (nanos / 1_000_000) as i16,
        (nanos / 1_000 % 1_000) as i16,
        (nanos % 1_000) as i16,
    )?;
    Ok(Parsed { value: time, input })
}

fn fraction(input: &[u8]) -> Result<Parsed<'_, i32>, Error> {
    match input.first() {
        Some(&(b'.' | b',')) => {
            let (digs, rest) = digits(&input[1..]);
            let value = fraction_to_nanos(digs)?;
            Ok(Parsed { value, input: rest })
        }
        _ => Ok(Parsed { value: 0, input }),
    }
}

fn offset(input: &[u8]) -> Result<Parsed<'_, ParsedOffset>, Error> {
    let mk = slicer(input);
    let sign = match input.first() {
        Some(&b'+') => 1i64,
        Some(&b'-') => -1i64,
        _ => return Err(err!("expected '+' or '-' to begin a UTC offset")),
    };
    let Parsed { value: hour, input } = exact_digits(&input[1..], 2)?;
    let mut minute = 0;
    let mut second = 0;
    let mut nanos = 0;
    let mut input = input;
    if input.first() == Some(&b':') {
        let p = exact_digits(&input[1..], 2)?;
        minute = p.value;
        input = p.input;
        if input.first() == Some(&b':') {
            let p = exact_digits(&input[1..], 2)?;
            second = p.value;
            input = p.input;
            let p = fraction(input)?;
            nanos = p.value;
            input = p.input;
        }
    } else if input.first().is_some_and(|b| b.is_ascii_digit()) {
        let p = exact_digits(input, 2)?;
        minute = p.value;
        input = p.input;
        if input.first().is_some_and(|b| b.is_ascii_digit()) {
            let p = exact_digits(input, 2)?;
            second = p.value;
            input = p.input;
            let p = fraction(input)?;
            nanos = p.value;
            input = p.input;
        }
    }
    if hour > 23 || minute > 59 || second > 59 {
        return Err(err!(
            "UTC offset {hour:02}:{minute:02}:{second:02} is out of range"
        ));
    }
    let nanoseconds = sign
        * ((hour * 3600 + minute * 60 + second) * 1_000_000_000
            + i64::from(nanos));
    let text = String::from_utf8_lossy(mk(input)).into_owned();
    Ok(Parsed { value: ParsedOffset { nanoseconds, text }, input })
}

fn tz_annotation(
    input: &[u8],
) -> Result<Parsed<'_, Option<TzAnnotation>>, Error> {
    if input.first() != Some(&b'[') {
        return Ok(Parsed { value: None, input });
    }
    let end = input
        .iter()
        .position(|&b| b == b']')
        .ok_or_else(|| err!("unclosed '[' annotation"))?;
    let mut body = &input[1..end];
    if body.contains(&b'=') {
        // A key=value annotation rather than a time zone.
        return Ok(Parsed { value: None, input });
    }
    let critical = body.first() == Some(&b'!');
    if critical {
        body = &body[1..];
    }
    validate_zone_id(body)?;
    let id = String::from_utf8_lossy(body).into_owned();
    Ok(Parsed {
        value: Some(TzAnnotation { id, critical }),
        input: &input[end + 1..],
    })
}

fn validate_zone_id(body: &[u8]) -> Result<(), Error> {
    match body.first() {
        None => Err(err!("time zone annotation is empty")),
        Some(&(b'+' | b'-')) => {
            let Parsed { input, .. } = offset(body)?;
            if !input.is_empty() {
                return Err(err!("malformed time zone offset annotation"));
            }
            Ok(())
        }
        Some(&first) => {
            let ok = !first.is_ascii_digit()
                && body.iter().all(|&b| {
                    b.is_ascii_alphanumeric()
                        || matches!(b, b'.' | b'_' | b'-' | b'+' | b'/')
                });
            if !ok {
                return Err(err!(
                    "malformed time zone identifier annotation"
                ));
            }
            Ok(())
        }
    }
}

pub(super) struct Annotation {
    key: String,
    value: String,
    critical: bool,
}

fn annotations(input: &[u8]) -> Result<Parsed<'_, Vec<Annotation>>, Error> {
    let mut anns = vec![];
    let mut input = input;
    while input.first() == Some(&b'[') {
        let end = input
            .iter()
            .position(|&b| b == b']')
            .ok_or_else(|| err!("unclosed '[' annotation"))?;
        let mut body = &input[1..end];
        let critical = body.first() == Some(&b'!');
        if critical {
            body = &body[1..];
        }
        let eq = body
            .iter()
            .position(|&b| b == b'=')
            .ok_or_else(|| err!("annotation is missing '='"))?;
        let (key, value) = (&body[..eq], &body[eq + 1..]);
        let key_ok = !key.is_empty()
            && key[0].is_ascii_lowercase()
            && key.iter().all(|&b| {
                b.is_ascii_lowercase()
                    || b.is_ascii_digit()
                    || matches!(b, b'-' | b'_')
            });
        let value_ok = !value.is_empty()
            && value.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-');
        if !key_ok || !value_ok {
            return Err(err!("malformed annotation {:?}", {
                String::from_utf8_lossy(&input[..end + 1]).into_owned()
            }));
        }
        anns.push(Annotation {
            key: String::from_utf8_lossy(key).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
            critical,
        });
        input = &input[end + 1..];
    }
    Ok(Parsed { value: anns, input })
}

/// Resolves the `u-ca` annotations to at most one calendar identifier.
///
/// The first occurrence wins. A later occurrence with a differing value is
/// an error when either occurrence is marked critical. A critical
/// annotation with any other key is an error, since no other key is
/// recognized.
fn resolve_calendar(anns: &[Annotation]) -> Result<Option<String>, Error> {
    let mut calendar: Option<(&str, bool)> = None;
    for ann in anns {
        if ann.key == "u-ca" {
            match calendar {
                None => calendar = Some((&ann.value, ann.critical)),
                Some((first, first_critical)) => {
                    if first != ann.value
                        && (first_critical || ann.critical)
                    {
                        return Err(err!(
                            "conflicting calendar annotations \
                             {first:?} and {:?}",
                            ann.value,
                        ));
                    }
                }
            }
        } else if ann.critical {
            return Err(err!(
                "unrecognized critical annotation key {:?}",
                ann.key,
            ));
        }
    }
    Ok(calendar.map(|(id, _)| id.to_string()))
}

/// Consumes the optional time zone annotation and the trailing key=value
/// annotations, and requires that nothing is left over.
fn tail(
    input: &[u8],
) -> Result<(Option<TzAnnotation>, Vec<Annotation>), Error> {
    let Parsed { value: tz, input } = tz_annotation(input)?;
    let Parsed { value: anns, input } = annotations(input)?;
    if !input.is_empty() {
        return Err(err!(
            "unparsed trailing input {:?}",
            String::from_utf8_lossy(input).into_owned(),
        ));
    }
    Ok((tz, anns))
}

fn exact_digits(input: &[u8], n: usize) -> Result<Parsed<'_, i64>, Error> {
    let (digs, _) = digits(input);
    if digs.len() < n {
        return Err(err!(
            "expected {n} digits, but found only {}",
            digs.len()
        ));
    }
    let value = parse_i64(&digs[..n])?;
    Ok(Parsed { value, input: &input[n..] })
}
