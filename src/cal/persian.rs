/*!
The Persian (Solar Hijri) calendar.

Unlike the other systems in this crate, the Persian year boundary is not
computed in closed form by the calendar itself. Each year's first day is
obtained from the engine, which asks its civil oracle what Persian
day-of-month a fixed Gregorian anchor date falls on and subtracts, caching
the result per year. The built-in oracle answers with the 33-year
arithmetic cycle rule below; an oracle backed by astronomical tables would
slot in without touching this module.

The month layout is fixed: six 31-day months, then five 30-day months, then
a final month of 29 days (30 in leap years).
*/

use crate::{
    civil::IsoDate,
    error::Error,
    tz::Engine,
};

/// Epoch day of Persian year 1, month 1, day 1 under the arithmetic rule
/// (622-03-22 Gregorian proleptic).
const ARITHMETIC_EPOCH: i64 = -492_268;

/// Offset from a Persian year to the Gregorian year its new year falls in.
const GREGORIAN_OFFSET: i32 = 621;

/// Nowruz in Gregorian year `y + 621` is always in March, so April 1 of
/// that year is unambiguously inside Farvardin. The engine queries the
/// oracle at this date to locate the year start.
pub(crate) fn oracle_anchor(persian_year: i32) -> IsoDate {
    IsoDate::new_unchecked(persian_year + GREGORIAN_OFFSET, 4, 1)
}

/// The year-start epoch day under the 33-year arithmetic cycle rule, with
/// 8 leap years per cycle.
pub(crate) fn arithmetic_year_start(persian_year: i32) -> i64 {
    let y = i64::from(persian_year);
    ARITHMETIC_EPOCH + 365 * (y - 1) + (8 * y + 21).div_euclid(33)
}

/// Whether the given year is a leap year under the arithmetic rule.
pub(crate) fn arithmetic_is_leap_year(persian_year: i32) -> bool {
    (25 * i64::from(persian_year) + 11).rem_euclid(33) < 8
}

/// Converts an epoch day to a Persian date under the arithmetic rule. Used
/// by the built-in oracle; engine-threaded conversions go through
/// [`from_epoch_day`].
pub(crate) fn arithmetic_from_epoch_day(epoch_day: i64) -> (i32, i8, i8) {
    let civil_year = IsoDate::from_epoch_day_unbounded(epoch_day).year();
    let mut year = civil_year - GREGORIAN_OFFSET;
    if epoch_day < arithmetic_year_start(year) {
        year -= 1;
    } else if epoch_day >= arithmetic_year_start(year + 1) {
        year += 1;
    }
    let day_of_year = epoch_day - arithmetic_year_start(year);
    let (month, day) = month_day_from_day_of_year(day_of_year);
    (year, month, day)
}

fn days_before_month(month: i8) -> i64 {
    let m = i64::from(month) - 1;
    if m <= 6 {
        31 * m
    } else {
        186 + 30 * (m - 6)
    }
}

fn month_day_from_day_of_year(day_of_year: i64) -> (i8, i8) {
    if day_of_year < 186 {
        ((day_of_year / 31 + 1) as i8, (day_of_year % 31 + 1) as i8)
    } else {
        let rest = day_of_year - 186;
        ((rest / 30 + 7) as i8, (rest % 30 + 1) as i8)
    }
}

pub(crate) fn days_in_month(engine: &Engine, year: i32, month: i8) -> Result<i8, Error> {
    Ok(match month {
        1..=6 => 31,
        7..=11 => 30,
        _ => {
            if is_leap_year(engine, year)? {
                30
            } else {
                29
            }
        }
    })
}

pub(crate) fn days_in_year(engine: &Engine, year: i32) -> Result<i16, Error> {
    let len = engine.persian_year_start(year + 1)?
        - engine.persian_year_start(year)?;
    Ok(len as i16)
}

pub(crate) fn is_leap_year(engine: &Engine, year: i32) -> Result<bool, Error> {
    Ok(days_in_year(engine, year)? == 366)
}

pub(crate) fn to_epoch_day(
    engine: &Engine,
    year: i32,
    month: i8,
    day: i8,
) -> Result<i64, Error> {
    Ok(engine.persian_year_start(year)?
        + days_before_month(month)
        + i64::from(day)
        - 1)
}

pub(crate) fn from_epoch_day(
    engine: &Engine,
    epoch_day: i64,
) -> Result<(i32, i8, i8), Error> {
    let civil_year = IsoDate::from_epoch_day_unbounded(epoch_day).year();
    let mut year = civil_year - GREGORIAN_OFFSET;
    if epoch_day < engine.persian_year_start(year)? {
        year -= 1;
    } else if epoch_day >= engine.persian_year_start(year + 1)? {
        year += 1;
    }
    let day_of_year = epoch_day - engine.persian_year_start(year)?;
    let (month, day) = month_day_from_day_of_year(day_of_year);
    Ok((year, month, day))
}
