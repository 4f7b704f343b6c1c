/*!
The Indian national (Saka) calendar.

The calendar is tied to the Gregorian one: Saka year `y` begins on March 22
of Gregorian year `y + 78` (March 21 when that Gregorian year is a leap
year), and is a leap year exactly when the Gregorian year is. Chaitra, the
first month, has 30 days (31 in leap years), months 2 through 6 have 31,
and months 7 through 12 have 30.
*/

use crate::civil::{self, IsoDate};

/// Offset from a Saka year to the Gregorian year its new year falls in.
const GREGORIAN_OFFSET: i32 = 78;

fn gregorian_year(saka_year: i32) -> i32 {
    saka_year + GREGORIAN_OFFSET
}

pub(crate) fn is_leap_year(saka_year: i32) -> bool {
    civil::is_leap_year(gregorian_year(saka_year))
}

pub(crate) fn days_in_year(saka_year: i32) -> i16 {
    if is_leap_year(saka_year) {
        366
    } else {
        365
    }
}

pub(crate) fn days_in_month(saka_year: i32, month: i8) -> i8 {
    match month {
        1 => {
            if is_leap_year(saka_year) {
                31
            } else {
                30
            }
        }
        2..=6 => 31,
        _ => 30,
    }
}

/// The epoch day of the given Saka year's first day.
pub(crate) fn year_start(saka_year: i32) -> i64 {
    let gregorian = gregorian_year(saka_year);
    let day = if civil::is_leap_year(gregorian) { 21 } else { 22 };
    IsoDate::new_unchecked(gregorian, 3, day).to_epoch_day()
}

fn days_before_month(saka_year: i32, month: i8) -> i64 {
    let m = i64::from(month);
    let mut days = if m <= 1 { 0 } else { 30 + 31 * (m - 2) };
    if month > 1 && is_leap_year(saka_year) {
        days += 1;
    }
    if m > 7 {
        // Months 7 and up are 30 days rather than 31.
        days -= m - 7;
    }
    days
}

pub(crate) fn to_epoch_day(saka_year: i32, month: i8, day: i8) -> i64 {
    year_start(saka_year) + days_before_month(saka_year, month) + i64::from(day)
        - 1
}

pub(crate) fn from_epoch_day(epoch_day: i64) -> (i32, i8, i8) {
    // A day in Gregorian year g belongs to Saka year g - 78 when it falls
    // on or after the new year, and to the year before otherwise.
    let civil_year = IsoDate::from_epoch_day_unbounded(epoch_day).year();
    let mut saka_year = civil_year - GREGORIAN_OFFSET;
    if epoch_day < year_start(saka_year) {
        saka_year -= 1;
    }
    let mut day_of_year = epoch_day - year_start(saka_year);
    let mut month = 1i8;
    loop {
        let len = i64::from(days_in_month(saka_year, month));
        if day_of_year < len {
            return (saka_year, month, day_of_year as i8 + 1);
        }
        day_of_year -= len;
        month += 1;
    }
}
