use crate::error::Error;

/// The bound on epoch days, chosen so that every supported instant converts
/// to a representable civil date and back.
pub(crate) const MAX_EPOCH_DAY: i64 = 100_000_000;
pub(crate) const MIN_EPOCH_DAY: i64 = -100_000_000;

/// A civil date in the proleptic Gregorian calendar.
///
/// Years are "arithmetic": a continuous signed integer with no era split, so
/// year `0` exists and year `-1` precedes it. Conversion between eras and
/// arithmetic years is the business of the calendar layer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsoDate {
    year: i32,
    month: i8,
    day: i8,
}

impl IsoDate {
    /// Creates a new date from its constituent fields.
    ///
    /// This returns a range error when the month is not in `1..=12`, the
    /// day does not exist in the given month and year, or the date is
    /// outside the supported epoch-day range.
    pub fn new(year: i32, month: i8, day: i8) -> Result<IsoDate, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", month, 1, 12));
        }
        let max_day = days_in_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(Error::range("day", day, 1, max_day));
        }
        let date = IsoDate { year, month, day };
        let epoch_day = date.to_epoch_day();
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(Error::range(
                "epoch day",
                epoch_day,
                MIN_EPOCH_DAY,
                MAX_EPOCH_DAY,
            ));
        }
        Ok(date)
    }

    /// Creates a new date, clamping the month into `1..=12` and the day
    /// into the month's valid range. This is the "constrain" overflow
    /// behavior.
    pub fn constrained(year: i32, month: i8, day: i8) -> Result<IsoDate, Error> {
        let month = month.clamp(1, 12);
        let day = day.clamp(1, days_in_month(year, month));
        IsoDate::new(year, month, day)
    }

    pub(crate) const fn new_unchecked(year: i32, month: i8, day: i8) -> IsoDate {
        IsoDate { year, month, day }
    }

    /// The year, in `-275_760..=275_760` or so (bounded by the epoch-day
    /// range).
    pub fn year(self) -> i32 {
        self.year
    }

    /// The month, in `1..=12`.
    pub fn month(self) -> i8 {
        self.month
    }

    /// The day of the month, in `1..=31`.
    pub fn day(self) -> i8 {
        self.day
    }

    /// Converts this date to a count of days since the Unix epoch
    /// (1970-01-01 is day `0`).
    ///
    /// This uses 400-year Gregorian cycle arithmetic over a March-anchored
    /// year, so that the leap day lands at the end of the shifted year. The
    /// shifted, zero-based month convention is entirely internal to this
    /// function and its inverse.
    pub fn to_epoch_day(self) -> i64 {
        let year = i64::from(self.year) - i64::from(self.month <= 2);
        let cycle = year.div_euclid(400);
        let year_of_cycle = year - cycle * 400;
        // Day of the March-anchored year: March 1st is 0, counting through
        // to the end of February.
        let shifted_month = i64::from(self.month) + if self.month > 2 { -3 } else { 9 };
        let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(self.day) - 1;
        let day_of_cycle = year_of_cycle * 365 + year_of_cycle / 4
            - year_of_cycle / 100
            + day_of_year;
        cycle * 146_097 + day_of_cycle - 719_468
    }

    /// Converts a count of days since the Unix epoch back to a civil date.
    ///
    /// This is the inverse of [`IsoDate::to_epoch_day`], and errors only
    /// when the day count is outside the supported range.
    pub fn from_epoch_day(epoch_day: i64) -> Result<IsoDate, Error> {
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(Error::range(
                "epoch day",
                epoch_day,
                MIN_EPOCH_DAY,
                MAX_EPOCH_DAY,
            ));
        }
        Ok(IsoDate::from_epoch_day_unbounded(epoch_day))
    }

    /// Like [`IsoDate::from_epoch_day`], but without the range check.
    ///
    /// Calendar conversions use this on intermediate day counts that may
    /// briefly step outside the supported range before being validated.
    pub(crate) fn from_epoch_day_unbounded(epoch_day: i64) -> IsoDate {
        let shifted = epoch_day + 719_468;
        let cycle = shifted.div_euclid(146_097);
        let day_of_cycle = shifted - cycle * 146_097;
        let year_of_cycle = (day_of_cycle
            - day_of_cycle / 1460
            + day_of_cycle / 36_524
            - day_of_cycle / 146_096)
            / 365;
        let day_of_year = day_of_cycle
            - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);
        let shifted_month = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
        let month = shifted_month + if shifted_month < 10 { 3 } else { -9 };
        let year = year_of_cycle + cycle * 400 + i64::from(month <= 2);
        IsoDate { year: year as i32, month: month as i8, day: day as i8 }
    }

    /// The day of the week, with Monday as `1` and Sunday as `7`.
    pub fn day_of_week(self) -> i8 {
        // Epoch day 0 is 1970-01-01, a Thursday.
        ((self.to_epoch_day() + 3).rem_euclid(7) + 1) as i8
    }

    /// The ordinal day of the year, with January 1st as `1`.
    pub fn day_of_year(self) -> i16 {
        const CUMULATIVE: [i16; 12] =
            [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
        let mut doy =
            CUMULATIVE[(self.month - 1) as usize] + i16::from(self.day);
        if self.month > 2 && is_leap_year(self.year) {
            doy += 1;
        }
        doy
    }

    /// The ISO 8601 week of the year.
    ///
    /// Week 1 is the week containing the first Thursday of the year, so the
    /// days around January 1st can belong to week 52 or 53 of the previous
    /// ISO year, and the days around December 31st to week 1 of the next.
    /// The returned year is the ISO week-numbering year, which may differ
    /// from the civil year by one in either direction.
    pub fn week_of_year(self) -> (i32, i8) {
        let week =
            (self.day_of_year() - i16::from(self.day_of_week()) + 10) / 7;
        if week < 1 {
            let prev = self.year - 1;
            (prev, weeks_in_year(prev))
        } else if week > i16::from(weeks_in_year(self.year)) {
            (self.year + 1, 1)
        } else {
            (self.year, week as i8)
        }
    }
}

/// Returns true if and only if the given year is a leap year in the
/// proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in the given year and month.
///
/// This correctly returns `29` when the year is a leap year and the month is
/// February.
pub fn days_in_month(year: i32, month: i8) -> i8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Returns the number of days in the given year: 365 or 366.
pub fn days_in_year(year: i32) -> i16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the number of ISO 8601 weeks in the given year: 52 or 53.
///
/// A year has 53 weeks when it starts on a Thursday, or when it is a leap
/// year starting on a Wednesday.
pub fn weeks_in_year(year: i32) -> i8 {
    let jan1 = IsoDate::new_unchecked(year, 1, 1).day_of_week();
    if jan1 == 4 || (jan1 == 3 && is_leap_year(year)) {
        53
    } else {
        52
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for IsoDate {
    fn arbitrary(g: &mut quickcheck::Gen) -> IsoDate {
        let year = i32::arbitrary(g).rem_euclid(500_000) - 250_000;
        let month = (i8::arbitrary(g).rem_euclid(12)) + 1;
        let day = (i8::arbitrary(g).rem_euclid(31)) + 1;
        IsoDate::constrained(year, month, day).unwrap()
    }
}
