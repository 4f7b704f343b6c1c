/*!
The 13-month arithmetic calendar family: Coptic, Ethiopic and Ethiopic
Amete Alem.

All three share one algorithm: twelve 30-day months followed by a 5 or 6
day epagomenal month, with a leap year whenever `year + 1` is divisible by
4. They differ only in where year 1 day 1 falls on the epoch-day line, and
in the Amete Alem case, in a constant shift applied to the year number.
*/

/// One member of the 13-month family, described by its epoch and year
/// numbering.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Arithmetic13 {
    /// The epoch day of year 1, month 1, day 1 (in this calendar's own
    /// numbering, after any year shift).
    epoch_day: i64,
    /// Amount added to the unshifted year to get this calendar's year.
    year_shift: i32,
}

/// Anno Martyrum epoch, 284-08-29 Julian.
pub(crate) const COPTIC: Arithmetic13 =
    Arithmetic13 { epoch_day: -615_558, year_shift: 0 };

/// Incarnation epoch, 8-08-29 Julian.
pub(crate) const ETHIOPIC: Arithmetic13 =
    Arithmetic13 { epoch_day: -716_367, year_shift: 0 };

/// Same epoch as Ethiopic, but counting years from the creation epoch 5500
/// years earlier.
pub(crate) const ETHIOPIC_AMETE_ALEM: Arithmetic13 =
    Arithmetic13 { epoch_day: -716_367, year_shift: 5500 };

impl Arithmetic13 {
    pub(crate) fn is_leap_year(self, year: i32) -> bool {
        let unshifted = year - self.year_shift;
        (unshifted + 1).rem_euclid(4) == 0
    }

    pub(crate) fn days_in_year(self, year: i32) -> i16 {
        if self.is_leap_year(year) {
            366
        } else {
            365
        }
    }

    pub(crate) fn days_in_month(self, year: i32, month: i8) -> i8 {
        if month < 13 {
            30
        } else if self.is_leap_year(year) {
            6
        } else {
            5
        }
    }

    /// Days between this calendar's epoch and the start of the given
    /// (unshifted) year. Every four year block holds 1461 days, with the
    /// leap year third in the block.
    fn days_before_year(unshifted: i64) -> i64 {
        365 * (unshifted - 1) + unshifted.div_euclid(4)
    }

    /// Converts a date in this calendar to an epoch day. The date must have
    /// a valid month; the day may exceed the month length, in which case it
    /// simply keeps counting forward.
    pub(crate) fn to_epoch_day(self, year: i32, month: i8, day: i8) -> i64 {
        let unshifted = i64::from(year) - i64::from(self.year_shift);
        self.epoch_day
            + Self::days_before_year(unshifted)
            + 30 * (i64::from(month) - 1)
            + i64::from(day)
            - 1
    }

    /// Converts an epoch day to a date in this calendar.
    pub(crate) fn from_epoch_day(self, epoch_day: i64) -> (i32, i8, i8) {
        let rel = epoch_day - self.epoch_day;
        let unshifted = (4 * rel + 1463).div_euclid(1461);
        let day_of_year = rel - Self::days_before_year(unshifted);
        let month = day_of_year / 30 + 1;
        let day = day_of_year % 30 + 1;
        (
            (unshifted + i64::from(self.year_shift)) as i32,
            month as i8,
            day as i8,
        )
    }
}
