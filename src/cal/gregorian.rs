/*!
The civil calendar family: ISO 8601, Gregorian, Thai Buddhist and ROC.

All four share the proleptic Gregorian month structure; the latter two only
renumber the year by a constant. The heavy lifting lives in
[`crate::civil`]; this module applies the year offset and leaves era
handling to the calendar dispatch.
*/

use crate::civil::{self, IsoDate};

/// Year numbering offsets: calendar year = ISO year + offset.
pub(crate) const ISO_OFFSET: i32 = 0;
pub(crate) const BUDDHIST_OFFSET: i32 = 543;
pub(crate) const ROC_OFFSET: i32 = -1911;

fn iso_year(offset: i32, year: i32) -> i32 {
    year - offset
}

pub(crate) fn is_leap_year(offset: i32, year: i32) -> bool {
    civil::is_leap_year(iso_year(offset, year))
}

pub(crate) fn days_in_year(offset: i32, year: i32) -> i16 {
    civil::days_in_year(iso_year(offset, year))
}

pub(crate) fn days_in_month(offset: i32, year: i32, month: i8) -> i8 {
    civil::days_in_month(iso_year(offset, year), month)
}

pub(crate) fn to_epoch_day(offset: i32, year: i32, month: i8, day: i8) -> i64 {
    IsoDate::new_unchecked(iso_year(offset, year), month, day).to_epoch_day()
}

pub(crate) fn from_epoch_day(offset: i32, epoch_day: i64) -> (i32, i8, i8) {
    let date = IsoDate::from_epoch_day_unbounded(epoch_day);
    (date.year() + offset, date.month(), date.day())
}
