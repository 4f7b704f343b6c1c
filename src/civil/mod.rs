/*!
Civil (calendar-and-clock) date and time records in the proleptic Gregorian
calendar, along with the arithmetic that converts them to and from epoch
days.

"Civil" here means fields as a human would read them off a wall calendar or
clock, with no attachment to a time zone. The absolute counterpart is
[`EpochInstant`](crate::EpochInstant).
*/

pub use self::{
    date::{days_in_month, days_in_year, is_leap_year, weeks_in_year, IsoDate},
    time::IsoTime,
};

mod date;
mod time;
