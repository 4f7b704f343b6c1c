/*!
A fixed-point representation of an absolute instant in time.

An instant is a pair of a day count relative to the Unix epoch and a
non-negative sub-day remainder in nanoseconds. Splitting absolute time this
way keeps both components comfortably inside `i64` range for the entire
supported span of roughly 273,790 years either side of the epoch, where a
single nanosecond count would need wider arithmetic throughout.
*/

use crate::{
    civil::{IsoDate, IsoTime},
    duration::TimeDuration,
    error::Error,
    round::RoundMode,
    util::math::{
        self, MILLIS_PER_DAY, NANOS_PER_DAY, NANOS_PER_MILLI,
        NANOS_PER_SECOND, SECONDS_PER_DAY,
    },
};

/// The maximum day component of an instant, inclusive.
pub const MAX_EPOCH_DAY: i64 = 100_000_000;

/// The minimum day component of an instant, inclusive.
pub const MIN_EPOCH_DAY: i64 = -100_000_000;

/// An absolute instant, measured as a count of days since the Unix epoch
/// plus a canonical sub-day remainder in nanoseconds.
///
/// The remainder is always in `[0, 86_400_000_000_000)`, even for instants
/// before the epoch. All operations return new values.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpochInstant {
    days: i64,
    time_ns: i64,
}

impl EpochInstant {
    /// Creates an instant from a possibly non-canonical pair, carrying
    /// overflowing or negative nanoseconds into the day count.
    pub fn new(days: i64, time_ns: i64) -> EpochInstant {
        let (carry, time_ns) = math::divmod_floor(time_ns, NANOS_PER_DAY);
        EpochInstant { days: days + carry, time_ns }
    }

    /// Like `new`, but returns an error when the normalized instant lies
    /// outside the supported range of ±10^8 days.
    pub fn checked(days: i64, time_ns: i64) -> Result<EpochInstant, Error> {
        let instant = EpochInstant::new(days, time_ns);
        if instant.days < MIN_EPOCH_DAY
            || instant.days > MAX_EPOCH_DAY
            || (instant.days == MAX_EPOCH_DAY && instant.time_ns != 0)
        {
            return Err(Error::range(
                "epoch day",
                instant.days,
                MIN_EPOCH_DAY,
                MAX_EPOCH_DAY,
            ));
        }
        Ok(instant)
    }

    /// Combines a civil date and wall-clock time, read as UTC, into an
    /// instant.
    pub fn from_date_time(date: IsoDate, time: IsoTime) -> EpochInstant {
        EpochInstant {
            days: date.to_epoch_day(),
            time_ns: time.to_nanosecond_of_day(),
        }
    }

    /// Creates an instant from a total nanosecond count since the epoch.
    pub fn from_nanoseconds(nanos: i128) -> EpochInstant {
        let (days, time_ns) = math::split_days_nanos(nanos);
        EpochInstant { days, time_ns }
    }

    /// Creates an instant from a millisecond count since the epoch.
    pub fn from_milliseconds(millis: i64) -> EpochInstant {
        let (days, millis_of_day) = math::divmod_floor(millis, MILLIS_PER_DAY);
        EpochInstant { days, time_ns: millis_of_day * NANOS_PER_MILLI }
    }

    /// Returns the total number of nanoseconds since the epoch.
    pub fn to_nanoseconds(self) -> i128 {
        i128::from(self.days) * i128::from(NANOS_PER_DAY)
            + i128::from(self.time_ns)
    }

    /// Returns the number of whole milliseconds since the epoch, floored.
    pub fn to_milliseconds_floor(self) -> i64 {
        self.days * MILLIS_PER_DAY + self.time_ns / NANOS_PER_MILLI
    }

    /// Returns the number of whole seconds since the epoch, floored.
    pub fn to_seconds_floor(self) -> i64 {
        self.days * SECONDS_PER_DAY + self.time_ns / NANOS_PER_SECOND
    }

    pub fn days(self) -> i64 {
        self.days
    }

    /// The canonical sub-day remainder, in `[0, 86_400_000_000_000)`.
    pub fn time_ns(self) -> i64 {
        self.time_ns
    }

    /// Splits this instant into its civil date and time, read as UTC.
    pub fn to_date_time(self) -> Result<(IsoDate, IsoTime), Error> {
        let date = IsoDate::from_epoch_day(self.days)?;
        let time = IsoTime::from_nanosecond_of_day(self.time_ns)
            .expect("instant remainder is always canonical");
        Ok((date, time))
    }

    /// Adds an elapsed-time duration, failing if the result leaves the
    /// supported instant range.
    pub fn checked_add(
        self,
        duration: TimeDuration,
    ) -> Result<EpochInstant, Error> {
        let sum = self.to_nanoseconds() + duration.to_nanoseconds();
        let (days, time_ns) = math::split_days_nanos(sum);
        EpochInstant::checked(days, time_ns)
    }

    /// Returns the elapsed time from this instant to `other`. Negative when
    /// `other` is earlier.
    pub fn until(self, other: EpochInstant) -> TimeDuration {
        TimeDuration::from_nanoseconds(
            other.to_nanoseconds() - self.to_nanoseconds(),
        )
    }

    /// Rounds this instant to a multiple of the given nanosecond increment.
    ///
    /// The increment must be positive. Callers validate the increment
    /// against its unit's maximum before getting here.
    pub fn round_to_increment(
        self,
        increment_ns: i64,
        mode: RoundMode,
    ) -> EpochInstant {
        let rounded =
            mode.round(self.to_nanoseconds(), i128::from(increment_ns));
        EpochInstant::from_nanoseconds(rounded)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for EpochInstant {
    fn arbitrary(g: &mut quickcheck::Gen) -> EpochInstant {
        let days = i64::arbitrary(g).rem_euclid(2 * MAX_EPOCH_DAY + 1)
            - MAX_EPOCH_DAY;
        let time_ns = i64::arbitrary(g).rem_euclid(NANOS_PER_DAY);
        EpochInstant::new(days, time_ns)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let pair = (self.days, self.time_ns);
        Box::new(pair.shrink().map(|(d, ns)| {
            EpochInstant::new(
                d.clamp(MIN_EPOCH_DAY, MAX_EPOCH_DAY),
                ns.rem_euclid(NANOS_PER_DAY),
            )
        }))
    }
}
