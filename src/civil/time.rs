use crate::{
    error::Error,
    util::math::{
        self, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MICRO, NANOS_PER_MILLI,
        NANOS_PER_MINUTE, NANOS_PER_SECOND,
    },
};

/// A civil wall-clock time with nanosecond precision.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsoTime {
    hour: i8,
    minute: i8,
    second: i8,
    millisecond: i16,
    microsecond: i16,
    nanosecond: i16,
}

impl IsoTime {
    /// Creates a new time from its constituent fields, or a range error if
    /// any field is out of bounds.
    pub fn new(
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
        microsecond: i16,
        nanosecond: i16,
    ) -> Result<IsoTime, Error> {
        if !(0..=23).contains(&hour) {
            return Err(Error::range("hour", hour, 0, 23));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::range("minute", minute, 0, 59));
        }
        if !(0..=59).contains(&second) {
            return Err(Error::range("second", second, 0, 59));
        }
        if !(0..=999).contains(&millisecond) {
            return Err(Error::range("millisecond", millisecond, 0, 999));
        }
        if !(0..=999).contains(&microsecond) {
            return Err(Error::range("microsecond", microsecond, 0, 999));
        }
        if !(0..=999).contains(&nanosecond) {
            return Err(Error::range("nanosecond", nanosecond, 0, 999));
        }
        Ok(IsoTime { hour, minute, second, millisecond, microsecond, nanosecond })
    }

    /// `00:00:00.000000000`.
    pub const fn midnight() -> IsoTime {
        IsoTime {
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
            microsecond: 0,
            nanosecond: 0,
        }
    }

    pub fn hour(self) -> i8 {
        self.hour
    }

    pub fn minute(self) -> i8 {
        self.minute
    }

    pub fn second(self) -> i8 {
        self.second
    }

    pub fn millisecond(self) -> i16 {
        self.millisecond
    }

    pub fn microsecond(self) -> i16 {
        self.microsecond
    }

    pub fn nanosecond(self) -> i16 {
        self.nanosecond
    }

    /// Converts this time to the number of nanoseconds since midnight, in
    /// `0..86_400_000_000_000`.
    pub fn to_nanosecond_of_day(self) -> i64 {
        i64::from(self.hour) * NANOS_PER_HOUR
            + i64::from(self.minute) * NANOS_PER_MINUTE
            + i64::from(self.second) * NANOS_PER_SECOND
            + i64::from(self.millisecond) * NANOS_PER_MILLI
            + i64::from(self.microsecond) * NANOS_PER_MICRO
            + i64::from(self.nanosecond)
    }

    /// Converts a count of nanoseconds since midnight back to a wall-clock
    /// time. The count must be in `0..86_400_000_000_000`.
    pub fn from_nanosecond_of_day(nanos: i64) -> Result<IsoTime, Error> {
        if !(0..NANOS_PER_DAY).contains(&nanos) {
            return Err(Error::range(
                "nanosecond of day",
                nanos,
                0,
                NANOS_PER_DAY - 1,
            ));
        }
        let (hour, rest) = math::divmod_floor(nanos, NANOS_PER_HOUR);
        let (minute, rest) = math::divmod_floor(rest, NANOS_PER_MINUTE);
        let (second, rest) = math::divmod_floor(rest, NANOS_PER_SECOND);
        let (millisecond, rest) = math::divmod_floor(rest, NANOS_PER_MILLI);
        let (microsecond, nanosecond) =
            math::divmod_floor(rest, NANOS_PER_MICRO);
        Ok(IsoTime {
            hour: hour as i8,
            minute: minute as i8,
            second: second as i8,
            millisecond: millisecond as i16,
            microsecond: microsecond as i16,
            nanosecond: nanosecond as i16,
        })
    }

    /// Balances an arbitrary (possibly negative, possibly multi-day) count
    /// of nanoseconds into a signed day carry and a canonical wall-clock
    /// time.
    pub fn balance(nanos: i128) -> (i64, IsoTime) {
        let (days, nanos_of_day) = math::split_days_nanos(nanos);
        let time = IsoTime::from_nanosecond_of_day(nanos_of_day)
            .expect("split remainder is always a valid nanosecond of day");
        (days, time)
    }
}
