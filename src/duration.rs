/*!
Elapsed-time and mixed-unit duration values.

[`TimeDuration`] is a normalized elapsed time: a day count and a sub-day
nanosecond remainder that always share a sign. [`Duration`] keeps all ten
unit fields independent, the way a user wrote them, and only guarantees
sign-uniformity and magnitude bounds. [`DateDuration`] is the calendar-unit
slice handed to the calendar layer.
*/

use crate::{
    error::Error,
    round::RoundMode,
    unit::Unit,
    util::math::{self, MAX_SAFE_INTEGER, NANOS_PER_DAY, NANOS_PER_SECOND},
};

/// A normalized elapsed time measured in days and sub-day nanoseconds.
///
/// Both components share a sign (or are zero), which distinguishes this type
/// from [`EpochInstant`](crate::EpochInstant): a pre-epoch instant carries a
/// non-negative remainder, while a negative duration carries a non-positive
/// one. Calendar units have no place here.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeDuration {
    days: i64,
    time_ns: i64,
}

impl TimeDuration {
    /// Creates a duration from a possibly non-canonical pair, renormalizing
    /// so that both components share a sign and the remainder is a sub-day
    /// magnitude.
    pub fn new(days: i64, time_ns: i64) -> TimeDuration {
        let total = i128::from(days) * i128::from(NANOS_PER_DAY)
            + i128::from(time_ns);
        TimeDuration::from_nanoseconds(total)
    }

    /// Creates a duration from a total nanosecond count.
    pub fn from_nanoseconds(nanos: i128) -> TimeDuration {
        // Truncating division keeps the components sign-uniform, unlike the
        // floored split used for instants.
        let days = nanos / i128::from(NANOS_PER_DAY);
        let time_ns = nanos % i128::from(NANOS_PER_DAY);
        debug_assert!(i64::try_from(days).is_ok(), "day count overflows i64");
        TimeDuration { days: days as i64, time_ns: time_ns as i64 }
    }

    /// Creates a duration from a total microsecond count.
    pub fn from_microseconds(micros: i128) -> TimeDuration {
        TimeDuration::from_nanoseconds(micros * 1_000)
    }

    /// Creates a duration from a total millisecond count.
    pub fn from_milliseconds(millis: i64) -> TimeDuration {
        TimeDuration::from_nanoseconds(i128::from(millis) * 1_000_000)
    }

    /// Creates a duration from a total second count.
    pub fn from_seconds(seconds: i64) -> TimeDuration {
        TimeDuration::from_nanoseconds(
            i128::from(seconds) * i128::from(NANOS_PER_SECOND),
        )
    }

    pub fn days(self) -> i64 {
        self.days
    }

    /// The sub-day remainder, sharing the sign of the day component.
    pub fn time_ns(self) -> i64 {
        self.time_ns
    }

    /// Returns the total number of nanoseconds this duration spans.
    pub fn to_nanoseconds(self) -> i128 {
        i128::from(self.days) * i128::from(NANOS_PER_DAY)
            + i128::from(self.time_ns)
    }

    pub fn add(self, other: TimeDuration) -> TimeDuration {
        TimeDuration::from_nanoseconds(
            self.to_nanoseconds() + other.to_nanoseconds(),
        )
    }

    pub fn negated(self) -> TimeDuration {
        TimeDuration { days: -self.days, time_ns: -self.time_ns }
    }

    pub fn abs(self) -> TimeDuration {
        TimeDuration { days: self.days.abs(), time_ns: self.time_ns.abs() }
    }

    /// Returns `-1`, `0` or `1` according to the sign of this duration.
    pub fn signum(self) -> i8 {
        if self.days != 0 {
            self.days.signum() as i8
        } else {
            self.time_ns.signum() as i8
        }
    }

    pub fn is_zero(self) -> bool {
        self.days == 0 && self.time_ns == 0
    }

    /// Rounds this duration to a multiple of the given nanosecond
    /// increment.
    pub fn round_to_increment(
        self,
        increment_ns: i64,
        mode: RoundMode,
    ) -> TimeDuration {
        let rounded =
            mode.round(self.to_nanoseconds(), i128::from(increment_ns));
        TimeDuration::from_nanoseconds(rounded)
    }

    /// Rounds this duration to a whole number of days.
    ///
    /// The obvious formulation rounds `days + time_ns / NANOS_PER_DAY` as a
    /// single quantity, but forming that total can dwarf the remainder when
    /// the day count is astronomically large. Instead the decision is made
    /// on a synthetic two-day quantity that preserves the remainder, the
    /// rounding direction, and the parity of the day count (which the
    /// half-even mode inspects).
    pub fn round_by_days(self, mode: RoundMode) -> i64 {
        if self.signum() < 0 {
            return -self.negated().round_by_days(mode.flipped());
        }
        let parity = self.days % 2;
        let synthetic = parity * NANOS_PER_DAY + self.time_ns;
        let rounded = mode
            .round(i128::from(synthetic), i128::from(NANOS_PER_DAY))
            as i64;
        self.days + (rounded / NANOS_PER_DAY - parity)
    }

    /// Renders this duration as an exact decimal second count, e.g.
    /// `"-90061.000000500"`.
    ///
    /// The digits are composed directly from the integer components. There
    /// is no floating point division anywhere, so no precision is lost even
    /// for magnitudes beyond what a double can represent.
    pub fn to_decimal_seconds_string(self) -> String {
        let total = self.to_nanoseconds();
        let magnitude = total.unsigned_abs();
        let seconds = magnitude / (NANOS_PER_SECOND as u128);
        let subsec = (magnitude % (NANOS_PER_SECOND as u128)) as i64;
        let mut out = String::new();
        if total < 0 {
            out.push('-');
        }
        out.push_str(&seconds.to_string());
        out.push('.');
        math::push_padded(&mut out, subsec, 9);
        out
    }

    /// Returns this duration as a (possibly lossy) second count in a
    /// double, by parsing the exact decimal rendering.
    ///
    /// Parsing the string gives correctly rounded conversion; composing the
    /// value from two separate float divisions would not.
    pub fn to_seconds_f64(self) -> f64 {
        self.to_decimal_seconds_string()
            .parse()
            .expect("decimal rendering is always a valid float literal")
    }
}

/// The calendar-unit slice of a duration: the part whose length depends on
/// a calendar reference point.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateDuration {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
}

impl DateDuration {
    pub fn new(years: i64, months: i64, weeks: i64, days: i64) -> DateDuration {
        DateDuration { years, months, weeks, days }
    }

    pub fn negated(self) -> DateDuration {
        DateDuration {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
        }
    }

    pub fn is_zero(self) -> bool {
        self.years == 0 && self.months == 0 && self.weeks == 0 && self.days == 0
    }

    pub fn signum(self) -> i8 {
        for field in [self.years, self.months, self.weeks, self.days] {
            if field != 0 {
                return field.signum() as i8;
            }
        }
        0
    }
}

/// The bound on the magnitude of each calendar field of a [`Duration`].
const MAX_CALENDAR_FIELD: i64 = (1 << 32) - 1;

/// A span of time expressed in up to ten independent unit fields.
///
/// Unlike [`TimeDuration`], the fields here are never balanced into one
/// another: `90 minutes` and `1 hour 30 minutes` are distinct values. The
/// invariants are sign-uniformity (all fields share a sign or are zero),
/// calendar fields below `2^32` in magnitude, and a total time portion of at
/// most `2^53 - 1` seconds.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
    microseconds: i64,
    nanoseconds: i64,
}

impl Duration {
    /// Creates a duration from all ten fields, validating the invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        years: i64,
        months: i64,
        weeks: i64,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
        microseconds: i64,
        nanoseconds: i64,
    ) -> Result<Duration, Error> {
        let duration = Duration {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        };
        duration.check()?;
        Ok(duration)
    }

    /// A duration with every field zero.
    pub const fn zero() -> Duration {
        Duration {
            years: 0,
            months: 0,
            weeks: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            milliseconds: 0,
            microseconds: 0,
            nanoseconds: 0,
        }
    }

    fn check(&self) -> Result<(), Error> {
        let mut sign = 0i8;
        for unit in Unit::ALL {
            let value = self.field(unit);
            if value == 0 {
                continue;
            }
            let field_sign = value.signum() as i8;
            if sign == 0 {
                sign = field_sign;
            } else if sign != field_sign {
                return Err(crate::error::err!(
                    "duration fields must all have the same sign, \
                     but {value} {unit} conflicts with the sign of an \
                     earlier field",
                    unit = unit.plural(),
                ));
            }
        }
        for unit in [Unit::Year, Unit::Month, Unit::Week, Unit::Day] {
            let value = self.field(unit);
            if value.unsigned_abs() > MAX_CALENDAR_FIELD as u64 {
                return Err(Error::range(
                    unit.plural(),
                    value,
                    -MAX_CALENDAR_FIELD,
                    MAX_CALENDAR_FIELD,
                ));
            }
        }
        // The time portion, taken together, must stay within the range a
        // double can represent exactly when expressed in seconds. Summed in
        // nanoseconds so that sub-second fields count toward the total.
        let nanos = (i128::from(self.hours) * 3600
            + i128::from(self.minutes) * 60
            + i128::from(self.seconds))
            * 1_000_000_000
            + i128::from(self.milliseconds) * 1_000_000
            + i128::from(self.microseconds) * 1_000
            + i128::from(self.nanoseconds);
        if nanos.unsigned_abs() > MAX_SAFE_INTEGER as u128 * 1_000_000_000 {
            return Err(Error::range(
                "duration seconds",
                nanos.div_euclid(1_000_000_000),
                -i128::from(MAX_SAFE_INTEGER),
                i128::from(MAX_SAFE_INTEGER),
            ));
        }
        Ok(())
    }

    /// Returns the value of the given unit's field.
    pub fn field(&self, unit: Unit) -> i64 {
        match unit {
            Unit::Year => self.years,
            Unit::Month => self.months,
            Unit::Week => self.weeks,
            Unit::Day => self.days,
            Unit::Hour => self.hours,
            Unit::Minute => self.minutes,
            Unit::Second => self.seconds,
            Unit::Millisecond => self.milliseconds,
            Unit::Microsecond => self.microseconds,
            Unit::Nanosecond => self.nanoseconds,
        }
    }

    /// Returns a new duration with the given unit's field replaced,
    /// revalidating the invariants.
    pub fn with_field(&self, unit: Unit, value: i64) -> Result<Duration, Error> {
        let mut duration = *self;
        match unit {
            Unit::Year => duration.years = value,
            Unit::Month => duration.months = value,
            Unit::Week => duration.weeks = value,
            Unit::Day => duration.days = value,
            Unit::Hour => duration.hours = value,
            Unit::Minute => duration.minutes = value,
            Unit::Second => duration.seconds = value,
            Unit::Millisecond => duration.milliseconds = value,
            Unit::Microsecond => duration.microseconds = value,
            Unit::Nanosecond => duration.nanoseconds = value,
        }
        duration.check()?;
        Ok(duration)
    }

    pub fn negated(&self) -> Duration {
        Duration {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
            milliseconds: -self.milliseconds,
            microseconds: -self.microseconds,
            nanoseconds: -self.nanoseconds,
        }
    }

    pub fn abs(&self) -> Duration {
        if self.signum() < 0 {
            self.negated()
        } else {
            *self
        }
    }

    /// Returns the shared sign of the fields: `-1`, `0` or `1`.
    pub fn signum(&self) -> i8 {
        for unit in Unit::ALL {
            let value = self.field(unit);
            if value != 0 {
                return value.signum() as i8;
            }
        }
        0
    }

    pub fn is_zero(&self) -> bool {
        self.signum() == 0
    }

    /// The calendar-unit slice of this duration.
    pub fn date_part(&self) -> DateDuration {
        DateDuration {
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
        }
    }

    /// The time-unit slice of this duration, balanced into a normalized
    /// elapsed time.
    pub fn time_part(&self) -> TimeDuration {
        let nanos = i128::from(self.hours) * 3_600_000_000_000
            + i128::from(self.minutes) * 60_000_000_000
            + i128::from(self.seconds) * 1_000_000_000
            + i128::from(self.milliseconds) * 1_000_000
            + i128::from(self.microseconds) * 1_000
            + i128::from(self.nanoseconds);
        TimeDuration::from_nanoseconds(nanos)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for TimeDuration {
    fn arbitrary(g: &mut quickcheck::Gen) -> TimeDuration {
        let days = i64::arbitrary(g).rem_euclid(400_000_001) - 200_000_000;
        let time_ns = i64::arbitrary(g) % NANOS_PER_DAY;
        TimeDuration::new(days, time_ns)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let pair = (self.days, self.time_ns);
        Box::new(
            pair.shrink()
                .map(|(d, ns)| TimeDuration::new(d, ns % NANOS_PER_DAY)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_sign_uniform() {
        let d = TimeDuration::new(1, -1);
        assert_eq!((0, NANOS_PER_DAY - 1), (d.days(), d.time_ns()));

        let d = TimeDuration::new(-1, 1);
        assert_eq!((0, -(NANOS_PER_DAY - 1)), (d.days(), d.time_ns()));

        let d = TimeDuration::from_nanoseconds(-i128::from(NANOS_PER_DAY) - 5);
        assert_eq!((-1, -5), (d.days(), d.time_ns()));
    }

    #[test]
    fn unit_constructors() {
        assert_eq!(
            TimeDuration::new(0, 1_500_000_000),
            TimeDuration::from_milliseconds(1_500),
        );
        assert_eq!(
            TimeDuration::new(1, 0),
            TimeDuration::from_seconds(86_400),
        );
        assert_eq!(
            TimeDuration::new(0, -2_000),
            TimeDuration::from_microseconds(-2),
        );
    }

    #[test]
    fn arithmetic() {
        let a = TimeDuration::new(1, 500);
        let b = TimeDuration::new(-2, -1_000);
        assert_eq!(TimeDuration::new(-1, -500), a.add(b));
        assert_eq!(TimeDuration::new(2, 1_000), b.abs());
        assert_eq!(-1, b.signum());
        assert_eq!(1, b.negated().signum());
        assert_eq!(0, TimeDuration::default().signum());
        assert!(b < a);
    }

    #[test]
    fn day_rounding() {
        let half = NANOS_PER_DAY / 2;
        let d = TimeDuration::new(10, half);
        assert_eq!(10, d.round_by_days(RoundMode::HalfEven));
        assert_eq!(11, d.round_by_days(RoundMode::HalfExpand));
        assert_eq!(10, d.round_by_days(RoundMode::Trunc));
        assert_eq!(11, d.round_by_days(RoundMode::Ceil));

        // Odd day count: the half-even tie now rounds up.
        let d = TimeDuration::new(11, half);
        assert_eq!(12, d.round_by_days(RoundMode::HalfEven));

        let d = TimeDuration::new(-10, -half);
        assert_eq!(-10, d.round_by_days(RoundMode::HalfEven));
        assert_eq!(-11, d.round_by_days(RoundMode::HalfExpand));
        assert_eq!(-10, d.round_by_days(RoundMode::Ceil));
        assert_eq!(-11, d.round_by_days(RoundMode::Floor));

        // Day counts too large for a double to track the remainder.
        let d = TimeDuration::new(4_503_599_627_370_497, 1);
        assert_eq!(4_503_599_627_370_497, d.round_by_days(RoundMode::Trunc));
        assert_eq!(4_503_599_627_370_498, d.round_by_days(RoundMode::Ceil));
    }

    #[test]
    fn decimal_rendering() {
        let d = TimeDuration::new(-1, -(3_661 * NANOS_PER_SECOND + 500));
        assert_eq!("-90061.000000500", d.to_decimal_seconds_string());
        assert_eq!(-90061.0000005, d.to_seconds_f64());

        let d = TimeDuration::from_nanoseconds(1);
        assert_eq!("0.000000001", d.to_decimal_seconds_string());

        let d = TimeDuration::default();
        assert_eq!("0.000000000", d.to_decimal_seconds_string());
    }

    #[test]
    fn duration_validation() {
        assert!(Duration::new(1, 2, 0, 3, 0, 0, 4, 0, 0, 5).is_ok());
        assert!(Duration::new(-1, 0, 0, 0, 0, 0, -4, 0, 0, 0).is_ok());

        let err = Duration::new(1, 0, 0, 0, 0, 0, -4, 0, 0, 0).unwrap_err();
        assert!(err.is_invalid());

        let err = Duration::new(1 << 32, 0, 0, 0, 0, 0, 0, 0, 0, 0)
            .unwrap_err();
        assert!(err.is_range());

        // Time portion beyond the safe-integer second bound.
        let err = Duration::new(
            0,
            0,
            0,
            0,
            0,
            0,
            MAX_SAFE_INTEGER,
            2_000,
            0,
            0,
        )
        .unwrap_err();
        assert!(err.is_range());

        // Sub-second fields count toward the bound even when they do not
        // amount to a whole second on their own.
        let err = Duration::new(
            0,
            0,
            0,
            0,
            0,
            0,
            MAX_SAFE_INTEGER,
            999,
            999,
            999,
        )
        .unwrap_err();
        assert!(err.is_range());
        assert!(
            Duration::new(0, 0, 0, 0, 0, 0, MAX_SAFE_INTEGER, 0, 0, 0).is_ok()
        );
    }

    #[test]
    fn duration_accessors() {
        let d = Duration::new(1, 2, 3, 4, 5, 6, 7, 8, 9, 10).unwrap();
        assert_eq!(1, d.field(Unit::Year));
        assert_eq!(10, d.field(Unit::Nanosecond));
        assert_eq!(
            DateDuration::new(1, 2, 3, 4),
            d.date_part(),
        );
        let expected_ns = 5i128 * 3_600_000_000_000
            + 6 * 60_000_000_000
            + 7 * 1_000_000_000
            + 8 * 1_000_000
            + 9 * 1_000
            + 10;
        assert_eq!(expected_ns, d.time_part().to_nanoseconds());

        let d = d.with_field(Unit::Week, 30).unwrap();
        assert_eq!(30, d.field(Unit::Week));
        assert!(d.with_field(Unit::Week, -1).is_err());

        assert_eq!(-1, d.negated().signum());
        assert_eq!(d.abs(), d.negated().abs());
    }

    quickcheck::quickcheck! {
        fn prop_abs_negated(d: TimeDuration) -> bool {
            d.negated().abs() == d.abs()
        }

        fn prop_sign_negated(d: TimeDuration) -> bool {
            if d.signum() == 0 {
                d.negated().signum() == 0
            } else {
                d.negated().signum() == -d.signum()
            }
        }

        fn prop_nanosecond_round_trip(d: TimeDuration) -> bool {
            TimeDuration::from_nanoseconds(d.to_nanoseconds()) == d
        }

        // Day rounding agrees with rounding the total nanosecond count for
        // moderately sized durations.
        fn prop_round_by_days_exact(d: TimeDuration) -> bool {
            let mode = RoundMode::HalfExpand;
            let expected = mode.round(
                d.to_nanoseconds(),
                i128::from(NANOS_PER_DAY),
            ) / i128::from(NANOS_PER_DAY);
            i128::from(d.round_by_days(mode)) == expected
        }
    }
}
