use crate::{
    error::{err, Error},
    util::math,
};

/// A unit of time.
///
/// Units are ordered: bigger units compare greater than smaller ones, so
/// `Unit::Year > Unit::Nanosecond` and `Unit::Hour > Unit::Minute`. The
/// discriminants double as the unit's index in the registry, with
/// nanoseconds at `0` and years at `9`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    Year = 9,
    Month = 8,
    Week = 7,
    Day = 6,
    Hour = 5,
    Minute = 4,
    Second = 3,
    Millisecond = 2,
    Microsecond = 1,
    Nanosecond = 0,
}

impl Unit {
    /// All units, biggest first.
    pub const ALL: [Unit; 10] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
        Unit::Microsecond,
        Unit::Nanosecond,
    ];

    /// Returns the unit with the given registry index, with nanoseconds at
    /// `0` and years at `9`.
    pub fn from_index(index: usize) -> Option<Unit> {
        match index {
            0 => Some(Unit::Nanosecond),
            1 => Some(Unit::Microsecond),
            2 => Some(Unit::Millisecond),
            3 => Some(Unit::Second),
            4 => Some(Unit::Minute),
            5 => Some(Unit::Hour),
            6 => Some(Unit::Day),
            7 => Some(Unit::Week),
            8 => Some(Unit::Month),
            9 => Some(Unit::Year),
            _ => None,
        }
    }

    /// Returns this unit's registry index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the next biggest unit, if one exists.
    pub fn next(self) -> Option<Unit> {
        Unit::from_index(self.index() + 1)
    }

    /// Returns the number of nanoseconds in this unit, or `None` for the
    /// calendar units (years, months and weeks), whose length varies with
    /// their reference point.
    ///
    /// A day is taken to be exactly 24 hours, which is the convention for
    /// all civil-time arithmetic in this crate.
    pub fn nanoseconds(self) -> Option<i64> {
        match self {
            Unit::Nanosecond => Some(1),
            Unit::Microsecond => Some(math::NANOS_PER_MICRO),
            Unit::Millisecond => Some(math::NANOS_PER_MILLI),
            Unit::Second => Some(math::NANOS_PER_SECOND),
            Unit::Minute => Some(math::NANOS_PER_MINUTE),
            Unit::Hour => Some(math::NANOS_PER_HOUR),
            Unit::Day => Some(math::NANOS_PER_DAY),
            Unit::Year | Unit::Month | Unit::Week => None,
        }
    }

    /// Returns true for units of the date portion: years through days.
    pub fn is_date(self) -> bool {
        self >= Unit::Day
    }

    /// Returns true for units of the time portion: hours through
    /// nanoseconds.
    pub fn is_time(self) -> bool {
        self <= Unit::Hour
    }

    /// Returns true for the units whose length depends on a calendar
    /// reference point: years, months and weeks.
    pub fn is_calendar(self) -> bool {
        self >= Unit::Week
    }

    /// A human readable singular description of this unit of time.
    pub fn singular(self) -> &'static str {
        match self {
            Unit::Year => "year",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::Millisecond => "millisecond",
            Unit::Microsecond => "microsecond",
            Unit::Nanosecond => "nanosecond",
        }
    }

    /// A human readable plural description of this unit of time.
    pub fn plural(self) -> &'static str {
        match self {
            Unit::Year => "years",
            Unit::Month => "months",
            Unit::Week => "weeks",
            Unit::Day => "days",
            Unit::Hour => "hours",
            Unit::Minute => "minutes",
            Unit::Second => "seconds",
            Unit::Millisecond => "milliseconds",
            Unit::Microsecond => "microseconds",
            Unit::Nanosecond => "nanoseconds",
        }
    }

    /// Looks a unit up by its singular name.
    pub fn from_singular(name: &str) -> Result<Unit, Error> {
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.singular() == name)
            .ok_or_else(|| err!("unrecognized singular unit name {name:?}"))
    }

    /// Looks a unit up by its plural name.
    pub fn from_plural(name: &str) -> Result<Unit, Error> {
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.plural() == name)
            .ok_or_else(|| err!("unrecognized plural unit name {name:?}"))
    }

    /// Returns an error unless this unit belongs to the time portion.
    ///
    /// `what` labels the offending option in the error message, e.g.
    /// `"smallestUnit"`.
    pub fn require_time(self, what: &'static str) -> Result<(), Error> {
        if !self.is_time() {
            return Err(err!(
                "{what} must be a time unit (hours through nanoseconds), \
                 but it is {plural}",
                plural = self.plural(),
            ));
        }
        Ok(())
    }

    /// Returns an error unless this unit belongs to the date portion.
    pub fn require_date(self, what: &'static str) -> Result<(), Error> {
        if !self.is_date() {
            return Err(err!(
                "{what} must be a date unit (years through days), \
                 but it is {plural}",
                plural = self.plural(),
            ));
        }
        Ok(())
    }
}

/// Checks that `largest` and `smallest` form a valid unit bound pair.
///
/// The pair is invalid when the smallest unit is bigger than the largest
/// one.
pub fn check_unit_pair(largest: Unit, smallest: Unit) -> Result<(), Error> {
    if smallest > largest {
        return Err(err!(
            "smallest unit ({smallest}) cannot be bigger than \
             largest unit ({largest})",
            smallest = smallest.plural(),
            largest = largest.plural(),
        ));
    }
    Ok(())
}

#[cfg(test)]
impl quickcheck::Arbitrary for Unit {
    fn arbitrary(g: &mut quickcheck::Gen) -> Unit {
        Unit::from_index(usize::arbitrary(g) % 10).unwrap()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(
            self.index().shrink().map(|n| Unit::from_index(n % 10).unwrap()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(Some(unit), Unit::from_index(unit.index()));
        }
        assert_eq!(None, Unit::from_index(10));
    }

    #[test]
    fn name_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(unit, Unit::from_singular(unit.singular()).unwrap());
            assert_eq!(unit, Unit::from_plural(unit.plural()).unwrap());
        }
        assert!(Unit::from_singular("fortnight").is_err());
        assert!(Unit::from_plural("year").is_err());
    }

    #[test]
    fn classification() {
        assert!(Unit::Year.is_date() && Unit::Year.is_calendar());
        assert!(Unit::Week.is_calendar());
        assert!(Unit::Day.is_date() && !Unit::Day.is_calendar());
        assert!(!Unit::Day.is_time());
        assert!(Unit::Hour.is_time() && !Unit::Hour.is_date());
        assert!(Unit::Nanosecond.is_time());
    }

    #[test]
    fn unit_pairs() {
        assert!(check_unit_pair(Unit::Year, Unit::Nanosecond).is_ok());
        assert!(check_unit_pair(Unit::Hour, Unit::Hour).is_ok());
        let err = check_unit_pair(Unit::Minute, Unit::Day).unwrap_err();
        assert!(err.is_invalid());
    }

    #[test]
    fn group_requirements() {
        assert!(Unit::Minute.require_time("smallestUnit").is_ok());
        assert!(Unit::Month.require_time("smallestUnit").is_err());
        assert!(Unit::Month.require_date("largestUnit").is_ok());
        assert!(Unit::Second.require_date("largestUnit").is_err());
    }

    #[test]
    fn ordering() {
        assert!(Unit::Year > Unit::Nanosecond);
        assert!(Unit::Day > Unit::Hour);
        assert!(Unit::Hour > Unit::Minute);
    }

    #[test]
    fn nanosecond_table() {
        assert_eq!(Some(1), Unit::Nanosecond.nanoseconds());
        assert_eq!(Some(60_000_000_000), Unit::Minute.nanoseconds());
        assert_eq!(Some(86_400_000_000_000), Unit::Day.nanoseconds());
        assert_eq!(None, Unit::Week.nanoseconds());
        assert_eq!(None, Unit::Year.nanoseconds());
    }
}
