/*!
Time zone offset and transition resolution.

This module hosts the [`Engine`], the owner of every cache in the crate
and the holder of the one external capability the core consumes: a
[`CivilOracle`] that reports the civil fields observed for an instant in a
given zone and calendar. Offsets fall out of the oracle by subtraction,
and daylight transitions are found by walking windows over the timeline
and bisecting when a window's endpoints disagree.
*/

use std::sync::Mutex;

use crate::{
    civil::{IsoDate, IsoTime},
    epoch::EpochInstant,
    error::{Error, ErrorContext},
    util::{
        cache::Lru,
        math::{NANOS_PER_SECOND, SECONDS_PER_DAY},
    },
};

mod db;
mod posix;

pub use self::db::BuiltinOracle;

/// Civil date-time fields as observed in some zone and calendar, at second
/// precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CivilFields {
    pub year: i32,
    pub month: i8,
    pub day: i8,
    pub hour: i8,
    pub minute: i8,
    pub second: i8,
}

/// The single capability this crate consumes from the outside world.
///
/// Given a calendar identifier (including non-ISO calendars), a time zone
/// identifier and an absolute instant, report the civil fields observed in
/// that zone under that calendar. The default implementation is
/// [`BuiltinOracle`]; an implementation backed by a full IANA database and
/// ICU calendar tables satisfies the same contract.
pub trait CivilOracle: Send + Sync {
    fn civil_datetime(
        &self,
        calendar: &str,
        time_zone: &str,
        instant: EpochInstant,
    ) -> Result<CivilFields, Error>;
}

/// Which neighboring transition to search for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// The nearest transition strictly after the given instant.
    Next,
    /// The nearest transition strictly before the given instant.
    Previous,
}

/// Earliest searchable epoch day, 1843-03-31. Zone behavior before the
/// earliest real tzdata records is not meaningful.
const MIN_HORIZON_DAY: i64 = -46_297;

/// Instants are clamped to this millisecond floor before the oracle sees
/// them, dodging era ambiguity in oracles that render BCE years.
const MIN_CIVIL_MILLIS: i64 = -10_000_000_000_000;

/// Days past the present that the transition search will look, roughly ten
/// years. Rule-based zones repeat forever, so transitions past this bound
/// say nothing new.
const HORIZON_SLACK_DAYS: i64 = 3653;

/// The calendrical engine: the owner of the civil oracle and of every
/// cache in the crate.
///
/// All caches are mutex protected and idempotently populated, so an
/// `Engine` is freely shared across threads; a lost race recomputes a
/// value and overwrites it with an identical one.
pub struct Engine {
    oracle: Box<dyn CivilOracle>,
    /// Persian year number to year-start epoch day.
    persian_years: Mutex<Lru<i32, i64>>,
    /// Upper transition-search bound, in epoch seconds.
    horizon_max: i64,
}

impl Engine {
    /// Creates an engine backed by the built-in oracle.
    pub fn new() -> Engine {
        Engine::with_oracle(Box::new(BuiltinOracle::new()))
    }

    /// Creates an engine backed by the given oracle.
    pub fn with_oracle(oracle: Box<dyn CivilOracle>) -> Engine {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Engine {
            oracle,
            persian_years: Mutex::new(Lru::new(1000)),
            horizon_max: now + HORIZON_SLACK_DAYS * SECONDS_PER_DAY,
        }
    }

    /// The UTC offset, in nanoseconds, observed in the given zone at the
    /// given instant.
    pub fn offset_nanoseconds(
        &self,
        time_zone: &str,
        instant: EpochInstant,
    ) -> Result<i128, Error> {
        // The UTC zone never touches the oracle.
        if time_zone.eq_ignore_ascii_case("UTC")
            || time_zone.eq_ignore_ascii_case("Etc/UTC")
        {
            return Ok(0);
        }
        let millis = instant.to_milliseconds_floor().max(MIN_CIVIL_MILLIS);
        let clamped = EpochInstant::from_milliseconds(millis);
        let fields =
            self.oracle.civil_datetime("iso8601", time_zone, clamped)?;
        let civil = EpochInstant::from_date_time(
            IsoDate::new(fields.year, fields.month, fields.day)?,
            IsoTime::new(fields.hour, fields.minute, fields.second, 0, 0, 0)?,
        );
        // The oracle reports at second precision, so compare against the
        // instant floored to a second.
        let utc_second_ns = i128::from(clamped.to_seconds_floor())
            * i128::from(NANOS_PER_SECOND);
        Ok(civil.to_nanoseconds() - utc_second_ns)
    }

    /// Finds the nearest instant at which the zone's UTC offset changes,
    /// strictly after or strictly before `instant`, or `None` when no
    /// transition exists within the searchable horizon.
    ///
    /// The search walks fixed windows along the timeline, asking for the
    /// offset at each window's endpoints, and bisects down to the second
    /// once a window straddles a change. Windows are sized to the
    /// historical spacing of rule changes, so at most one transition falls
    /// inside any window.
    pub fn time_zone_transition(
        &self,
        time_zone: &str,
        instant: EpochInstant,
        direction: Direction,
    ) -> Result<Option<EpochInstant>, Error> {
        let min = MIN_HORIZON_DAY * SECONDS_PER_DAY;
        let max = self.horizon_max;
        let start = instant.to_seconds_floor().clamp(min, max);
        debug!(
            "searching for transition {direction:?} of {start} in {time_zone}",
        );
        match direction {
            Direction::Next => self.transition_forward(time_zone, start, max),
            Direction::Previous => {
                self.transition_backward(time_zone, start, min)
            }
        }
    }

    fn offset_at_second(
        &self,
        time_zone: &str,
        second: i64,
    ) -> Result<i128, Error> {
        self.offset_nanoseconds(time_zone, instant_at_second(second))
    }

    fn transition_forward(
        &self,
        time_zone: &str,
        start: i64,
        max: i64,
    ) -> Result<Option<EpochInstant>, Error> {
        let mut lo = start;
        let mut lo_offset = self.offset_at_second(time_zone, lo)?;
        let mut width = 2 * SECONDS_PER_DAY;
        while lo < max {
            let hi = (lo + width).min(max);
            let hi_offset = self.offset_at_second(time_zone, hi)?;
            if lo_offset != hi_offset {
                let at = self.bisect(time_zone, lo, hi, lo_offset)?;
                return Ok(Some(instant_at_second(at)));
            }
            lo = hi;
            lo_offset = hi_offset;
            width = window_width(lo);
        }
        Ok(None)
    }

    fn transition_backward(
        &self,
        time_zone: &str,
        start: i64,
        min: i64,
    ) -> Result<Option<EpochInstant>, Error> {
        // Strictly before: a transition exactly at the start must not be
        // returned, and the transition instant is the first second of the
        // new offset, so begin the scan one second early.
        let mut hi = start - 1;
        if hi <= min {
            return Ok(None);
        }
        let mut hi_offset = self.offset_at_second(time_zone, hi)?;
        let mut width = 2 * SECONDS_PER_DAY;
        while hi > min {
            let lo = (hi - width).max(min);
            let lo_offset = self.offset_at_second(time_zone, lo)?;
            if lo_offset != hi_offset {
                let at = self.bisect(time_zone, lo, hi, lo_offset)?;
                return Ok(Some(instant_at_second(at)));
            }
            hi = lo;
            hi_offset = lo_offset;
            width = window_width(hi);
        }
        Ok(None)
    }

    /// Narrows `(lo, hi]`, where the endpoints observe different offsets,
    /// to the first second observing the new offset.
    fn bisect(
        &self,
        time_zone: &str,
        mut lo: i64,
        mut hi: i64,
        lo_offset: i128,
    ) -> Result<i64, Error> {
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.offset_at_second(time_zone, mid)? == lo_offset {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        trace!("bisected transition to {hi} in {time_zone}");
        Ok(hi)
    }

    /// The epoch day on which the given Persian year begins.
    ///
    /// The answer comes from the oracle: at a Gregorian anchor date known
    /// to fall inside the year's first month, ask what Persian day of
    /// month it is and subtract. Results are cached per year.
    pub(crate) fn persian_year_start(&self, year: i32) -> Result<i64, Error> {
        if let Some(start) = self.persian_years.lock().unwrap().get(&year) {
            return Ok(start);
        }
        let anchor = crate::cal::persian::oracle_anchor(year);
        let instant =
            EpochInstant::from_date_time(anchor, IsoTime::midnight());
        let fields = self
            .oracle
            .civil_datetime("persian", "UTC", instant)
            .with_context(|| {
                crate::error::err!(
                    "failed to locate the start of Persian year {year}",
                )
            })?;
        let start = anchor.to_epoch_day() - i64::from(fields.day) + 1;
        self.persian_years.lock().unwrap().insert(year, start);
        Ok(start)
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("horizon_max", &self.horizon_max)
            .finish_non_exhaustive()
    }
}

fn instant_at_second(second: i64) -> EpochInstant {
    EpochInstant::new(
        second.div_euclid(SECONDS_PER_DAY),
        second.rem_euclid(SECONDS_PER_DAY) * NANOS_PER_SECOND,
    )
}

/// How far ahead the next window reaches, sized to how regularly the world
/// changed its clock rules around the given position.
fn window_width(second: i64) -> i64 {
    let year =
        IsoDate::from_epoch_day_unbounded(second.div_euclid(SECONDS_PER_DAY))
            .year();
    if year < 1943 {
        // Wartime rules came and went with little pattern.
        21 * SECONDS_PER_DAY
    } else if (1945..=2000).contains(&year) {
        16 * SECONDS_PER_DAY
    } else {
        // Modern rules keep transitions at least a season apart; 6.5 days
        // steps through a year in under 60 probes.
        13 * SECONDS_PER_DAY / 2
    }
}
