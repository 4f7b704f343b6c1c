/*!
POSIX `TZ` rule strings.

A rule string like `EST5EDT,M3.2.0,M11.1.0` describes a zone entirely by
formula: a standard offset, an optional daylight offset, and the two
`Mm.w.d[/time]` rules giving the yearly transition days. This is the rule
backend behind the built-in zone table. Note the POSIX sign convention:
the offset in the string counts hours *west* of Greenwich, so `EST5` is
UTC-5.

Only the month-week-weekday rule form is supported; the Julian-day forms
do not appear in the built-in table.
*/

use crate::{
    civil::{self, IsoDate},
    error::{err, Error},
    util::math::SECONDS_PER_DAY,
};

/// A time zone described by a POSIX `TZ` rule string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PosixZone {
    /// Standard UTC offset in seconds, east positive.
    std_offset: i32,
    dst: Option<PosixDst>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct PosixDst {
    /// Daylight UTC offset in seconds, east positive.
    offset: i32,
    start: Rule,
    end: Rule,
}

/// An `Mm.w.d[/time]` transition rule: weekday `d` (Sunday is 0) of week
/// `w` in month `m`, at the given local wall time in seconds.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Rule {
    month: i8,
    week: i8,
    weekday: i8,
    time: i32,
}

impl Rule {
    /// The epoch day this rule selects in the given year. Week 5 means the
    /// last occurrence of the weekday in the month.
    fn epoch_day(&self, year: i32) -> i64 {
        let first = IsoDate::new_unchecked(year, self.month, 1).to_epoch_day();
        // Epoch day 0 is a Thursday; day-of-week with Sunday as 0.
        let first_weekday = ((first + 4).rem_euclid(7)) as i8;
        let mut day =
            1 + (self.weekday - first_weekday).rem_euclid(7) as i64;
        day += 7 * (i64::from(self.week) - 1);
        let len = i64::from(civil::days_in_month(year, self.month));
        while day > len {
            day -= 7;
        }
        first + day - 1
    }
}

impl PosixZone {
    pub(crate) fn parse(tz: &str) -> Result<PosixZone, Error> {
        let mut p = Parser { input: tz.as_bytes(), pos: 0 };
        p.abbreviation()?;
        // POSIX offsets count west of Greenwich.
        let std_offset = -p.offset()?;
        if p.done() {
            return Ok(PosixZone { std_offset, dst: None });
        }
        p.abbreviation()?;
        let dst_offset = if p.peek() == Some(b',') || p.done() {
            std_offset + 3600
        } else {
            -p.offset()?
        };
        p.expect(b',')?;
        let start = p.rule()?;
        p.expect(b',')?;
        let end = p.rule()?;
        if !p.done() {
            return Err(err!("trailing input in POSIX time zone {tz:?}"));
        }
        Ok(PosixZone {
            std_offset,
            dst: Some(PosixDst { offset: dst_offset, start, end }),
        })
    }

    /// The UTC offset, in seconds east, observed at the given UTC second.
    pub(crate) fn offset_seconds(&self, utc_seconds: i64) -> i32 {
        let Some(ref dst) = self.dst else { return self.std_offset };
        // Rules are written in local wall time: the start of daylight time
        // in standard time, the end of it in daylight time.
        let year = IsoDate::from_epoch_day_unbounded(
            (utc_seconds + i64::from(self.std_offset))
                .div_euclid(SECONDS_PER_DAY),
        )
        .year();
        let start_utc = dst.start.epoch_day(year) * SECONDS_PER_DAY
            + i64::from(dst.start.time)
            - i64::from(self.std_offset);
        let end_utc = dst.end.epoch_day(year) * SECONDS_PER_DAY
            + i64::from(dst.end.time)
            - i64::from(dst.offset);
        let in_dst = if start_utc <= end_utc {
            (start_utc..end_utc).contains(&utc_seconds)
        } else {
            // Southern hemisphere: daylight time wraps the new year.
            utc_seconds >= start_utc || utc_seconds < end_utc
        };
        if in_dst {
            dst.offset
        } else {
            self.std_offset
        }
    }
}

struct Parser<'i> {
    input: &'i [u8],
    pos: usize,
}

impl<'i> Parser<'i> {
    fn done(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, byte: u8) -> Result<(), Error> {
        if self.bump() != Some(byte) {
            return Err(err!(
                "expected {:?} in POSIX time zone string",
                char::from(byte),
            ));
        }
        Ok(())
    }

    /// A zone abbreviation: either letters, or anything in angle brackets.
    fn abbreviation(&mut self) -> Result<(), Error> {
        if self.peek() == Some(b'<') {
            while let Some(byte) = self.bump() {
                if byte == b'>' {
                    return Ok(());
                }
            }
            return Err(err!("unclosed '<' in POSIX time zone string"));
        }
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        if self.pos - start < 3 {
            return Err(err!(
                "POSIX time zone abbreviation must be at least 3 letters",
            ));
        }
        Ok(())
    }

    /// A `[+-]h[:mm[:ss]]` offset, returned in POSIX-signed seconds.
    fn offset(&mut self) -> Result<i32, Error> {
        let sign = match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                -1
            }
            Some(b'+') => {
                self.pos += 1;
                1
            }
            _ => 1,
        };
        let hours = self.number(2)?;
        if hours > 24 {
            return Err(Error::range("offset hours", hours, 0, 24));
        }
        let mut seconds = hours * 3600;
        for scale in [60, 1] {
            if self.peek() != Some(b':') {
                break;
            }
            self.pos += 1;
            let part = self.number(2)?;
            if part > 59 {
                return Err(Error::range("offset minutes", part, 0, 59));
            }
            seconds += part * scale;
        }
        Ok(sign * seconds)
    }

    fn rule(&mut self) -> Result<Rule, Error> {
        self.expect(b'M')?;
        let month = self.number(2)?;
        if !(1..=12).contains(&month) {
            return Err(Error::range("rule month", month, 1, 12));
        }
        self.expect(b'.')?;
        let week = self.number(1)?;
        if !(1..=5).contains(&week) {
            return Err(Error::range("rule week", week, 1, 5));
        }
        self.expect(b'.')?;
        let weekday = self.number(1)?;
        if !(0..=6).contains(&weekday) {
            return Err(Error::range("rule weekday", weekday, 0, 6));
        }
        let time = if self.peek() == Some(b'/') {
            self.pos += 1;
            self.offset()?
        } else {
            // Transitions default to 02:00 local.
            7200
        };
        Ok(Rule {
            month: month as i8,
            week: week as i8,
            weekday: weekday as i8,
            time,
        })
    }

    fn number(&mut self, max_digits: usize) -> Result<i32, Error> {
        let start = self.pos;
        while self.pos - start < max_digits
            && self.peek().is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(err!("expected a number in POSIX time zone string"));
        }
        let mut n = 0i32;
        for &byte in &self.input[start..self.pos] {
            n = n * 10 + i32::from(byte - b'0');
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_seconds(y: i32, m: i8, d: i8, hour: i64, minute: i64) -> i64 {
        IsoDate::new(y, m, d).unwrap().to_epoch_day() * SECONDS_PER_DAY
            + hour * 3600
            + minute * 60
    }

    #[test]
    fn parse_forms() {
        let zone = PosixZone::parse("MST7").unwrap();
        assert_eq!(-7 * 3600, zone.std_offset);
        assert!(zone.dst.is_none());

        let zone = PosixZone::parse("<+0330>-3:30").unwrap();
        assert_eq!(3 * 3600 + 1800, zone.std_offset);

        let zone = PosixZone::parse("<-03>3").unwrap();
        assert_eq!(-3 * 3600, zone.std_offset);

        let zone = PosixZone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        assert_eq!(-5 * 3600, zone.std_offset);
        let dst = zone.dst.as_ref().unwrap();
        // Daylight offset defaults to one hour past standard.
        assert_eq!(-4 * 3600, dst.offset);
        assert_eq!(7200, dst.start.time);

        let zone = PosixZone::parse("GMT0BST,M3.5.0/1,M10.5.0").unwrap();
        assert_eq!(0, zone.std_offset);
        assert_eq!(3600, zone.dst.as_ref().unwrap().start.time);

        assert!(PosixZone::parse("").is_err());
        assert!(PosixZone::parse("EST").is_err());
        assert!(PosixZone::parse("EST5EDT").is_err());
        assert!(PosixZone::parse("EST5EDT,M3.2.0").is_err());
        assert!(PosixZone::parse("E5").is_err());
    }

    #[test]
    fn rule_day_selection() {
        let rule = Rule { month: 3, week: 2, weekday: 0, time: 7200 };
        // Second Sunday of March 2025 is the 9th.
        assert_eq!(
            IsoDate::new(2025, 3, 9).unwrap().to_epoch_day(),
            rule.epoch_day(2025),
        );
        // Week 5 clamps to the last occurrence.
        let rule = Rule { month: 3, week: 5, weekday: 0, time: 3600 };
        assert_eq!(
            IsoDate::new(2025, 3, 30).unwrap().to_epoch_day(),
            rule.epoch_day(2025),
        );
        assert_eq!(
            IsoDate::new(2024, 3, 31).unwrap().to_epoch_day(),
            rule.epoch_day(2024),
        );
    }

    #[test]
    fn london_spring_forward() {
        let zone = PosixZone::parse("GMT0BST,M3.5.0/1,M10.5.0").unwrap();
        // The 2025 change is at 01:00 UTC on March 30.
        assert_eq!(0, zone.offset_seconds(utc_seconds(2025, 3, 30, 0, 59)));
        assert_eq!(3600, zone.offset_seconds(utc_seconds(2025, 3, 30, 1, 0)));
        // And back at 01:00 UTC on October 26 (02:00 BST).
        assert_eq!(3600, zone.offset_seconds(utc_seconds(2025, 10, 26, 0, 59)));
        assert_eq!(0, zone.offset_seconds(utc_seconds(2025, 10, 26, 1, 0)));
    }

    #[test]
    fn new_york_rules() {
        let zone = PosixZone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
        // 2025: forward March 9 at 07:00 UTC, back November 2 at 06:00 UTC.
        assert_eq!(
            -5 * 3600,
            zone.offset_seconds(utc_seconds(2025, 3, 9, 6, 59)),
        );
        assert_eq!(
            -4 * 3600,
            zone.offset_seconds(utc_seconds(2025, 3, 9, 7, 0)),
        );
        assert_eq!(
            -4 * 3600,
            zone.offset_seconds(utc_seconds(2025, 11, 2, 5, 59)),
        );
        assert_eq!(
            -5 * 3600,
            zone.offset_seconds(utc_seconds(2025, 11, 2, 6, 0)),
        );
    }

    #[test]
    fn southern_hemisphere_wrap() {
        let zone =
            PosixZone::parse("AEST-10AEDT,M10.1.0,M4.1.0/3").unwrap();
        // January is daylight time in Sydney, July is not.
        assert_eq!(
            11 * 3600,
            zone.offset_seconds(utc_seconds(2025, 1, 15, 0, 0)),
        );
        assert_eq!(
            10 * 3600,
            zone.offset_seconds(utc_seconds(2025, 7, 15, 0, 0)),
        );
        // 2025 end: first Sunday of April at 03:00 AEDT = 16:00 UTC Apr 5.
        assert_eq!(
            11 * 3600,
            zone.offset_seconds(utc_seconds(2025, 4, 5, 15, 59)),
        );
        assert_eq!(
            10 * 3600,
            zone.offset_seconds(utc_seconds(2025, 4, 5, 16, 0)),
        );
        // 2025 start: first Sunday of October at 02:00 AEST = 16:00 UTC
        // October 4.
        assert_eq!(
            10 * 3600,
            zone.offset_seconds(utc_seconds(2025, 10, 4, 15, 59)),
        );
        assert_eq!(
            11 * 3600,
            zone.offset_seconds(utc_seconds(2025, 10, 4, 16, 0)),
        );
    }
}
