/*!
Calendar systems and the dispatch over them.

[`Calendar`] is a closed enum: the set of recognized calendar identifiers
is fixed, and each one dispatches to a shared algorithm with per-calendar
constants rather than to a string-keyed lookup. The implemented systems are
the ISO/Gregorian family (including the Thai Buddhist and ROC year
renumberings), the 13-month Coptic/Ethiopic family, the Indian national
calendar and the Persian calendar. The remaining identifiers are recognized
and carry era tables, but their date algorithms deliberately fail with a
distinguishable "not implemented" error.

All date math in this module runs over epoch days; a calendar is a pair of
conversions between epoch days and its own `(year, month, day)` triple plus
a handful of shape queries (month lengths, leap years). Only the Persian
calendar needs the [`Engine`], for its oracle-backed year boundary.
*/

use crate::{
    civil::IsoDate,
    duration::DateDuration,
    error::{err, Error},
    tz::Engine,
    unit::Unit,
};

mod coptic;
mod gregorian;
mod indian;
pub(crate) mod persian;

/// How to resolve calendar fields that do not name an existing day.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    /// Clamp an out-of-range field to the nearest valid value.
    #[default]
    Constrain,
    /// Fail with a range error.
    Reject,
}

/// A calendar-neutral month tag: `M01` through `M13`, with an `L` suffix
/// reserved for leap months in lunisolar calendars.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthCode {
    number: i8,
    leap: bool,
}

impl MonthCode {
    pub fn new(number: i8, leap: bool) -> Result<MonthCode, Error> {
        if !(1..=13).contains(&number) {
            return Err(Error::range("month code number", number, 1, 13));
        }
        Ok(MonthCode { number, leap })
    }

    /// Parses a month code of the form `M05` or `M05L`.
    pub fn parse(s: &str) -> Result<MonthCode, Error> {
        let bytes = s.as_bytes();
        let (digits, leap) = match bytes {
            [b'M', d @ .., b'L'] if d.len() == 2 => (d, true),
            [b'M', d @ ..] if d.len() == 2 => (d, false),
            _ => return Err(err!("invalid month code {s:?}")),
        };
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(err!("invalid month code {s:?}"));
        }
        let number = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        MonthCode::new(number as i8, leap)
    }

    pub fn number(self) -> i8 {
        self.number
    }

    pub fn is_leap(self) -> bool {
        self.leap
    }
}

impl core::fmt::Display for MonthCode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "M{:02}", self.number)?;
        if self.leap {
            f.write_str("L")?;
        }
        Ok(())
    }
}

/// Loose calendar-native fields, as a caller (or a parsed string) provides
/// them, before resolution to a concrete date.
#[derive(Clone, Debug, Default)]
pub struct CalendarFields {
    pub era: Option<String>,
    pub era_year: Option<i32>,
    pub year: Option<i32>,
    pub month: Option<i8>,
    pub month_code: Option<MonthCode>,
    pub day: Option<i8>,
}

/// A read-only view of a civil date under a particular calendar.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CalendarDate {
    pub era: Option<&'static str>,
    pub era_year: Option<i32>,
    /// The continuous arithmetic year used for date math.
    pub year: i32,
    pub month: i8,
    pub month_code: MonthCode,
    pub day: i8,
    /// ISO day of week, Monday is `1`.
    pub day_of_week: i8,
    pub day_of_year: i16,
    /// ISO week numbering; `None` for calendars without week semantics.
    pub week_of_year: Option<(i32, i8)>,
    pub days_in_week: i8,
    pub days_in_month: i8,
    pub days_in_year: i16,
    pub months_in_year: i8,
    pub in_leap_year: bool,
}

/// A calendar system identifier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Calendar {
    Iso8601,
    Gregorian,
    Buddhist,
    Roc,
    Coptic,
    Ethiopic,
    EthiopicAmeteAlem,
    Indian,
    Persian,
    Japanese,
    Hebrew,
    Chinese,
    Dangi,
    IslamicCivil,
    IslamicTbla,
    IslamicUmalqura,
}

impl Calendar {
    const ALL: [Calendar; 16] = [
        Calendar::Iso8601,
        Calendar::Gregorian,
        Calendar::Buddhist,
        Calendar::Roc,
        Calendar::Coptic,
        Calendar::Ethiopic,
        Calendar::EthiopicAmeteAlem,
        Calendar::Indian,
        Calendar::Persian,
        Calendar::Japanese,
        Calendar::Hebrew,
        Calendar::Chinese,
        Calendar::Dangi,
        Calendar::IslamicCivil,
        Calendar::IslamicTbla,
        Calendar::IslamicUmalqura,
    ];

    /// The canonical BCP 47 identifier of this calendar.
    pub fn id(self) -> &'static str {
        match self {
            Calendar::Iso8601 => "iso8601",
            Calendar::Gregorian => "gregory",
            Calendar::Buddhist => "buddhist",
            Calendar::Roc => "roc",
            Calendar::Coptic => "coptic",
            Calendar::Ethiopic => "ethiopic",
            Calendar::EthiopicAmeteAlem => "ethioaa",
            Calendar::Indian => "indian",
            Calendar::Persian => "persian",
            Calendar::Japanese => "japanese",
            Calendar::Hebrew => "hebrew",
            Calendar::Chinese => "chinese",
            Calendar::Dangi => "dangi",
            Calendar::IslamicCivil => "islamic-civil",
            Calendar::IslamicTbla => "islamic-tbla",
            Calendar::IslamicUmalqura => "islamic-umalqura",
        }
    }

    /// Looks a calendar up by identifier, ASCII case insensitively.
    pub fn from_id(id: &str) -> Result<Calendar, Error> {
        for calendar in Calendar::ALL {
            if id.eq_ignore_ascii_case(calendar.id()) {
                return Ok(calendar);
            }
        }
        if id.eq_ignore_ascii_case("ethiopic-amete-alem") {
            return Ok(Calendar::EthiopicAmeteAlem);
        }
        Err(err!("unsupported calendar identifier {id:?}"))
    }

    /// Whether this calendar's date algorithms are implemented. Recognized
    /// calendars without implemented algorithms fail every date operation
    /// with a distinguishable "not implemented" error.
    pub fn is_implemented(self) -> bool {
        self.system().is_ok()
    }

    fn system(self) -> Result<System, Error> {
        match self {
            Calendar::Iso8601 | Calendar::Gregorian => {
                Ok(System::Civil { year_offset: gregorian::ISO_OFFSET })
            }
            Calendar::Buddhist => {
                Ok(System::Civil { year_offset: gregorian::BUDDHIST_OFFSET })
            }
            Calendar::Roc => {
                Ok(System::Civil { year_offset: gregorian::ROC_OFFSET })
            }
            Calendar::Coptic => Ok(System::Thirteen(coptic::COPTIC)),
            Calendar::Ethiopic => Ok(System::Thirteen(coptic::ETHIOPIC)),
            Calendar::EthiopicAmeteAlem => {
                Ok(System::Thirteen(coptic::ETHIOPIC_AMETE_ALEM))
            }
            Calendar::Indian => Ok(System::Indian),
            Calendar::Persian => Ok(System::Persian),
            _ => Err(Error::unimplemented(self.id())),
        }
    }

    /// The number of months in every year of this calendar: 13 for the
    /// Coptic/Ethiopic family, 12 for the rest.
    pub fn months_in_year(self) -> Result<i8, Error> {
        Ok(self.system()?.months_in_year())
    }

    pub fn days_in_month(
        self,
        engine: &Engine,
        year: i32,
        month: i8,
    ) -> Result<i8, Error> {
        self.system()?.days_in_month(engine, year, month)
    }

    pub fn days_in_year(self, engine: &Engine, year: i32) -> Result<i16, Error> {
        self.system()?.days_in_year(engine, year)
    }

    pub fn in_leap_year(self, engine: &Engine, year: i32) -> Result<bool, Error> {
        self.system()?.is_leap_year(engine, year)
    }

    /// Whether this calendar attaches era names to years.
    pub fn supports_era(self) -> bool {
        !matches!(self, Calendar::Iso8601)
    }

    /// Resolves an era name, including accepted aliases, to its canonical
    /// form for this calendar.
    pub fn canonicalize_era(self, era: &str) -> Result<&'static str, Error> {
        let eq = |name: &str| era.eq_ignore_ascii_case(name);
        let canonical = match self {
            Calendar::Iso8601 => None,
            Calendar::Gregorian | Calendar::Japanese => {
                // The Japanese calendar is unimplemented, but its Gregorian
                // fallback eras are still recognized names.
                if eq("ce") || eq("ad") {
                    Some("ce")
                } else if eq("bce") || eq("bc") {
                    Some("bce")
                } else {
                    None
                }
            }
            Calendar::Buddhist => eq("be").then_some("be"),
            Calendar::Roc => {
                if eq("roc") || eq("minguo") {
                    Some("roc")
                } else if eq("broc") || eq("before-roc") {
                    Some("broc")
                } else {
                    None
                }
            }
            Calendar::Coptic => eq("am").then_some("am"),
            Calendar::Ethiopic => {
                if eq("am") {
                    Some("am")
                } else if eq("aa") {
                    Some("aa")
                } else {
                    None
                }
            }
            Calendar::EthiopicAmeteAlem => eq("aa").then_some("aa"),
            Calendar::Indian => eq("saka").then_some("saka"),
            Calendar::Persian => eq("ap").then_some("ap"),
            Calendar::Hebrew => eq("am").then_some("am"),
            Calendar::Chinese | Calendar::Dangi => None,
            Calendar::IslamicCivil
            | Calendar::IslamicTbla
            | Calendar::IslamicUmalqura => eq("ah").then_some("ah"),
        };
        canonical.ok_or_else(|| {
            err!(
                "invalid era {era:?} for calendar {id:?}",
                id = self.id(),
            )
        })
    }

    /// Converts an era and era year to the continuous arithmetic year used
    /// for date math.
    pub fn arithmetic_year_for_era_year(
        self,
        era: &str,
        era_year: i32,
    ) -> Result<i32, Error> {
        let era = self.canonicalize_era(era)?;
        match (self, era) {
            (Calendar::Gregorian, "ce") => Ok(era_year),
            (Calendar::Gregorian, "bce") => Ok(1 - era_year),
            (Calendar::Buddhist, "be") => Ok(era_year),
            (Calendar::Roc, "roc") => Ok(era_year),
            (Calendar::Roc, "broc") => Ok(1 - era_year),
            (Calendar::Coptic, "am") => Ok(era_year),
            (Calendar::Ethiopic, "am") => Ok(era_year),
            // Amete Alem years continue through the incarnation epoch, so
            // under the Ethiopic calendar they come shifted by 5500.
            (Calendar::Ethiopic, "aa") => Ok(era_year - 5500),
            (Calendar::EthiopicAmeteAlem, "aa") => Ok(era_year),
            (Calendar::Indian, "saka") => Ok(era_year),
            (Calendar::Persian, "ap") => Ok(era_year),
            _ => Err(Error::unimplemented(self.id())),
        }
    }

    /// The era and era year displayed for the given arithmetic year.
    fn era_for_year(self, year: i32) -> (Option<&'static str>, Option<i32>) {
        match self {
            Calendar::Iso8601 => (None, None),
            Calendar::Gregorian => {
                if year >= 1 {
                    (Some("ce"), Some(year))
                } else {
                    (Some("bce"), Some(1 - year))
                }
            }
            Calendar::Buddhist => (Some("be"), Some(year)),
            Calendar::Roc => {
                if year >= 1 {
                    (Some("roc"), Some(year))
                } else {
                    (Some("broc"), Some(1 - year))
                }
            }
            Calendar::Coptic => (Some("am"), Some(year)),
            Calendar::Ethiopic => {
                if year >= 1 {
                    (Some("am"), Some(year))
                } else {
                    (Some("aa"), Some(year + 5500))
                }
            }
            Calendar::EthiopicAmeteAlem => (Some("aa"), Some(year)),
            Calendar::Indian => (Some("saka"), Some(year)),
            Calendar::Persian => (Some("ap"), Some(year)),
            // Unimplemented calendars never get here: every path to
            // `era_for_year` goes through `system()` first.
            _ => (None, None),
        }
    }

    /// Adds the calendar-unit parts of a duration to a date.
    ///
    /// Years and months move through this calendar's own month grid, with
    /// the day of month constrained (or rejected) when the target month is
    /// shorter. Weeks and days are plain epoch-day arithmetic.
    pub fn date_add(
        self,
        engine: &Engine,
        date: IsoDate,
        duration: DateDuration,
        overflow: Overflow,
    ) -> Result<IsoDate, Error> {
        let sys = self.system()?;
        let mut epoch_day = date.to_epoch_day();
        if duration.years != 0 || duration.months != 0 {
            let (year, month, day) = sys.from_epoch_day(engine, epoch_day)?;
            let miy = i64::from(sys.months_in_year());
            let months0 = i64::from(month) - 1 + duration.months;
            let year64 = i64::from(year)
                + duration.years
                + months0.div_euclid(miy);
            let month = (months0.rem_euclid(miy) + 1) as i8;
            let year = i32::try_from(year64).map_err(|_| {
                Error::range(
                    "year",
                    year64,
                    i64::from(i32::MIN),
                    i64::from(i32::MAX),
                )
            })?;
            let max_day = sys.days_in_month(engine, year, month)?;
            let day = if day > max_day {
                if overflow == Overflow::Reject {
                    return Err(Error::range("day", day, 1, max_day));
                }
                max_day
            } else {
                day
            };
            epoch_day = sys.to_epoch_day(engine, year, month, day)?;
        }
        IsoDate::from_epoch_day(epoch_day + 7 * duration.weeks + duration.days)
    }

    /// Computes the calendar-unit difference from `a` to `b`, expressed in
    /// units no bigger than `largest`.
    ///
    /// The result, added to `a` under the constrain policy, lands exactly
    /// on `b`. Negative when `b` precedes `a`.
    pub fn date_until(
        self,
        engine: &Engine,
        a: IsoDate,
        b: IsoDate,
        largest: Unit,
    ) -> Result<DateDuration, Error> {
        largest.require_date("largestUnit")?;
        let sys = self.system()?;
        let ea = a.to_epoch_day();
        let eb = b.to_epoch_day();
        match largest {
            Unit::Day => Ok(DateDuration::new(0, 0, 0, eb - ea)),
            Unit::Week => {
                let days = eb - ea;
                Ok(DateDuration::new(0, 0, days / 7, days % 7))
            }
            _ => {
                let (ya, ma, da) = sys.from_epoch_day(engine, ea)?;
                let (yb, mb, _) = sys.from_epoch_day(engine, eb)?;
                let miy = i64::from(sys.months_in_year());
                let sign = i64::from((eb - ea).signum());
                // First guess from the raw year and month fields, then walk
                // back while the candidate overshoots the target. Day
                // constraining means the guess can overshoot, never
                // undershoot.
                let mut months = (i64::from(yb) - i64::from(ya)) * miy
                    + i64::from(mb)
                    - i64::from(ma);
                let mut shifted =
                    sys.shift_months(engine, ya, ma, da, months)?;
                while sign != 0 && (shifted - eb) * sign > 0 {
                    months -= sign;
                    shifted = sys.shift_months(engine, ya, ma, da, months)?;
                }
                let days = eb - shifted;
                let (years, months) = if largest == Unit::Year {
                    (months / miy, months % miy)
                } else {
                    (0, months)
                };
                Ok(DateDuration::new(years, months, 0, days))
            }
        }
    }

    /// Resolves loose calendar fields to a concrete civil date.
    ///
    /// The year may come either directly or as an era and era year; a month
    /// may come as a number or a month code. The overflow policy governs
    /// out-of-range month and day numbers, but a month code that does not
    /// exist in this calendar is always an error.
    pub fn fields_to_date(
        self,
        engine: &Engine,
        fields: &CalendarFields,
        overflow: Overflow,
    ) -> Result<IsoDate, Error> {
        let sys = self.system()?;
        let year = match (fields.year, &fields.era, fields.era_year) {
            (Some(year), None, None) => year,
            (None, Some(era), Some(era_year)) => {
                self.arithmetic_year_for_era_year(era, era_year)?
            }
            (Some(year), Some(era), Some(era_year)) => {
                let from_era =
                    self.arithmetic_year_for_era_year(era, era_year)?;
                if from_era != year {
                    return Err(err!(
                        "year {year} disagrees with era {era:?} \
                         and era year {era_year}",
                    ));
                }
                year
            }
            _ => {
                return Err(err!(
                    "either a year, or an era and era year, is required",
                ))
            }
        };
        let miy = sys.months_in_year();
        let (month, from_code) = match (fields.month, fields.month_code) {
            (month, Some(code)) => {
                if code.is_leap() {
                    return Err(err!(
                        "calendar {id:?} has no leap months",
                        id = self.id(),
                    ));
                }
                if month.is_some_and(|m| m != code.number()) {
                    return Err(err!(
                        "month {m} disagrees with month code {code}",
                        m = month.unwrap(),
                    ));
                }
                (code.number(), true)
            }
            (Some(month), None) => (month, false),
            (None, None) => {
                return Err(err!("either a month or a month code is required"))
            }
        };
        let month = if (1..=miy).contains(&month) {
            month
        } else if from_code || overflow == Overflow::Reject {
            return Err(Error::range("month", month, 1, miy));
        } else {
            month.clamp(1, miy)
        };
        let day =
            fields.day.ok_or_else(|| err!("a day of the month is required"))?;
        let max_day = sys.days_in_month(engine, year, month)?;
        let day = if (1..=max_day).contains(&day) {
            day
        } else if overflow == Overflow::Reject {
            return Err(Error::range("day", day, 1, max_day));
        } else {
            day.clamp(1, max_day)
        };
        let epoch_day = sys.to_epoch_day(engine, year, month, day)?;
        IsoDate::from_epoch_day(epoch_day)
    }

    /// Projects a civil date into this calendar's full field view.
    pub fn date_to_fields(
        self,
        engine: &Engine,
        date: IsoDate,
    ) -> Result<CalendarDate, Error> {
        let sys = self.system()?;
        let epoch_day = date.to_epoch_day();
        let (year, month, day) = sys.from_epoch_day(engine, epoch_day)?;
        let (era, era_year) = self.era_for_year(year);
        let day_of_year =
            (epoch_day - sys.to_epoch_day(engine, year, 1, 1)? + 1) as i16;
        let week_of_year = match self {
            Calendar::Iso8601 | Calendar::Gregorian => {
                Some(date.week_of_year())
            }
            _ => None,
        };
        Ok(CalendarDate {
            era,
            era_year,
            year,
            month,
            month_code: MonthCode::new(month, false)?,
            day,
            day_of_week: date.day_of_week(),
            day_of_year,
            week_of_year,
            days_in_week: 7,
            days_in_month: sys.days_in_month(engine, year, month)?,
            days_in_year: sys.days_in_year(engine, year)?,
            months_in_year: sys.months_in_year(),
            in_leap_year: sys.is_leap_year(engine, year)?,
        })
    }
}

/// Converts an epoch day to a calendar `(year, month, day)` triple without
/// going through an engine. The Persian calendar is answered by the
/// arithmetic cycle rule; this is what the built-in oracle serves.
pub(crate) fn closed_form_ymd(
    calendar: Calendar,
    epoch_day: i64,
) -> Result<(i32, i8, i8), Error> {
    match calendar.system()? {
        System::Civil { year_offset } => {
            Ok(gregorian::from_epoch_day(year_offset, epoch_day))
        }
        System::Thirteen(params) => Ok(params.from_epoch_day(epoch_day)),
        System::Indian => Ok(indian::from_epoch_day(epoch_day)),
        System::Persian => Ok(persian::arithmetic_from_epoch_day(epoch_day)),
    }
}

/// The shared algorithm behind each implemented calendar.
#[derive(Clone, Copy, Debug)]
enum System {
    /// Proleptic Gregorian month structure with a constant year offset.
    Civil { year_offset: i32 },
    /// The 13-month Coptic/Ethiopic family.
    Thirteen(coptic::Arithmetic13),
    Indian,
    Persian,
}

impl System {
    fn months_in_year(self) -> i8 {
        match self {
            System::Thirteen(_) => 13,
            _ => 12,
        }
    }

    fn from_epoch_day(
        self,
        engine: &Engine,
        epoch_day: i64,
    ) -> Result<(i32, i8, i8), Error> {
        match self {
            System::Civil { year_offset } => {
                Ok(gregorian::from_epoch_day(year_offset, epoch_day))
            }
            System::Thirteen(params) => Ok(params.from_epoch_day(epoch_day)),
            System::Indian => Ok(indian::from_epoch_day(epoch_day)),
            System::Persian => persian::from_epoch_day(engine, epoch_day),
        }
    }

    fn to_epoch_day(
        self,
        engine: &Engine,
        year: i32,
        month: i8,
        day: i8,
    ) -> Result<i64, Error> {
        match self {
            System::Civil { year_offset } => {
                Ok(gregorian::to_epoch_day(year_offset, year, month, day))
            }
            System::Thirteen(params) => {
                Ok(params.to_epoch_day(year, month, day))
            }
            System::Indian => Ok(indian::to_epoch_day(year, month, day)),
            System::Persian => persian::to_epoch_day(engine, year, month, day),
        }
    }

    fn days_in_month(
        self,
        engine: &Engine,
        year: i32,
        month: i8,
    ) -> Result<i8, Error> {
        match self {
            System::Civil { year_offset } => {
                Ok(gregorian::days_in_month(year_offset, year, month))
            }
            System::Thirteen(params) => Ok(params.days_in_month(year, month)),
            System::Indian => Ok(indian::days_in_month(year, month)),
            System::Persian => persian::days_in_month(engine, year, month),
        }
    }

    fn days_in_year(self, engine: &Engine, year: i32) -> Result<i16, Error> {
        match self {
            System::Civil { year_offset } => {
                Ok(gregorian::days_in_year(year_offset, year))
            }
            System::Thirteen(params) => Ok(params.days_in_year(year)),
            System::Indian => Ok(indian::days_in_year(year)),
            System::Persian => persian::days_in_year(engine, year),
        }
    }

    fn is_leap_year(self, engine: &Engine, year: i32) -> Result<bool, Error> {
        match self {
            System::Civil { year_offset } => {
                Ok(gregorian::is_leap_year(year_offset, year))
            }
            System::Thirteen(params) => Ok(params.is_leap_year(year)),
            System::Indian => Ok(indian::is_leap_year(year)),
            System::Persian => persian::is_leap_year(engine, year),
        }
    }

    /// Shifts a calendar date by a number of months, constraining the day,
    /// and returns the resulting epoch day.
    fn shift_months(
        self,
        engine: &Engine,
        year: i32,
        month: i8,
        day: i8,
        delta: i64,
    ) -> Result<i64, Error> {
        let miy = i64::from(self.months_in_year());
        let months0 = i64::from(month) - 1 + delta;
        let year64 = i64::from(year) + months0.div_euclid(miy);
        let month = (months0.rem_euclid(miy) + 1) as i8;
        let year = i32::try_from(year64).map_err(|_| {
            Error::range(
                "year",
                year64,
                i64::from(i32::MIN),
                i64::from(i32::MAX),
            )
        })?;
        let day = day.min(self.days_in_month(engine, year, month)?);
        self.to_epoch_day(engine, year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: i8, d: i8) -> IsoDate {
        IsoDate::new(y, m, d).unwrap()
    }

    #[test]
    fn identifier_round_trip() {
        for calendar in Calendar::ALL {
            assert_eq!(calendar, Calendar::from_id(calendar.id()).unwrap());
        }
        assert_eq!(
            Calendar::Gregorian,
            Calendar::from_id("GREGORY").unwrap(),
        );
        assert_eq!(
            Calendar::EthiopicAmeteAlem,
            Calendar::from_id("ethiopic-amete-alem").unwrap(),
        );
        assert!(Calendar::from_id("julian").unwrap_err().is_invalid());
    }

    #[test]
    fn unimplemented_calendars_fail_distinctly() {
        let engine = Engine::new();
        for calendar in [
            Calendar::Japanese,
            Calendar::Hebrew,
            Calendar::Chinese,
            Calendar::Dangi,
            Calendar::IslamicCivil,
            Calendar::IslamicTbla,
            Calendar::IslamicUmalqura,
        ] {
            assert!(!calendar.is_implemented());
            let err = calendar
                .date_to_fields(&engine, date(2024, 1, 1))
                .unwrap_err();
            assert!(err.is_unimplemented(), "{calendar:?}: {err}");
            assert!(!err.is_invalid());
        }
        assert!(Calendar::Persian.is_implemented());
    }

    #[test]
    fn gregorian_eras() {
        let c = Calendar::Gregorian;
        assert_eq!("ce", c.canonicalize_era("AD").unwrap());
        assert_eq!("bce", c.canonicalize_era("bc").unwrap());
        assert_eq!(2024, c.arithmetic_year_for_era_year("ce", 2024).unwrap());
        assert_eq!(0, c.arithmetic_year_for_era_year("bce", 1).unwrap());
        assert_eq!(-1, c.arithmetic_year_for_era_year("bce", 2).unwrap());
        assert!(c.canonicalize_era("saka").unwrap_err().is_invalid());
        assert!(!Calendar::Iso8601.supports_era());
        assert!(Calendar::Iso8601.canonicalize_era("ce").is_err());
    }

    #[test]
    fn offset_calendar_eras() {
        let engine = Engine::new();
        let fields = Calendar::Buddhist
            .date_to_fields(&engine, date(2024, 1, 1))
            .unwrap();
        assert_eq!((Some("be"), Some(2567)), (fields.era, fields.era_year));
        assert_eq!(2567, fields.year);

        let fields =
            Calendar::Roc.date_to_fields(&engine, date(2024, 1, 1)).unwrap();
        assert_eq!((Some("roc"), Some(113)), (fields.era, fields.era_year));

        let fields =
            Calendar::Roc.date_to_fields(&engine, date(1911, 6, 1)).unwrap();
        assert_eq!((Some("broc"), Some(1)), (fields.era, fields.era_year));

        assert_eq!(
            1911,
            Calendar::Roc
                .arithmetic_year_for_era_year("roc", 1911)
                .unwrap()
                + 1911,
        );
        assert_eq!(
            0,
            Calendar::Roc.arithmetic_year_for_era_year("broc", 1).unwrap(),
        );
    }

    #[test]
    fn ethiopic_eras() {
        assert_eq!(
            1,
            Calendar::Ethiopic
                .arithmetic_year_for_era_year("aa", 5501)
                .unwrap(),
        );
        assert_eq!(
            2016,
            Calendar::Ethiopic
                .arithmetic_year_for_era_year("am", 2016)
                .unwrap(),
        );
        let engine = Engine::new();
        let fields = Calendar::EthiopicAmeteAlem
            .date_to_fields(&engine, date(2024, 1, 1))
            .unwrap();
        assert_eq!(Some("aa"), fields.era);
        assert_eq!(13, fields.months_in_year);
    }

    #[test]
    fn date_add_constrains_or_rejects() {
        let engine = Engine::new();
        let c = Calendar::Iso8601;
        let jan31 = date(2024, 1, 31);
        let added = c
            .date_add(
                &engine,
                jan31,
                DateDuration::new(0, 1, 0, 0),
                Overflow::Constrain,
            )
            .unwrap();
        assert_eq!(date(2024, 2, 29), added);
        let err = c
            .date_add(
                &engine,
                jan31,
                DateDuration::new(0, 1, 0, 0),
                Overflow::Reject,
            )
            .unwrap_err();
        assert!(err.is_range());

        // Weeks and days are plain epoch-day arithmetic.
        let added = c
            .date_add(
                &engine,
                date(2024, 2, 28),
                DateDuration::new(0, 0, 1, -6),
                Overflow::Reject,
            )
            .unwrap();
        assert_eq!(date(2024, 2, 29), added);

        // Negative years across the leap day.
        let added = c
            .date_add(
                &engine,
                date(2024, 2, 29),
                DateDuration::new(-1, 0, 0, 0),
                Overflow::Constrain,
            )
            .unwrap();
        assert_eq!(date(2023, 2, 28), added);
    }

    #[test]
    fn date_until_months_and_years() {
        let engine = Engine::new();
        let c = Calendar::Iso8601;
        let until = |a, b, largest| c.date_until(&engine, a, b, largest);

        let d = until(date(2024, 1, 31), date(2024, 3, 1), Unit::Month)
            .unwrap();
        assert_eq!(DateDuration::new(0, 1, 0, 1), d);

        let d = until(date(2024, 1, 31), date(2024, 2, 29), Unit::Month)
            .unwrap();
        assert_eq!(DateDuration::new(0, 1, 0, 0), d);

        let d = until(date(2022, 5, 15), date(2024, 3, 14), Unit::Year)
            .unwrap();
        assert_eq!(DateDuration::new(1, 9, 0, 28), d);

        // Reversed arguments negate the calendar part consistently.
        let d = until(date(2024, 3, 1), date(2024, 1, 31), Unit::Month)
            .unwrap();
        assert_eq!(DateDuration::new(0, -1, 0, -1), d);

        let d = until(date(2024, 1, 1), date(2024, 1, 31), Unit::Week)
            .unwrap();
        assert_eq!(DateDuration::new(0, 0, 4, 2), d);

        let d = until(date(2024, 1, 1), date(2023, 12, 25), Unit::Day)
            .unwrap();
        assert_eq!(DateDuration::new(0, 0, 0, -7), d);

        let err = until(date(2024, 1, 1), date(2024, 2, 1), Unit::Hour)
            .unwrap_err();
        assert!(err.is_invalid());
    }

    #[test]
    fn date_until_thirteen_month_grid() {
        let engine = Engine::new();
        let c = Calendar::Coptic;
        let a = c
            .fields_to_date(
                &engine,
                &CalendarFields {
                    year: Some(1739),
                    month: Some(13),
                    day: Some(2),
                    ..CalendarFields::default()
                },
                Overflow::Reject,
            )
            .unwrap();
        let b = c
            .fields_to_date(
                &engine,
                &CalendarFields {
                    year: Some(1740),
                    month: Some(1),
                    day: Some(2),
                    ..CalendarFields::default()
                },
                Overflow::Reject,
            )
            .unwrap();
        // One Coptic month from epagomenae to Thout, not a year fraction.
        let d = c.date_until(&engine, a, b, Unit::Year).unwrap();
        assert_eq!(DateDuration::new(0, 1, 0, 0), d);

        let d = c
            .date_until(&engine, a, b, Unit::Month)
            .unwrap();
        assert_eq!(DateDuration::new(0, 1, 0, 0), d);
    }

    #[test]
    fn fields_resolution() {
        let engine = Engine::new();
        let c = Calendar::Gregorian;
        let fields = CalendarFields {
            era: Some("bce".to_string()),
            era_year: Some(1),
            month_code: Some(MonthCode::parse("M02").unwrap()),
            day: Some(29),
            ..CalendarFields::default()
        };
        // Year 0 is a leap year.
        let d = c.fields_to_date(&engine, &fields, Overflow::Reject).unwrap();
        assert_eq!(date(0, 2, 29), d);

        // Day constrained into the month.
        let fields = CalendarFields {
            year: Some(2025),
            month: Some(2),
            day: Some(31),
            ..CalendarFields::default()
        };
        let d =
            c.fields_to_date(&engine, &fields, Overflow::Constrain).unwrap();
        assert_eq!(date(2025, 2, 28), d);
        assert!(c
            .fields_to_date(&engine, &fields, Overflow::Reject)
            .unwrap_err()
            .is_range());

        // A month code that does not exist in the calendar is always an
        // error, even under constrain.
        let fields = CalendarFields {
            year: Some(2025),
            month_code: Some(MonthCode::parse("M13").unwrap()),
            day: Some(1),
            ..CalendarFields::default()
        };
        assert!(c
            .fields_to_date(&engine, &fields, Overflow::Constrain)
            .is_err());

        // Conflicting month and month code.
        let fields = CalendarFields {
            year: Some(2025),
            month: Some(3),
            month_code: Some(MonthCode::parse("M04").unwrap()),
            day: Some(1),
            ..CalendarFields::default()
        };
        let err = c
            .fields_to_date(&engine, &fields, Overflow::Reject)
            .unwrap_err();
        assert!(err.is_invalid());

        // Missing year entirely.
        let fields = CalendarFields {
            month: Some(3),
            day: Some(1),
            ..CalendarFields::default()
        };
        assert!(c.fields_to_date(&engine, &fields, Overflow::Reject).is_err());
    }

    #[test]
    fn month_codes() {
        let code = MonthCode::parse("M05").unwrap();
        assert_eq!((5, false), (code.number(), code.is_leap()));
        assert_eq!("M05", code.to_string());

        let code = MonthCode::parse("M12L").unwrap();
        assert_eq!((12, true), (code.number(), code.is_leap()));
        assert_eq!("M12L", code.to_string());

        assert!(MonthCode::parse("M00").is_err());
        assert!(MonthCode::parse("M14").is_err());
        assert!(MonthCode::parse("5").is_err());
        assert!(MonthCode::parse("M5").is_err());
    }

    #[test]
    fn week_of_year_is_iso_only() {
        let engine = Engine::new();
        let d = date(2026, 12, 28);
        let fields =
            Calendar::Iso8601.date_to_fields(&engine, d).unwrap();
        assert_eq!(Some((2026, 53)), fields.week_of_year);
        let fields =
            Calendar::Gregorian.date_to_fields(&engine, d).unwrap();
        assert_eq!(Some((2026, 53)), fields.week_of_year);
        let fields = Calendar::Coptic.date_to_fields(&engine, d).unwrap();
        assert_eq!(None, fields.week_of_year);
    }

    #[test]
    fn coptic_field_view() {
        let engine = Engine::new();
        // 2023-09-12 was Coptic new year 1740.
        let fields = Calendar::Coptic
            .date_to_fields(&engine, date(2023, 9, 12))
            .unwrap();
        assert_eq!(1740, fields.year);
        assert_eq!(1, fields.month);
        assert_eq!(1, fields.day);
        assert_eq!(1, fields.day_of_year);
        assert_eq!("M01", fields.month_code.to_string());
        assert_eq!(13, fields.months_in_year);
        assert_eq!(365, fields.days_in_year);
        assert!(!fields.in_leap_year);
    }

    #[test]
    fn persian_field_view() {
        let engine = Engine::new();
        // Nowruz 1403 on 2024-03-20.
        let fields = Calendar::Persian
            .date_to_fields(&engine, date(2024, 3, 20))
            .unwrap();
        assert_eq!((Some("ap"), Some(1403)), (fields.era, fields.era_year));
        assert_eq!((1403, 1, 1), (fields.year, fields.month, fields.day));
        assert!(fields.in_leap_year);
        assert_eq!(366, fields.days_in_year);
    }

    #[test]
    fn indian_field_view() {
        let engine = Engine::new();
        let fields = Calendar::Indian
            .date_to_fields(&engine, date(2024, 1, 1))
            .unwrap();
        assert_eq!((Some("saka"), Some(1945)), (fields.era, fields.era_year));
        assert_eq!((1945, 10, 11), (fields.year, fields.month, fields.day));
        assert!(!fields.in_leap_year);
    }
}
