/*!
The built-in zone table and the civil oracle backed by it.

The table maps a small set of IANA identifiers to POSIX rule strings
describing each zone's current standard/daylight regime. The rules are
proleptic: they describe today's regime at all points in time, so
historical transitions before a zone's modern rules differ from the real
tzdata record. An oracle backed by a full copy of the IANA database can
replace [`BuiltinOracle`] through [`Engine::with_oracle`].

[`Engine::with_oracle`]: crate::tz::Engine::with_oracle
*/

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    cal::{self, Calendar},
    civil::IsoDate,
    epoch::EpochInstant,
    error::{err, Error},
    tz::{posix::PosixZone, CivilFields, CivilOracle},
    util::math::SECONDS_PER_DAY,
};

/// Identifier to POSIX rule string. `None` marks the UTC zones.
const ZONES: &[(&str, Option<&str>)] = &[
    ("UTC", None),
    ("Etc/UTC", None),
    ("Europe/London", Some("GMT0BST,M3.5.0/1,M10.5.0")),
    ("Europe/Paris", Some("CET-1CEST,M3.5.0,M10.5.0/3")),
    ("Europe/Berlin", Some("CET-1CEST,M3.5.0,M10.5.0/3")),
    ("America/New_York", Some("EST5EDT,M3.2.0,M11.1.0")),
    ("America/Chicago", Some("CST6CDT,M3.2.0,M11.1.0")),
    ("America/Denver", Some("MST7MDT,M3.2.0,M11.1.0")),
    ("America/Los_Angeles", Some("PST8PDT,M3.2.0,M11.1.0")),
    ("America/Phoenix", Some("MST7")),
    ("America/Sao_Paulo", Some("<-03>3")),
    ("Asia/Tokyo", Some("JST-9")),
    ("Asia/Kolkata", Some("IST-5:30")),
    ("Asia/Tehran", Some("<+0330>-3:30")),
    ("Australia/Sydney", Some("AEST-10AEDT,M10.1.0,M4.1.0/3")),
    ("Pacific/Auckland", Some("NZST-12NZDT,M9.5.0,M4.1.0/3")),
];

/// A resolved zone.
#[derive(Clone, Debug)]
pub(crate) enum Zone {
    Utc,
    Posix(PosixZone),
}

impl Zone {
    pub(crate) fn offset_seconds(&self, utc_seconds: i64) -> i32 {
        match *self {
            Zone::Utc => 0,
            Zone::Posix(ref zone) => zone.offset_seconds(utc_seconds),
        }
    }
}

/// A cache of parsed zones, keyed by identifier.
///
/// The key space (IANA identifiers) is small and finite, so this cache is
/// unbounded and lives as long as its owner.
#[derive(Debug, Default)]
pub(crate) struct ZoneTable {
    cache: Mutex<HashMap<String, Zone>>,
}

impl ZoneTable {
    pub(crate) fn new() -> ZoneTable {
        ZoneTable::default()
    }

    /// Resolves an IANA identifier to a zone, parsing and caching its rule
    /// string on first use. Unknown identifiers are validation failures.
    pub(crate) fn resolve(&self, id: &str) -> Result<Zone, Error> {
        let mut cache = self.cache.lock().unwrap();
        if let Some(zone) = cache.get(id) {
            return Ok(zone.clone());
        }
        let rule = ZONES
            .iter()
            .find(|&&(name, _)| name == id)
            .map(|&(_, rule)| rule)
            .ok_or_else(|| err!("unrecognized time zone identifier {id:?}"))?;
        let zone = match rule {
            None => Zone::Utc,
            Some(rule) => Zone::Posix(PosixZone::parse(rule)?),
        };
        cache.insert(id.to_string(), zone.clone());
        Ok(zone)
    }
}

/// The default civil oracle: the built-in zone table for offsets, and
/// closed-form calendar arithmetic for the field conversion.
#[derive(Debug, Default)]
pub struct BuiltinOracle {
    zones: ZoneTable,
}

impl BuiltinOracle {
    pub fn new() -> BuiltinOracle {
        BuiltinOracle::default()
    }
}

impl CivilOracle for BuiltinOracle {
    fn civil_datetime(
        &self,
        calendar: &str,
        time_zone: &str,
        instant: EpochInstant,
    ) -> Result<CivilFields, Error> {
        let calendar = Calendar::from_id(calendar)?;
        let zone = self.zones.resolve(time_zone)?;
        let utc_seconds = instant.to_seconds_floor();
        let local_seconds =
            utc_seconds + i64::from(zone.offset_seconds(utc_seconds));
        let epoch_day = local_seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = local_seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = cal::closed_form_ymd(calendar, epoch_day)?;
        Ok(CivilFields {
            year,
            month,
            day,
            hour: (second_of_day / 3600) as i8,
            minute: (second_of_day / 60 % 60) as i8,
            second: (second_of_day % 60) as i8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(y: i32, m: i8, d: i8, hour: i8, minute: i8) -> EpochInstant {
        let date = IsoDate::new(y, m, d).unwrap();
        let time =
            crate::civil::IsoTime::new(hour, minute, 0, 0, 0, 0).unwrap();
        EpochInstant::from_date_time(date, time)
    }

    #[test]
    fn resolves_and_caches() {
        let table = ZoneTable::new();
        assert!(matches!(table.resolve("UTC").unwrap(), Zone::Utc));
        assert!(matches!(
            table.resolve("Europe/London").unwrap(),
            Zone::Posix(_),
        ));
        let err = table.resolve("Mars/Olympus_Mons").unwrap_err();
        assert!(err.is_invalid());
        // Second resolution is served from the cache.
        assert!(table.resolve("Europe/London").is_ok());
        assert_eq!(2, table.cache.lock().unwrap().len());
    }

    #[test]
    fn civil_fields_in_zone() {
        let oracle = BuiltinOracle::new();
        // 2025-01-15T05:30Z is 11:00 in Kolkata.
        let fields = oracle
            .civil_datetime("iso8601", "Asia/Kolkata", instant(2025, 1, 15, 5, 30))
            .unwrap();
        assert_eq!(
            (2025, 1, 15, 11, 0),
            (fields.year, fields.month, fields.day, fields.hour, fields.minute),
        );
        // And 00:30 that morning in New York.
        let fields = oracle
            .civil_datetime(
                "iso8601",
                "America/New_York",
                instant(2025, 1, 15, 5, 30),
            )
            .unwrap();
        assert_eq!((2025, 1, 15, 0, 30), (
            fields.year,
            fields.month,
            fields.day,
            fields.hour,
            fields.minute,
        ));
    }

    #[test]
    fn persian_fields() {
        let oracle = BuiltinOracle::new();
        // 2024-04-01 is Farvardin 13, 1403.
        let fields = oracle
            .civil_datetime("persian", "UTC", instant(2024, 4, 1, 0, 0))
            .unwrap();
        assert_eq!(
            (1403, 1, 13),
            (fields.year, fields.month, fields.day),
        );
    }

    #[test]
    fn pre_epoch_fields() {
        let oracle = BuiltinOracle::new();
        let fields = oracle
            .civil_datetime("iso8601", "UTC", instant(1969, 12, 31, 23, 59))
            .unwrap();
        assert_eq!(
            (1969, 12, 31, 23, 59),
            (fields.year, fields.month, fields.day, fields.hour, fields.minute),
        );
    }
}
