use anyhow::Result;

use tempo::{
    civil::{IsoDate, IsoTime},
    tz::{Direction, Engine},
    EpochInstant,
};

const HOUR: i128 = 3_600_000_000_000;

fn instant(
    year: i32,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
) -> EpochInstant {
    let date = IsoDate::new(year, month, day).unwrap();
    let time = IsoTime::new(hour, minute, second, 0, 0, 0).unwrap();
    EpochInstant::from_date_time(date, time)
}

#[test]
fn new_york_offsets() -> Result<()> {
    crate::init_logger();
    let engine = Engine::new();
    let winter = engine
        .offset_nanoseconds("America/New_York", instant(2025, 1, 15, 12, 0, 0))?;
    assert_eq!(-5 * HOUR, winter);
    let summer = engine
        .offset_nanoseconds("America/New_York", instant(2025, 7, 1, 12, 0, 0))?;
    assert_eq!(-4 * HOUR, summer);
    Ok(())
}

#[test]
fn spring_forward_boundary() -> Result<()> {
    crate::init_logger();
    let engine = Engine::new();
    // DST starts 2025-03-09 at 02:00 local, i.e. 07:00 UTC.
    let before = instant(2025, 3, 9, 6, 59, 59);
    let after = instant(2025, 3, 9, 7, 0, 0);
    assert_eq!(
        -5 * HOUR,
        engine.offset_nanoseconds("America/New_York", before)?,
    );
    assert_eq!(
        -4 * HOUR,
        engine.offset_nanoseconds("America/New_York", after)?,
    );
    Ok(())
}

#[test]
fn transitions_around_winter() -> Result<()> {
    crate::init_logger();
    let engine = Engine::new();
    let probe = instant(2025, 1, 15, 0, 0, 0);
    let next = engine
        .time_zone_transition("America/New_York", probe, Direction::Next)?
        .unwrap();
    assert_eq!(instant(2025, 3, 9, 7, 0, 0), next);
    let previous = engine
        .time_zone_transition("America/New_York", probe, Direction::Previous)?
        .unwrap();
    // DST ended on the first Sunday of November, 02:00 daylight local.
    assert_eq!(instant(2024, 11, 3, 6, 0, 0), previous);
    Ok(())
}

#[test]
fn southern_hemisphere() -> Result<()> {
    crate::init_logger();
    let engine = Engine::new();
    // Sydney observes daylight time across the new year.
    let january = engine
        .offset_nanoseconds("Australia/Sydney", instant(2025, 1, 15, 0, 0, 0))?;
    assert_eq!(11 * HOUR, january);
    let june = engine
        .offset_nanoseconds("Australia/Sydney", instant(2025, 6, 15, 0, 0, 0))?;
    assert_eq!(10 * HOUR, june);
    Ok(())
}

#[test]
fn fixed_offset_zones() -> Result<()> {
    crate::init_logger();
    let engine = Engine::new();
    let probe = instant(2025, 1, 15, 0, 0, 0);
    assert_eq!(9 * HOUR, engine.offset_nanoseconds("Asia/Tokyo", probe)?);
    assert_eq!(
        3 * HOUR + HOUR / 2,
        engine.offset_nanoseconds("Asia/Tehran", probe)?,
    );
    // No rules, no transitions.
    assert_eq!(
        None,
        engine.time_zone_transition("Asia/Tokyo", probe, Direction::Next)?,
    );
    assert_eq!(
        None,
        engine.time_zone_transition("UTC", probe, Direction::Previous)?,
    );
    Ok(())
}

#[test]
fn unknown_zone_is_invalid() {
    let engine = Engine::new();
    let err = engine
        .offset_nanoseconds("Mars/Olympus_Mons", instant(2025, 1, 1, 0, 0, 0))
        .unwrap_err();
    assert!(err.is_invalid());
}
