use tempo::{
    cal::Calendar,
    civil::{IsoDate, IsoTime},
    fmt::{self, Clock},
    tz::Engine,
    EpochInstant,
};

type Result<T = ()> = std::result::Result<T, tempo::Error>;

fn to_instant(parsed: &fmt::ParsedTemporal) -> EpochInstant {
    let date = parsed.date.unwrap();
    let time = match parsed.clock {
        Clock::Time(time) => time,
        Clock::StartOfDay => IsoTime::midnight(),
    };
    EpochInstant::from_date_time(
        IsoDate::new(date.year.unwrap(), date.month, date.day).unwrap(),
        time,
    )
}

#[test]
fn instant_to_epoch() -> Result<()> {
    let parsed = fmt::parse_instant("2024-01-01T00:00:00Z")?;
    assert!(parsed.is_utc);
    let instant = to_instant(&parsed);
    assert_eq!((19_723, 0), (instant.days(), instant.time_ns()));
    Ok(())
}

#[test]
fn zoned_string_agrees_with_engine() -> Result<()> {
    let parsed =
        fmt::parse_zoned_date_time("2025-01-15T12:00-05:00[America/New_York]")?;
    let offset = parsed.offset.clone().unwrap();
    let tz = parsed.tz_annotation.clone().unwrap();
    // Local wall time minus the stated offset is the absolute instant.
    let utc = to_instant(&parsed)
        .checked_add(tempo::TimeDuration::from_nanoseconds(
            -i128::from(offset.nanoseconds),
        ))?;
    let engine = Engine::new();
    let resolved = engine.offset_nanoseconds(&tz.id, utc)?;
    assert_eq!(i128::from(offset.nanoseconds), resolved);
    Ok(())
}

#[test]
fn calendar_annotation_resolves() -> Result<()> {
    let parsed = fmt::parse_date_time("2024-05-15[u-ca=roc]")?;
    let calendar = Calendar::from_id(parsed.calendar.as_deref().unwrap())?;
    assert_eq!(Calendar::Roc, calendar);
    Ok(())
}

#[test]
fn month_day_priority() -> Result<()> {
    // A full date parses as a date, not as a month-day with junk.
    let full = fmt::parse_month_day("2024-10-01")?;
    assert_eq!(Some(2024), full.date.unwrap().year);
    let bare = fmt::parse_month_day("10-01")?;
    assert_eq!(None, bare.date.unwrap().year);
    assert_eq!((10, 1), (bare.date.unwrap().month, bare.date.unwrap().day));
    Ok(())
}

#[test]
fn sub_minute_offset_text_is_preserved() -> Result<()> {
    let parsed = fmt::parse_instant("1900-01-01T00:00:00+00:19:32.13")?;
    let offset = parsed.offset.unwrap();
    assert_eq!("+00:19:32.13", offset.text);
    assert_eq!(
        (19 * 60 + 32) * 1_000_000_000 + 130_000_000,
        offset.nanoseconds,
    );
    Ok(())
}
