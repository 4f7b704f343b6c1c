use tempo::{
    cal::{Calendar, CalendarFields, Overflow},
    civil::IsoDate,
    tz::Engine,
    DateDuration, Unit,
};

type Result<T = ()> = std::result::Result<T, tempo::Error>;

fn date(year: i32, month: i8, day: i8) -> IsoDate {
    IsoDate::new(year, month, day).unwrap()
}

#[test]
fn identifiers_round_trip() -> Result<()> {
    for id in [
        "iso8601",
        "gregory",
        "buddhist",
        "roc",
        "coptic",
        "ethiopic",
        "ethioaa",
        "indian",
        "persian",
        "japanese",
        "hebrew",
        "chinese",
        "dangi",
        "islamic-civil",
        "islamic-tbla",
        "islamic-umalqura",
    ] {
        assert_eq!(id, Calendar::from_id(id)?.id());
    }
    // The long-form alias maps onto the short canonical identifier.
    assert_eq!("ethioaa", Calendar::from_id("ethiopic-amete-alem")?.id());
    assert_eq!("gregory", Calendar::from_id("GREGORY")?.id());
    assert!(Calendar::from_id("julian").is_err());
    Ok(())
}

#[test]
fn gregorian_eras() -> Result<()> {
    let engine = Engine::new();
    let fields = Calendar::Gregorian.date_to_fields(&engine, date(2024, 5, 15))?;
    assert_eq!((Some("ce"), Some(2024)), (fields.era, fields.era_year));
    // Arithmetic year 0 is 1 BCE.
    let fields = Calendar::Gregorian.date_to_fields(&engine, date(0, 1, 1))?;
    assert_eq!((Some("bce"), Some(1)), (fields.era, fields.era_year));
    Ok(())
}

#[test]
fn coptic_projection() -> Result<()> {
    let engine = Engine::new();
    // Coptic new year 1740 fell on 2023-09-12.
    let fields = Calendar::Coptic.date_to_fields(&engine, date(2023, 9, 12))?;
    assert_eq!((1740, 1, 1), (fields.year, fields.month, fields.day));
    assert_eq!(13, fields.months_in_year);
    assert_eq!(None, fields.week_of_year);
    Ok(())
}

#[test]
fn indian_projection() -> Result<()> {
    let engine = Engine::new();
    let fields = Calendar::Indian.date_to_fields(&engine, date(2024, 1, 1))?;
    assert_eq!((1945, 10, 11), (fields.year, fields.month, fields.day));
    assert_eq!(Some("saka"), fields.era);
    Ok(())
}

#[test]
fn persian_projection() -> Result<()> {
    let engine = Engine::new();
    // Nowruz 1403 fell on 2024-03-20.
    let fields = Calendar::Persian.date_to_fields(&engine, date(2024, 3, 20))?;
    assert_eq!((1403, 1, 1), (fields.year, fields.month, fields.day));
    // 1403 is one of the eight leap years of the 33 year cycle.
    assert!(fields.in_leap_year);
    Ok(())
}

#[test]
fn add_constrains_short_months() -> Result<()> {
    let engine = Engine::new();
    let one_month = DateDuration::new(0, 1, 0, 0);
    let added = Calendar::Iso8601.date_add(
        &engine,
        date(2024, 1, 31),
        one_month,
        Overflow::Constrain,
    )?;
    assert_eq!(date(2024, 2, 29), added);
    let err = Calendar::Iso8601
        .date_add(&engine, date(2024, 1, 31), one_month, Overflow::Reject)
        .unwrap_err();
    assert!(err.is_range());
    Ok(())
}

#[test]
fn until_round_trips_through_add() -> Result<()> {
    let engine = Engine::new();
    let a = date(2022, 5, 15);
    let b = date(2024, 3, 14);
    let diff = Calendar::Iso8601.date_until(&engine, a, b, Unit::Year)?;
    assert_eq!(
        (1, 9, 0, 28),
        (diff.years, diff.months, diff.weeks, diff.days),
    );
    let landed =
        Calendar::Iso8601.date_add(&engine, a, diff, Overflow::Constrain)?;
    assert_eq!(b, landed);

    // The reverse difference also lands exactly.
    let back = Calendar::Iso8601.date_until(&engine, b, a, Unit::Year)?;
    let landed =
        Calendar::Iso8601.date_add(&engine, b, back, Overflow::Constrain)?;
    assert_eq!(a, landed);
    Ok(())
}

#[test]
fn until_in_a_thirteen_month_calendar() -> Result<()> {
    let engine = Engine::new();
    // One Coptic year spans thirteen months.
    let a = date(2023, 9, 12);
    let added = Calendar::Coptic.date_add(
        &engine,
        a,
        DateDuration::new(0, 13, 0, 0),
        Overflow::Constrain,
    )?;
    let diff = Calendar::Coptic.date_until(&engine, a, added, Unit::Year)?;
    assert_eq!((1, 0, 0), (diff.years, diff.months, diff.days));
    Ok(())
}

#[test]
fn era_fields_resolve() -> Result<()> {
    let engine = Engine::new();
    let fields = CalendarFields {
        era: Some("minguo".to_string()),
        era_year: Some(113),
        month: Some(5),
        day: Some(15),
        ..CalendarFields::default()
    };
    let resolved =
        Calendar::Roc.fields_to_date(&engine, &fields, Overflow::Reject)?;
    assert_eq!(date(2024, 5, 15), resolved);
    Ok(())
}

#[test]
fn overflow_policy_on_fields() -> Result<()> {
    let engine = Engine::new();
    let fields = CalendarFields {
        year: Some(2024),
        month: Some(14),
        day: Some(40),
        ..CalendarFields::default()
    };
    let constrained = Calendar::Iso8601.fields_to_date(
        &engine,
        &fields,
        Overflow::Constrain,
    )?;
    assert_eq!(date(2024, 12, 31), constrained);
    assert!(Calendar::Iso8601
        .fields_to_date(&engine, &fields, Overflow::Reject)
        .is_err());
    Ok(())
}

#[test]
fn unimplemented_calendars_are_recognized() {
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
        let err =
            calendar.date_to_fields(&engine, date(2024, 1, 1)).unwrap_err();
        assert!(err.is_unimplemented(), "{}", calendar.id());
    }
}
