/*!
A calendrical and temporal arithmetic engine.

This crate provides the value types and algorithms underneath a date-time
library: epoch instants with nanosecond precision, exact and mixed
calendar/time durations, a family of rounding modes, human calendar
systems, an ISO 8601 / RFC 9557 string parser and a time zone engine that
resolves offsets and locates transitions.

It is deliberately a middle layer. There are no `Zoned` or `DateTime`
convenience types here; instead there are the pieces such types are built
from, exposed with explicit signatures and explicit error handling.

# Examples

Parse an exact timestamp string:

```
use tempo::fmt;

let parsed = fmt::parse_instant("2024-06-01T12:30:45.5Z")?;
assert!(parsed.is_utc);
let date = parsed.date.unwrap();
assert_eq!((Some(2024), 6, 1), (date.year, date.month, date.day));
# Ok::<(), tempo::Error>(())
```

Resolve a time zone offset:

```
use tempo::{civil::{IsoDate, IsoTime}, tz::Engine, EpochInstant};

let engine = Engine::new();
let instant = EpochInstant::from_date_time(
    IsoDate::new(2025, 1, 15)?,
    IsoTime::midnight(),
);
let offset = engine.offset_nanoseconds("America/New_York", instant)?;
assert_eq!(-5 * 3_600_000_000_000, offset);
# Ok::<(), tempo::Error>(())
```

Round an exact duration to a minute increment:

```
use tempo::{RoundMode, TimeDuration};

let duration = TimeDuration::from_seconds(95);
let rounded =
    duration.round_to_increment(60_000_000_000, RoundMode::HalfExpand);
assert_eq!(120, rounded.to_nanoseconds() / 1_000_000_000);
```

Look up a calendar by identifier:

```
use tempo::cal::Calendar;

let cal = Calendar::from_id("ethiopic-amete-alem")?;
assert_eq!("ethioaa", cal.id());
# Ok::<(), tempo::Error>(())
```

# Crate features

* **std** (enabled by default) -
  Currently required. The feature exists so that a future `alloc`-only
  configuration has a name.
* **logging** -
  Emits messages to the [`log`](https://docs.rs/log) crate, mostly from
  the time zone transition search. Disabled by default.
* **serde** -
  Implements `Serialize` and `Deserialize` for the plain value records
  such as [`EpochInstant`] and [`Duration`]. Disabled by default.
*/

#[macro_use]
mod logging;

pub mod cal;
pub mod civil;
mod duration;
mod epoch;
mod error;
pub mod fmt;
mod round;
pub mod tz;
mod unit;
mod util;

pub use crate::{
    duration::{DateDuration, Duration, TimeDuration},
    epoch::{EpochInstant, MAX_EPOCH_DAY, MIN_EPOCH_DAY},
    error::Error,
    round::{check_increment, RoundMode},
    unit::{check_unit_pair, Unit},
};
