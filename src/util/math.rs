/*!
Numeric primitives shared across the crate.

All of the "calendar math" in this crate is done with floored division and
modulus (`div_euclid`/`rem_euclid` with positive divisors), so that negative
inputs behave sensibly. The helpers here mostly exist to keep the pairing of
quotient and remainder in one place.
*/

pub(crate) const NANOS_PER_MICRO: i64 = 1_000;
pub(crate) const NANOS_PER_MILLI: i64 = 1_000_000;
pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub(crate) const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub(crate) const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// The maximum integer exactly representable in an IEEE 754 double.
///
/// Durations bound their total time portion by this many seconds so that
/// values survive a round trip through hosts that only have doubles.
pub(crate) const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Returns the floored quotient and remainder in one go.
///
/// The remainder is always in `[0, rhs)` for a positive `rhs`.
#[inline]
pub(crate) fn divmod_floor(lhs: i64, rhs: i64) -> (i64, i64) {
    (lhs.div_euclid(rhs), lhs.rem_euclid(rhs))
}

/// Splits a signed total nanosecond count into whole days and a non-negative
/// sub-day remainder.
///
/// The day component is guaranteed to fit in an `i64` for every total that
/// callers validate against the supported instant range (±10^8 days).
#[inline]
pub(crate) fn split_days_nanos(total: i128) -> (i64, i64) {
    let days = total.div_euclid(i128::from(NANOS_PER_DAY));
    let nanos = total.rem_euclid(i128::from(NANOS_PER_DAY));
    debug_assert!(i64::try_from(days).is_ok(), "day count overflows i64");
    (days as i64, nanos as i64)
}

/// Writes the absolute value of `value` into `dst` in decimal, left padded
/// with zeros to at least `width` digits.
///
/// This is the digit-slicing primitive behind exact decimal rendering of
/// sub-second quantities: composing the digits directly side-steps any
/// floating point division.
pub(crate) fn push_padded(dst: &mut String, value: i64, width: usize) {
    let digits = value.unsigned_abs().to_string();
    for _ in digits.len()..width {
        dst.push('0');
    }
    dst.push_str(&digits);
}
