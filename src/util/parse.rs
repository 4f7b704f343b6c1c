/*!
Low level byte-slice parsing helpers used by the ISO 8601 parser.

Parsing routines in this crate thread a `Parsed { value, input }` pair
through each grammar fragment: `value` is what the fragment produced and
`input` is the unconsumed tail. A fragment that matches nothing returns its
input untouched.
*/

use crate::error::{err, Error};

/// The result of parsing one grammar fragment.
#[derive(Debug)]
pub(crate) struct Parsed<'i, T> {
    /// The value produced by the fragment.
    pub(crate) value: T,
    /// The remaining unconsumed input.
    pub(crate) input: &'i [u8],
}

/// Returns a closure that, given the unconsumed tail of `whole`, returns the
/// consumed prefix.
///
/// This is handy for attaching the matched substring to a parsed value
/// without tracking offsets by hand.
pub(crate) fn slicer<'i>(
    whole: &'i [u8],
) -> impl Fn(&'i [u8]) -> &'i [u8] + 'i {
    let start = whole.as_ptr() as usize;
    move |tail| {
        let end = tail.as_ptr() as usize;
        &whole[..end - start]
    }
}

/// Splits the longest prefix of ASCII digits off of `input`.
pub(crate) fn digits(input: &[u8]) -> (&[u8], &[u8]) {
    let end = input
        .iter()
        .position(|&b| !b.is_ascii_digit())
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Parses a non-empty run of ASCII digits into an `i64`.
///
/// Inputs long enough to overflow are rejected, which is fine for this
/// crate: no field in the grammar has more than 9 digits.
pub(crate) fn parse_i64(input: &[u8]) -> Result<i64, Error> {
    if input.is_empty() {
        return Err(err!("expected digits, but found end of input"));
    }
    if input.len() > 18 {
        return Err(err!(
            "expected at most 18 digits, but found {}",
            input.len()
        ));
    }
    let mut n: i64 = 0;
    for &b in input {
        debug_assert!(b.is_ascii_digit(), "caller must supply digits only");
        n = n * 10 + i64::from(b - b'0');
    }
    Ok(n)
}

/// Converts a fractional-second digit run (1 to 9 digits) to nanoseconds.
///
/// The digits are right padded: `5` means 500 milliseconds, not 5
/// nanoseconds.
pub(crate) fn fraction_to_nanos(digits: &[u8]) -> Result<i32, Error> {
    if digits.is_empty() {
        return Err(err!("fractional component must have at least one digit"));
    }
    if digits.len() > 9 {
        return Err(err!(
            "fractional component has {} digits, \
             but at most 9 are supported",
            digits.len(),
        ));
    }
    let mut nanos: i32 = 0;
    for &b in digits {
        nanos = nanos * 10 + i32::from(b - b'0');
    }
    for _ in digits.len()..9 {
        nanos *= 10;
    }
    Ok(nanos)
}
