use crate::error::{err, Error};

/// The mode for dealing with the remainder when rounding temporal values.
///
/// Every mode is defined over the quotient of a quantity and a rounding
/// increment. The "half" modes only behave differently from one another when
/// the fractional part of that quotient is exactly one half.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundMode {
    /// Rounds toward positive infinity.
    Ceil,
    /// Rounds toward negative infinity.
    Floor,
    /// Rounds away from zero.
    Expand,
    /// Rounds toward zero, chopping off any fractional part.
    Trunc,
    /// Rounds to the nearest value; ties go toward positive infinity.
    HalfCeil,
    /// Rounds to the nearest value; ties go toward negative infinity.
    HalfFloor,
    /// Rounds to the nearest value; ties go away from zero. This is how
    /// rounding is usually taught in school, and it is the default.
    #[default]
    HalfExpand,
    /// Rounds to the nearest value; ties go toward zero.
    HalfTrunc,
    /// Rounds to the nearest value; ties go toward the even multiple of the
    /// increment.
    HalfEven,
}

impl RoundMode {
    /// Rounds `quantity` to the nearest multiple of `increment` according to
    /// this mode.
    ///
    /// `increment` must be positive. The arithmetic is exact: ties are
    /// detected by doubling the remainder, never by floating point division.
    pub fn round(self, quantity: i128, increment: i128) -> i128 {
        debug_assert!(increment > 0, "rounding increment must be positive");
        let mut quotient = quantity / increment;
        let remainder = quantity % increment;
        if remainder == 0 {
            return quantity;
        }
        let sign: i128 = if remainder < 0 { -1 } else { 1 };
        let doubled = (remainder * 2).abs();
        let tie = doubled == increment;
        let expand_is_nearer = doubled > increment;
        match self {
            RoundMode::Ceil => {
                if sign > 0 {
                    quotient += sign;
                }
            }
            RoundMode::Floor => {
                if sign < 0 {
                    quotient += sign;
                }
            }
            RoundMode::Expand => {
                quotient += sign;
            }
            RoundMode::Trunc => {}
            RoundMode::HalfCeil => {
                if expand_is_nearer || (tie && sign > 0) {
                    quotient += sign;
                }
            }
            RoundMode::HalfFloor => {
                if expand_is_nearer || (tie && sign < 0) {
                    quotient += sign;
                }
            }
            RoundMode::HalfExpand => {
                if expand_is_nearer || tie {
                    quotient += sign;
                }
            }
            RoundMode::HalfTrunc => {
                if expand_is_nearer {
                    quotient += sign;
                }
            }
            RoundMode::HalfEven => {
                if expand_is_nearer || (tie && quotient.rem_euclid(2) == 1) {
                    quotient += sign;
                }
            }
        }
        quotient.saturating_mul(increment)
    }

    /// Returns the mode to use when rounding a quantity whose sign must be
    /// ignored, e.g. some calendar-unit roundings that operate on an
    /// absolute magnitude.
    ///
    /// Direction-sensitive modes map to their positive-quantity equivalents:
    /// `Trunc` becomes `Floor`, `Expand` becomes `Ceil`, and likewise for
    /// the half variants. The rest are unchanged.
    pub fn as_if_positive(self) -> RoundMode {
        match self {
            RoundMode::Ceil => RoundMode::Ceil,
            RoundMode::Trunc => RoundMode::Floor,
            RoundMode::Expand => RoundMode::Ceil,
            RoundMode::HalfTrunc => RoundMode::HalfFloor,
            RoundMode::HalfExpand => RoundMode::HalfCeil,
            mode => mode,
        }
    }

    /// Returns the mode that, applied to `-q`, produces the negation of this
    /// mode applied to `q`.
    ///
    /// Used to reduce rounding of negative quantities to the non-negative
    /// case.
    pub(crate) fn flipped(self) -> RoundMode {
        match self {
            RoundMode::Ceil => RoundMode::Floor,
            RoundMode::Floor => RoundMode::Ceil,
            RoundMode::HalfCeil => RoundMode::HalfFloor,
            RoundMode::HalfFloor => RoundMode::HalfCeil,
            mode => mode,
        }
    }
}

/// Validates a rounding increment against the maximum for its unit.
///
/// `increment` must be at least 1 and must divide `maximum` evenly. When
/// `inclusive` is true, the increment may equal the maximum; otherwise it
/// must be strictly smaller. (Rounding an instant to whole days uses the
/// inclusive form; rounding a time-of-day to hours does not, since 24 hours
/// would round past the day boundary.)
pub fn check_increment(
    increment: i64,
    maximum: i64,
    inclusive: bool,
) -> Result<(), Error> {
    let bound = if inclusive { maximum } else { maximum - 1 };
    if increment < 1 || increment > bound {
        return Err(Error::range("increment", increment, 1, bound));
    }
    if maximum % increment != 0 {
        return Err(err!(
            "increment {increment} is not a divisor of {maximum}",
        ));
    }
    Ok(())
}
