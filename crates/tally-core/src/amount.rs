//! Exact amount arithmetic in integer minor units.
//!
//! Every amount the engine stores or sums is a [`MinorUnits`]: a signed
//! integer count of the smallest representable unit (e.g. cents at a
//! precision of 2). Caller-supplied decimals are converted once at the
//! boundary, rounding half away from zero at the book's precision, and all
//! later addition and zero-comparison happens in the integer domain.
//!
//! Summing the caller's decimals (or worse, floats) directly can leave a
//! residue on the order of the ULP, which would reject a balanced entry or
//! accept an unbalanced one.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use thiserror::Error;

/// Error produced by minor-unit conversion or arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The value does not fit the minor-unit integer domain, or the
    /// requested precision is not representable.
    #[error("amount exceeds the supported minor-unit range")]
    Overflow,
}

/// A signed quantity in integer minor units.
///
/// The unit itself (cents, thousandths, ...) is fixed by the precision the
/// value was converted with; a book uses one precision for everything it
/// stores, so minor units from the same book are directly comparable.
///
/// # Examples
///
/// ```
/// use tally_core::MinorUnits;
/// use rust_decimal_macros::dec;
///
/// let a = MinorUnits::from_decimal(dec!(10.05), 2).unwrap();
/// assert_eq!(a.value(), 1005);
/// assert_eq!(a.to_decimal(2).unwrap(), dec!(10.05));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(i128);

impl MinorUnits {
    /// The zero quantity.
    pub const ZERO: Self = Self(0);

    /// Convert a decimal to minor units at the given precision.
    ///
    /// The value is rounded half away from zero at `precision` decimal
    /// places before scaling, so `10.055` at precision 2 becomes `1006`
    /// and `-10.055` becomes `-1006`.
    pub fn from_decimal(value: Decimal, precision: u32) -> Result<Self, AmountError> {
        let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        // round_dp never increases scale beyond the requested precision
        let shift = precision - rounded.scale();
        let factor = 10i128.checked_pow(shift).ok_or(AmountError::Overflow)?;
        rounded
            .mantissa()
            .checked_mul(factor)
            .map(Self)
            .ok_or(AmountError::Overflow)
    }

    /// Convert back to a decimal with `precision` fractional digits.
    pub fn to_decimal(self, precision: u32) -> Result<Decimal, AmountError> {
        Decimal::try_from_i128_with_scale(self.0, precision).map_err(|_| AmountError::Overflow)
    }

    /// The raw minor-unit count.
    #[must_use]
    pub const fn value(self) -> i128 {
        self.0
    }

    /// Check if the quantity is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if the quantity is strictly negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Overflow-checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// The additive inverse (a debit becomes a credit of equal size).
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MinorUnits {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for MinorUnits {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for MinorUnits {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for MinorUnits {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(i128::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_decimal_exact() {
        let a = MinorUnits::from_decimal(dec!(500), 2).unwrap();
        assert_eq!(a.value(), 50_000);

        let b = MinorUnits::from_decimal(dec!(994.95), 2).unwrap();
        assert_eq!(b.value(), 99_495);
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let up = MinorUnits::from_decimal(dec!(10.055), 2).unwrap();
        assert_eq!(up.value(), 1006);

        let down = MinorUnits::from_decimal(dec!(-10.055), 2).unwrap();
        assert_eq!(down.value(), -1006);

        // Plain halves, both signs
        assert_eq!(MinorUnits::from_decimal(dec!(0.005), 2).unwrap().value(), 1);
        assert_eq!(
            MinorUnits::from_decimal(dec!(-0.005), 2).unwrap().value(),
            -1
        );
    }

    #[test]
    fn test_fractional_amounts_cancel_exactly() {
        // credit 1005, debit 994.95, debit 10.05 — exact decimal sum is zero
        let credit = MinorUnits::from_decimal(dec!(1005), 2).unwrap();
        let a = MinorUnits::from_decimal(dec!(994.95), 2).unwrap();
        let b = MinorUnits::from_decimal(dec!(10.05), 2).unwrap();
        assert_eq!(credit - a - b, MinorUnits::ZERO);
    }

    #[test]
    fn test_float_inputs_cancel_after_conversion() {
        // The f64 values carry binary representation error; conversion at a
        // fixed precision must still cancel exactly.
        let credit = MinorUnits::from_decimal(Decimal::try_from(1005.0_f64).unwrap(), 2).unwrap();
        let a = MinorUnits::from_decimal(Decimal::try_from(994.95_f64).unwrap(), 2).unwrap();
        let b = MinorUnits::from_decimal(Decimal::try_from(10.05_f64).unwrap(), 2).unwrap();
        assert_eq!(credit - a - b, MinorUnits::ZERO);
    }

    #[test]
    fn test_to_decimal_roundtrip() {
        let a = MinorUnits::from_decimal(dec!(-123.45), 2).unwrap();
        assert_eq!(a.to_decimal(2).unwrap(), dec!(-123.45));

        let zero = MinorUnits::ZERO;
        assert_eq!(zero.to_decimal(4).unwrap(), dec!(0.0000));
    }

    #[test]
    fn test_higher_precision() {
        let a = MinorUnits::from_decimal(dec!(1.2345), 4).unwrap();
        assert_eq!(a.value(), 12_345);

        // Extra digits beyond the precision are rounded, not truncated
        let b = MinorUnits::from_decimal(dec!(1.23456), 4).unwrap();
        assert_eq!(b.value(), 12_346);
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = MinorUnits(i128::MAX);
        assert_eq!(max.checked_add(MinorUnits(1)), None);
        assert_eq!(max.checked_add(MinorUnits(-1)), Some(MinorUnits(i128::MAX - 1)));
    }

    #[test]
    fn test_negated() {
        let a = MinorUnits::from_decimal(dec!(10), 2).unwrap();
        assert_eq!(a.negated().value(), -1000);
        assert_eq!(a.negated().negated(), a);
    }

    #[test]
    fn test_sum() {
        let total: MinorUnits = [MinorUnits(1), MinorUnits(2), MinorUnits(-3)]
            .into_iter()
            .sum();
        assert!(total.is_zero());
    }

    proptest! {
        /// Conversion distributes over negation: converting `-x` equals
        /// negating the conversion of `x` (half-away-from-zero is symmetric).
        #[test]
        fn prop_negation_symmetry(units in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..6) {
            let d = Decimal::new(units, scale);
            let pos = MinorUnits::from_decimal(d, 4).unwrap();
            let neg = MinorUnits::from_decimal(-d, 4).unwrap();
            prop_assert_eq!(pos.negated(), neg);
        }

        /// A value already at the target precision roundtrips exactly.
        #[test]
        fn prop_roundtrip(units in -1_000_000_000i64..1_000_000_000i64) {
            let d = Decimal::new(units, 2);
            let m = MinorUnits::from_decimal(d, 2).unwrap();
            prop_assert_eq!(m.to_decimal(2).unwrap(), d);
        }
    }
}
