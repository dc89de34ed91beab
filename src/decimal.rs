//! Fixed-point decimal type with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that every
//! monetary step (coin sums, change remainders, price comparisons) is
//! rounded to whole cents immediately instead of drifting. Values coming
//! from outside (parsed strings, raw `Decimal`s) must already be whole cents;
//! they are never rounded on the way in.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Failure to turn external input into a [`Decimal2`].
#[derive(Error, Debug)]
pub enum ParseDecimal2Error {
    /// Not a decimal number at all
    #[error("invalid decimal: {0}")]
    Invalid(#[from] rust_decimal::Error),

    /// More than 2 significant decimal places
    #[error("{0} has more than 2 decimal places")]
    TooPrecise(Decimal),
}

/// A decimal type that maintains exactly 2 decimal places of precision.
///
/// This type wraps `rust_decimal::Decimal` and rescales after every
/// arithmetic operation, which makes equality comparisons between a sum of
/// coins and an item price exact.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use vending_machine::Decimal2;
///
/// let amount = Decimal2::from_str("5.2").unwrap();
/// assert_eq!(amount.to_string(), "5.20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal2(Decimal);

impl Decimal2 {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Decimal2(Decimal::ZERO);

    /// Rescales an arithmetic result to 2 decimal places.
    fn rounded(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Decimal2(normalized)
    }

    /// Creates a value from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Decimal2(Decimal::new(cents, Self::SCALE))
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// How many whole `unit`s fit into this value, i.e. `floor(self / unit)`.
    ///
    /// Non-positive values and a zero `unit` yield 0.
    pub fn whole_multiples_of(&self, unit: Decimal2) -> u32 {
        if !self.is_positive() || !unit.is_positive() {
            return 0;
        }
        (self.0 / unit.0).floor().to_u32().unwrap_or(u32::MAX)
    }
}

impl From<Decimal2> for Decimal {
    fn from(value: Decimal2) -> Self {
        value.0
    }
}

impl TryFrom<Decimal> for Decimal2 {
    type Error = ParseDecimal2Error;

    /// Accepts `value` only if it is a whole number of cents (`1.5`, `1.50`
    /// and `1.500` are fine, `1.999` is not).
    fn try_from(value: Decimal) -> std::result::Result<Self, Self::Error> {
        if value.normalize().scale() > Self::SCALE {
            return Err(ParseDecimal2Error::TooPrecise(value));
        }
        Ok(Decimal2::rounded(value))
    }
}

impl FromStr for Decimal2 {
    type Err = ParseDecimal2Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Decimal2::try_from(decimal)
    }
}

impl fmt::Display for Decimal2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Decimal2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Decimal2::rounded(self.0 + rhs.0)
    }
}

impl AddAssign for Decimal2 {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Sub for Decimal2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Decimal2::rounded(self.0 - rhs.0)
    }
}

impl SubAssign for Decimal2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Mul<u32> for Decimal2 {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Decimal2::rounded(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Decimal2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Decimal2::ZERO, |acc, value| acc + value)
    }
}

impl Serialize for Decimal2 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

impl<'de> Deserialize<'de> for Decimal2 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Decimal2::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal2 {
        Decimal2::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(dec("1").to_string(), "1.00");
        assert_eq!(dec("1.5").to_string(), "1.50");
        assert_eq!(dec("  2.05  ").to_string(), "2.05");
        assert_eq!(Decimal2::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_rejects_sub_cent_input() {
        for input in ["0.005", "0.015", "1.999", "0.001"] {
            assert!(
                matches!(
                    Decimal2::from_str(input),
                    Err(ParseDecimal2Error::TooPrecise(_))
                ),
                "{} should be rejected",
                input
            );
        }
        assert!(matches!(
            Decimal2::from_str("abc"),
            Err(ParseDecimal2Error::Invalid(_))
        ));
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        assert_eq!(dec("1.500").to_string(), "1.50");
        assert_eq!(dec("2.0000").to_string(), "2.00");
        assert!(Decimal2::try_from(Decimal::new(1999, 3)).is_err());
        assert_eq!(
            Decimal2::try_from(Decimal::new(520, 2)).unwrap(),
            Decimal2::from_cents(520)
        );
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Decimal2::from_cents(520), dec("5.20"));
        assert_eq!(Decimal2::from_cents(1).to_string(), "0.01");
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = dec("0.1");
        let b = dec("0.2");

        assert_eq!((a + b).to_string(), "0.30");
        assert_eq!((b - a).to_string(), "0.10");
        assert_eq!((a * 3).to_string(), "0.30");

        let mut acc = Decimal2::ZERO;
        acc += a;
        acc += b;
        acc -= a;
        assert_eq!(acc, dec("0.2"));
    }

    #[test]
    fn test_many_small_additions_do_not_drift() {
        let cent = dec("0.01");
        let total: Decimal2 = std::iter::repeat(cent).take(520).sum();
        assert_eq!(total, dec("5.20"));
    }

    #[test]
    fn test_whole_multiples_of() {
        assert_eq!(dec("3.50").whole_multiples_of(dec("2")), 1);
        assert_eq!(dec("0.99").whole_multiples_of(dec("0.2")), 4);
        assert_eq!(dec("0.04").whole_multiples_of(dec("0.05")), 0);
        assert_eq!(dec("1.00").whole_multiples_of(dec("0.01")), 100);
        assert_eq!(Decimal2::ZERO.whole_multiples_of(dec("0.01")), 0);
        assert_eq!(dec("-1").whole_multiples_of(dec("0.5")), 0);
        assert_eq!(dec("1").whole_multiples_of(Decimal2::ZERO), 0);
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Decimal2::ZERO.is_zero());
        assert!(!Decimal2::ZERO.is_positive());
        assert!(dec("0.01").is_positive());
        assert!(!dec("-0.01").is_positive());
    }
}
