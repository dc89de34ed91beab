//! Coin and denomination value objects.
//!
//! The machine only ever deals with a closed set of nine denominations.
//! Coins are fungible: two coins of the same denomination are equal and the
//! till tracks counts, never individual coins.

use crate::decimal::Decimal2;
use crate::error::{Result, VendingError};
use rust_decimal::Decimal;
use std::fmt;

/// One legal coin value, ordered by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Denomination {
    OneCent,
    TwoCents,
    FiveCents,
    TenCents,
    TwentyCents,
    FiftyCents,
    OneUnit,
    TwoUnits,
    FiveUnits,
}

impl Denomination {
    /// Every denomination, smallest first.
    pub const ALL: [Denomination; 9] = [
        Denomination::OneCent,
        Denomination::TwoCents,
        Denomination::FiveCents,
        Denomination::TenCents,
        Denomination::TwentyCents,
        Denomination::FiftyCents,
        Denomination::OneUnit,
        Denomination::TwoUnits,
        Denomination::FiveUnits,
    ];

    /// Value in cents.
    pub const fn cents(self) -> i64 {
        match self {
            Denomination::OneCent => 1,
            Denomination::TwoCents => 2,
            Denomination::FiveCents => 5,
            Denomination::TenCents => 10,
            Denomination::TwentyCents => 20,
            Denomination::FiftyCents => 50,
            Denomination::OneUnit => 100,
            Denomination::TwoUnits => 200,
            Denomination::FiveUnits => 500,
        }
    }

    /// Value in base currency units.
    pub fn value(self) -> Decimal2 {
        Decimal2::from_cents(self.cents())
    }

    /// Looks up the denomination whose value is numerically equal to `value`.
    ///
    /// `2`, `2.0` and `2.00` all map to [`Denomination::TwoUnits`].
    pub fn from_value(value: Decimal) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| Decimal::from(d.value()) == value)
            .ok_or(VendingError::InvalidDenomination(value))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// An immutable coin. Equality is by denomination.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use vending_machine::{Coin, Denomination};
///
/// let coin = Coin::new(Decimal::new(20, 2)).unwrap();
/// assert_eq!(coin.denomination(), Denomination::TwentyCents);
/// assert!(Coin::new(Decimal::new(88, 2)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coin(Denomination);

impl Coin {
    /// Creates a coin from a raw monetary value, rejecting anything that is
    /// not a legal denomination.
    pub fn new(value: Decimal) -> Result<Self> {
        Denomination::from_value(value).map(Coin)
    }

    pub fn denomination(&self) -> Denomination {
        self.0
    }

    pub fn value(&self) -> Decimal2 {
        self.0.value()
    }
}

impl From<Denomination> for Coin {
    fn from(denomination: Denomination) -> Self {
        Coin(denomination)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Total value of a list of coins, rounded to cents after each addition.
pub fn coins_value(coins: &[Coin]) -> Decimal2 {
    coins.iter().map(Coin::value).sum()
}
