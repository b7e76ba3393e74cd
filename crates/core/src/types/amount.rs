//! Currency-agnostic monetary amounts using decimal arithmetic.
//!
//! Storefront prices are plain amounts in the shop's single currency, so
//! [`Amount`] carries no currency code. Arithmetic is exact; the only rounding
//! happens in [`Amount::percent`], which rounds to whole units the way
//! percentage promotions are advertised.
//!
//! Amounts are bounded by [`Amount::MAX`] at every parse and deserialize, and
//! arithmetic saturates, so no stored value can make a total panic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Amount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input is not a decimal number.
    #[error("invalid amount: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("amount cannot be negative")]
    Negative,
    /// The input is above [`Amount::MAX`].
    #[error("amount cannot exceed {}", Amount::MAX)]
    TooLarge,
}

/// A monetary amount.
///
/// Serialized as a decimal string; deserializes from either a JSON string or
/// a JSON number so data written by other clients still loads. Deserialized
/// values go through the same range check as [`Amount::parse`].
///
/// ```
/// use cartwheel_core::Amount;
///
/// let price: Amount = "249.50".parse().unwrap();
/// assert_eq!((price * 2).to_string(), "499.00");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "Decimal", try_from = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest accepted amount, one trillion units.
    pub const MAX: Self = Self(Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0));

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create an amount from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Parse a non-negative amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number, is negative or
    /// is above [`Amount::MAX`].
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| AmountError::Invalid(s.to_owned()))?;

        Self::try_from(value)
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `percentage`% of this amount, rounded to whole units (halves round up).
    #[must_use]
    pub fn percent(&self, percentage: Decimal) -> Self {
        let raw = self.0.saturating_mul(percentage) / Decimal::ONE_HUNDRED;
        Self(raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative);
        }
        if value > Self::MAX.0 {
            return Err(AmountError::TooLarge);
        }
        Ok(Self(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Amount {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Amount::parse("100").unwrap(), Amount::from_units(100));
        assert_eq!(Amount::parse(" 12.50 ").unwrap().to_string(), "12.50");
        assert_eq!(Amount::parse("0").unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Amount::parse("abc"), Err(AmountError::Invalid(_))));
        assert!(matches!(Amount::parse(""), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Amount::parse("-1"), Err(AmountError::Negative));
    }

    #[test]
    fn test_percent_rounds_half_up() {
        // 10% of 1005 = 100.5 -> 101
        assert_eq!(
            Amount::from_units(1005).percent(Decimal::TEN),
            Amount::from_units(101)
        );
        // 15% of 333 = 49.95 -> 50
        assert_eq!(
            Amount::from_units(333).percent(Decimal::from(15)),
            Amount::from_units(50)
        );
        // 10% of 1004 = 100.4 -> 100
        assert_eq!(
            Amount::from_units(1004).percent(Decimal::TEN),
            Amount::from_units(100)
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Amount::from_units(250);
        assert_eq!(a * 3, Amount::from_units(750));
        assert_eq!(a + a - Amount::from_units(100), Amount::from_units(400));

        let total: Amount = [a, a, a].into_iter().sum();
        assert_eq!(total, Amount::from_units(750));
    }

    #[test]
    fn test_serde_accepts_number_and_string() {
        let from_number: Amount = serde_json::from_str("499").unwrap();
        let from_string: Amount = serde_json::from_str("\"499\"").unwrap();
        assert_eq!(from_number, Amount::from_units(499));
        assert_eq!(from_string, from_number);

        let json = serde_json::to_string(&Amount::from_units(5)).unwrap();
        assert_eq!(json, "\"5\"");
    }

    #[test]
    fn test_max_is_one_trillion() {
        assert_eq!(Amount::MAX, Amount::from_units(1_000_000_000_000));
        assert_eq!(Amount::parse("1000000000000").unwrap(), Amount::MAX);
    }

    #[test]
    fn test_parse_too_large() {
        assert_eq!(Amount::parse("1000000000000.01"), Err(AmountError::TooLarge));
        assert_eq!(
            Amount::parse("79228162514264337593543950335"),
            Err(AmountError::TooLarge)
        );
    }

    #[test]
    fn test_deserialize_enforces_range() {
        assert!(serde_json::from_str::<Amount>("-500").is_err());
        assert!(serde_json::from_str::<Amount>("\"-0.01\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"79228162514264337593543950335\"").is_err());
        assert_eq!(
            serde_json::from_str::<Amount>("\"1000000000000\"").unwrap(),
            Amount::MAX
        );
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Amount::new(Decimal::MAX);
        assert_eq!(huge * 2, huge);
        assert_eq!(huge + huge, huge);
        assert!(huge.percent(Decimal::from(200)) < huge);
    }
}
