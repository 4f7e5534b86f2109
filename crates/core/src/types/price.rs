//! Type-safe price representation using decimal arithmetic.
//!
//! A [`Price`] is a non-negative amount in the store currency (USD). Negative
//! amounts are rejected at construction, so any `Price` that exists is a
//! valid price, line total, subtotal or discount.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount could not be represented as a decimal.
    #[error("price is not a finite number")]
    NotFinite,
}

/// A non-negative monetary amount.
///
/// ## Examples
///
/// ```
/// use comforty_core::Price;
/// use rust_decimal::Decimal;
///
/// let chair = Price::from_cents(12_999).unwrap();
/// assert_eq!(chair.to_string(), "$129.99");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable amount. Arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        // `-0` compares equal to zero but would display as "-0.00"
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Create a price from a floating point amount, rounded to cents.
    ///
    /// CMS documents store prices as JSON numbers; this is the conversion
    /// used at the ingestion boundary.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotFinite`] for NaN or infinite values and
    /// [`PriceError::Negative`] for amounts below zero.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        let decimal = Decimal::try_from(amount).map_err(|_| PriceError::NotFinite)?;
        Self::new(decimal.round_dp(2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// This price multiplied by a quantity, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or(Self::MAX, Self)
    }

    /// Add `other`, saturating at [`Price::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.0.checked_add(other.0).map_or(Self::MAX, Self)
    }

    /// Subtract `other`, stopping at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(-5, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn test_zero_accepted() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
        assert!(Price::from_f64(-0.0).unwrap().is_zero());
    }

    #[test]
    fn test_from_f64_rounds_to_cents() {
        let price = Price::from_f64(19.999).unwrap();
        assert_eq!(price, Price::from_cents(2000).unwrap());
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert_eq!(Price::from_f64(f64::NAN), Err(PriceError::NotFinite));
        assert_eq!(Price::from_f64(f64::INFINITY), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::from_cents(250).unwrap();
        let total: Price = [unit.times(2), unit.times(0), unit].into_iter().sum();
        assert_eq!(total, Price::from_cents(750).unwrap());
    }

    #[test]
    fn test_arithmetic_saturates_at_max() {
        let huge = Price::from_f64(1e20).unwrap();
        assert_eq!(huge.times(1_000_000_000), Price::MAX);
        assert_eq!(Price::MAX + Price::from_cents(1).unwrap(), Price::MAX);

        let total: Price = [huge.times(u32::MAX), huge].into_iter().sum();
        assert_eq!(total, Price::MAX);
    }

    #[test]
    fn test_saturating_sub() {
        let fifty = Price::from_cents(5000).unwrap();
        let thousand = Price::from_cents(100_000).unwrap();
        assert_eq!(fifty.saturating_sub(thousand), Price::ZERO);
        assert_eq!(thousand.saturating_sub(fifty), Price::from_cents(95_000).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(5).unwrap().to_string(), "$0.05");
        assert_eq!(Price::new(Decimal::new(80, 0)).unwrap().to_string(), "$80.00");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let result: Result<Price, _> = serde_json::from_str("\"-3.00\"");
        assert!(result.is_err());

        let price: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(price, Price::from_cents(1250).unwrap());
    }
}
