//! Type-safe price representation using decimal arithmetic.
//!
//! The backend stores prices as `DecimalField(max_digits=10, decimal_places=2)`
//! and serializes them as strings (`"300.00"`). Some fixtures send plain
//! numbers instead; both decode into the same [`Price`].

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol the store prices in (Russian rubles).
pub const CURRENCY_SYMBOL: &str = "₽";

/// A price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price, used for line items whose book is not known yet.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable price; arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole amount (e.g. `300` for 300.00).
    #[must_use]
    pub fn whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

/// Saturating at [`Price::MAX`].
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {CURRENCY_SYMBOL}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_decodes_from_string_and_number() {
        let from_str: Price = serde_json::from_str("\"300.00\"").expect("string price");
        let from_num: Price = serde_json::from_str("300").expect("numeric price");
        assert_eq!(from_str, from_num);
        assert_eq!(from_str, Price::whole(300));
    }

    #[test]
    fn test_price_times_quantity() {
        let price: Price = serde_json::from_str("\"149.50\"").expect("price");
        assert_eq!(price.times(2), Price::whole(299));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_price_sum_of_empty_is_zero() {
        let total: Price = std::iter::empty().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_price_arithmetic_saturates() {
        let huge: Price = serde_json::from_str("\"79228162514264337593543950335\"").expect("price");
        assert_eq!(huge, Price::MAX);
        assert_eq!(huge.times(3), Price::MAX);
        assert_eq!(huge + Price::whole(1), Price::MAX);

        let total: Price = [huge.times(2), Price::whole(300), huge].into_iter().sum();
        assert_eq!(total, Price::MAX);
        assert_eq!(Price::whole(300).times(u32::MAX), Price::whole(300 * i64::from(u32::MAX)));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::whole(600).to_string(), "600.00 ₽");
    }
}
