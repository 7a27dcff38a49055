//! # Discount
//!
//! Computes a new price from an original price.
//!
//! A discount is a pure function: it has no budget awareness (budget gating
//! is the promotion's job) and no item awareness (qualification is the
//! qualification's job). It only transforms a price.

use crate::error::MoneyError;
use crate::money::Money;
use crate::types::Percentage;

/// A price transformation: flat amount off or percentage off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discount {
    /// `max(price - amount, 0)`.
    AmountOff(Money),

    /// `price × (1 - rate)`, rounded to the nearest minor unit with ties
    /// away from zero.
    PercentageOff(Percentage),
}

impl Discount {
    /// A flat amount off.
    pub fn amount_off(amount: Money) -> Self {
        Discount::AmountOff(amount)
    }

    /// A percentage off.
    pub fn percentage_off(rate: Percentage) -> Self {
        Discount::PercentageOff(rate)
    }

    /// Applies the discount to a price. Never returns a negative price.
    ///
    /// ## Errors
    /// `CurrencyMismatch` when a flat amount is denominated in a different
    /// currency than the price.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::discount::Discount;
    /// use strata_core::money::{Currency, Money};
    /// use strata_core::types::Percentage;
    ///
    /// let price = Money::from_minor(300, Currency::GBP);
    ///
    /// let tenner_off = Discount::amount_off(Money::from_minor(1000, Currency::GBP));
    /// assert!(tenner_off.apply(price).unwrap().is_zero());
    ///
    /// let ten_percent = Discount::percentage_off(Percentage::from_decimal(0.1).unwrap());
    /// assert_eq!(ten_percent.apply(price).unwrap().minor_units(), 270);
    /// ```
    pub fn apply(&self, price: Money) -> Result<Money, MoneyError> {
        match self {
            Discount::AmountOff(amount) => {
                let reduced = price.checked_sub(*amount)?;

                // Clamp to [0, price]: a discount never goes negative and
                // never raises the price (a negative configured amount
                // counts as no discount).
                let ceiling = price.minor_units().max(0);
                Ok(Money::from_minor(
                    reduced.minor_units().clamp(0, ceiling),
                    price.currency(),
                ))
            }
            Discount::PercentageOff(rate) => Ok(price.multiply_by_percentage(rate.complement())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn gbp(minor: i64) -> Money {
        Money::from_minor(minor, Currency::GBP)
    }

    #[test]
    fn test_amount_off() {
        let discount = Discount::amount_off(gbp(25));

        assert_eq!(discount.apply(gbp(100)).unwrap(), gbp(75));
    }

    #[test]
    fn test_amount_off_clamps_at_zero() {
        let discount = Discount::amount_off(gbp(500));

        assert!(discount.apply(gbp(300)).unwrap().is_zero());
    }

    #[test]
    fn test_negative_amount_off_never_raises_the_price() {
        let discount = Discount::amount_off(gbp(-100));

        assert_eq!(discount.apply(gbp(300)).unwrap(), gbp(300));
    }

    #[test]
    fn test_amount_off_currency_mismatch() {
        let discount = Discount::amount_off(Money::from_minor(25, Currency::USD));

        assert!(discount.apply(gbp(100)).is_err());
    }

    #[test]
    fn test_percentage_off() {
        let discount = Discount::percentage_off(Percentage::from_decimal(0.1).unwrap());

        assert_eq!(discount.apply(gbp(300)).unwrap(), gbp(270));
    }

    #[test]
    fn test_full_percentage_off_is_free() {
        let discount = Discount::percentage_off(Percentage::from_decimal(1.0).unwrap());

        assert!(discount.apply(gbp(700)).unwrap().is_zero());
    }

    #[test]
    fn test_zero_percentage_off_keeps_price() {
        let discount = Discount::percentage_off(Percentage::from_decimal(0.0).unwrap());

        assert_eq!(discount.apply(gbp(300)).unwrap(), gbp(300));
    }
}
