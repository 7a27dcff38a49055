//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A pricing engine must never silently lose or fabricate value:         │
//! │  every discount is computed in integer minor units (pence for GBP),    │
//! │  and every rounding step is explicit and documented.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Currency-Qualified?
//! All monetary values within one pricing run must share a single currency.
//! Mixing currencies is a configuration bug, so every arithmetic operation
//! checks its operands and fails with [`MoneyError::CurrencyMismatch`]
//! instead of coercing.
//!
//! ## Usage
//! ```rust
//! use strata_core::money::{Currency, Money};
//!
//! let price = Money::from_minor(1099, Currency::GBP); // £10.99
//! let fee = Money::from_minor(500, Currency::GBP);
//!
//! let total = price.checked_add(fee).unwrap();
//! assert_eq!(total.minor_units(), 1599);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::{MoneyError, ValidationResult};
use crate::types::Percentage;
use crate::validation::validate_currency_code;

// =============================================================================
// Currency
// =============================================================================

/// A three-letter uppercase currency code (ISO 4217 style).
///
/// ## Design Decisions
/// - **`[u8; 3]` storage**: keeps `Currency` (and therefore `Money`) `Copy`
/// - **Validated at construction**: `from_code` rejects anything that is not
///   exactly three ASCII uppercase letters
/// - **Serialized as a string**: `"GBP"`, not a byte array
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    /// Pound sterling.
    pub const GBP: Currency = Currency(*b"GBP");

    /// United States dollar.
    pub const USD: Currency = Currency(*b"USD");

    /// Euro.
    pub const EUR: Currency = Currency(*b"EUR");

    /// Parses a currency code.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::money::Currency;
    ///
    /// assert_eq!(Currency::from_code("GBP").unwrap(), Currency::GBP);
    /// assert!(Currency::from_code("pounds").is_err());
    /// ```
    pub fn from_code(code: &str) -> ValidationResult<Self> {
        validate_currency_code(code)?;

        let bytes = code.as_bytes();
        Ok(Currency([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the code as a string slice.
    pub fn code(&self) -> &str {
        // Construction only admits ASCII uppercase, so this never fails.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::from_code(&code).map_err(D::Error::custom)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (pence for GBP).
///
/// ## Design Decisions
/// - **i64 minor units**: integer arithmetic, no floating point anywhere
/// - **Currency tag**: operations across differing currencies fail loudly
/// - **Immutable**: arithmetic returns new values; nothing mutates in place
///
/// ## Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──► Item.price ──► Layer discounting ──► Receipt.total  │
/// │                                                                         │
/// │  EVERY monetary value in the engine flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money {
    minor: i64,
    #[ts(type = "string")]
    currency: Currency,
}

impl Money {
    /// Creates a Money value from minor units (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::money::{Currency, Money};
    ///
    /// let price = Money::from_minor(1099, Currency::GBP); // £10.99
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64, currency: Currency) -> Self {
        Money { minor, currency }
    }

    /// Returns zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money { minor: 0, currency }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.minor
    }

    /// Returns the currency.
    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Adds two values of the same currency.
    ///
    /// ## Errors
    /// `CurrencyMismatch` when the operands differ in currency; `Overflow`
    /// when the sum leaves the representable range.
    pub fn checked_add(self, other: Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;

        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or(MoneyError::Overflow)?;

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Subtracts two values of the same currency. The result may be
    /// negative; use [`Money::sub_clamped`] for prices.
    pub fn checked_sub(self, other: Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;

        let minor = self
            .minor
            .checked_sub(other.minor)
            .ok_or(MoneyError::Overflow)?;

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Subtracts, clamping the result at zero. Prices never go negative.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::money::{Currency, Money};
    ///
    /// let price = Money::from_minor(300, Currency::GBP);
    /// let off = Money::from_minor(500, Currency::GBP);
    ///
    /// assert!(price.sub_clamped(off).unwrap().is_zero());
    /// ```
    pub fn sub_clamped(self, other: Money) -> Result<Money, MoneyError> {
        let result = self.checked_sub(other)?;

        Ok(Money::from_minor(result.minor.max(0), self.currency))
    }

    /// Multiplies by a percentage, rounding to the nearest minor unit with
    /// ties away from zero.
    ///
    /// ## Rounding
    /// `£1.25 × 50% = 62.5p → 63p`. Half-away-from-zero keeps the rounding
    /// rule identical for every price in a run, which is what makes receipts
    /// bit-for-bit reproducible.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::money::{Currency, Money};
    /// use strata_core::types::Percentage;
    ///
    /// let price = Money::from_minor(125, Currency::GBP);
    /// let half = Percentage::from_decimal(0.5).unwrap();
    ///
    /// assert_eq!(price.multiply_by_percentage(half).minor_units(), 63);
    /// ```
    pub fn multiply_by_percentage(&self, percentage: Percentage) -> Money {
        // Widen to i128: minor × 10_000 cannot overflow there.
        let numer = self.minor as i128 * percentage.basis_points() as i128;
        let rounded = if numer >= 0 {
            (numer + 5_000) / 10_000
        } else {
            (numer - 5_000) / 10_000
        };

        // |rounded| <= |minor|, so the narrowing cast is lossless.
        Money::from_minor(rounded as i64, self.currency)
    }

    /// Compares two values of the same currency.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.require_same_currency(*other)?;

        Ok(self.minor.cmp(&other.minor))
    }

    fn require_same_currency(&self, other: Money) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                actual: other.currency,
            })
        }
    }
}

/// Ordering is only defined within a single currency; comparisons across
/// currencies yield `None`.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency == other.currency {
            Some(self.minor.cmp(&other.minor))
        } else {
            None
        }
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Hosts own user-facing formatting
/// (locale, symbol placement, minor-unit exponent).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        write!(
            f,
            "{} {}{}.{:02}",
            self.currency,
            sign,
            (self.minor / 100).abs(),
            (self.minor % 100).abs()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("GBP").unwrap(), Currency::GBP);
        assert_eq!(Currency::from_code("NOK").unwrap().code(), "NOK");

        assert!(Currency::from_code("").is_err());
        assert!(Currency::from_code("gb").is_err());
        assert!(Currency::from_code("gbp").is_err());
        assert!(Currency::from_code("GBPX").is_err());
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_minor(1000, Currency::GBP);
        let b = Money::from_minor(250, Currency::GBP);

        assert_eq!(a.checked_add(b).unwrap().minor_units(), 1250);
        assert_eq!(a.checked_sub(b).unwrap().minor_units(), 750);
    }

    #[test]
    fn test_currency_mismatch_is_never_coerced() {
        let pounds = Money::from_minor(1000, Currency::GBP);
        let dollars = Money::from_minor(1000, Currency::USD);

        assert_eq!(
            pounds.checked_add(dollars),
            Err(MoneyError::CurrencyMismatch {
                expected: Currency::GBP,
                actual: Currency::USD,
            })
        );
        assert!(pounds.try_cmp(&dollars).is_err());
        assert_eq!(pounds.partial_cmp(&dollars), None);
    }

    #[test]
    fn test_overflow_detected() {
        let max = Money::from_minor(i64::MAX, Currency::GBP);
        let one = Money::from_minor(1, Currency::GBP);

        assert_eq!(max.checked_add(one), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_sub_clamped_never_negative() {
        let price = Money::from_minor(300, Currency::GBP);
        let off = Money::from_minor(500, Currency::GBP);

        let clamped = price.sub_clamped(off).unwrap();
        assert!(clamped.is_zero());
        assert_eq!(clamped.currency(), Currency::GBP);
    }

    #[test]
    fn test_percentage_multiply_exact() {
        let price = Money::from_minor(300, Currency::GBP);
        let ninety = Percentage::from_decimal(0.9).unwrap();

        assert_eq!(price.multiply_by_percentage(ninety).minor_units(), 270);
    }

    #[test]
    fn test_percentage_multiply_rounds_ties_away_from_zero() {
        // 125p × 50% = 62.5p → 63p
        let price = Money::from_minor(125, Currency::GBP);
        let half = Percentage::from_decimal(0.5).unwrap();
        assert_eq!(price.multiply_by_percentage(half).minor_units(), 63);

        // 15p × 50% = 7.5p → 8p
        let price = Money::from_minor(15, Currency::GBP);
        assert_eq!(price.multiply_by_percentage(half).minor_units(), 8);
    }

    #[test]
    fn test_ordering_within_currency() {
        let cheap = Money::from_minor(100, Currency::GBP);
        let dear = Money::from_minor(200, Currency::GBP);

        assert_eq!(cheap.try_cmp(&dear).unwrap(), Ordering::Less);
        assert!(cheap < dear);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Money::from_minor(1099, Currency::GBP)),
            "GBP 10.99"
        );
        assert_eq!(
            format!("{}", Money::from_minor(-550, Currency::USD)),
            "USD -5.50"
        );
        assert_eq!(
            format!("{}", Money::zero(Currency::EUR)),
            "EUR 0.00"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let price = Money::from_minor(1099, Currency::GBP);

        let json = serde_json::to_string(&price).unwrap();
        assert!(json.contains("\"GBP\""));

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
