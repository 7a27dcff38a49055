//! # Domain Types
//!
//! Catalog-facing types consumed by the promotion engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Item       │   │   Percentage    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  reference      │   │  reference      │   │  bps (u32)      │       │
//! │  │  name           │   │  name           │   │  1000 = 10%     │       │
//! │  │  price          │   │  price          │   └─────────────────┘       │
//! │  │  tags           │   │  tags           │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never constructs or mutates a `Product`; it only snapshots one
//! into an `Item` and reads `Item` fields from then on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{MoneyError, ValidationResult};
use crate::money::Money;
use crate::validation::validate_percentage_decimal;
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Percentage
// =============================================================================

/// A discount rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// Integer basis points reproduce `price × (1 - rate)` exactly at
/// minor-unit precision after rounding - a float rate cannot promise that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from a decimal ratio in `[0, 1]`, rounded to
    /// the nearest basis point.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::types::Percentage;
    ///
    /// let rate = Percentage::from_decimal(0.1).unwrap();
    /// assert_eq!(rate.basis_points(), 1000);
    ///
    /// assert!(Percentage::from_decimal(1.5).is_err());
    /// ```
    pub fn from_decimal(ratio: f64) -> ValidationResult<Self> {
        validate_percentage_decimal(ratio)?;

        Ok(Percentage((ratio * 10_000.0).round() as u32))
    }

    /// Creates a percentage directly from basis points (max 10000 = 100%).
    pub fn from_basis_points(bps: u32) -> ValidationResult<Self> {
        if bps > 10_000 {
            return Err(crate::error::ValidationError::OutOfRange {
                field: "percentage".to_string(),
                min: 0,
                max: 10_000,
            });
        }

        Ok(Percentage(bps))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    /// Returns `1 - rate`, the fraction of the price that remains payable.
    #[inline]
    pub const fn complement(&self) -> Percentage {
        Percentage(10_000 - self.0)
    }

    /// Returns the rate as a decimal ratio (for display only).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A purchasable product from the host's catalog.
///
/// Owned externally; the engine only reads it. The tag set drives promotion
/// qualification ("food", "alcohol", "staff-eligible", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Opaque caller-supplied identity.
    pub reference: String,

    /// Display name shown on the receipt.
    pub name: String,

    /// Shelf price.
    pub price: Money,

    /// Qualification tags, deduplicated at construction.
    #[ts(as = "Vec<String>")]
    pub tags: BTreeSet<String>,
}

impl Product {
    /// Creates a new product. Duplicate tags collapse into one.
    pub fn new(
        reference: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        Product {
            reference: reference.into(),
            name: name.into(),
            price,
            tags: tags.into_iter().collect(),
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A basket line item.
///
/// Uses the snapshot pattern: name, price and tags are frozen copies taken
/// from the product when the item entered the basket, so a later catalog
/// change cannot alter an in-flight pricing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// Opaque caller-supplied identity.
    pub reference: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price at time of adding (frozen).
    pub price: Money,

    /// Qualification tags at time of adding (frozen, deduplicated).
    #[ts(as = "Vec<String>")]
    pub tags: BTreeSet<String>,
}

impl Item {
    /// Creates a new item. Duplicate tags collapse into one.
    pub fn new(
        reference: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        Item {
            reference: reference.into(),
            name: name.into(),
            price,
            tags: tags.into_iter().collect(),
        }
    }

    /// Creates an item by snapshotting a product.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::money::{Currency, Money};
    /// use strata_core::types::{Item, Product};
    ///
    /// let product = Product::new(
    ///     "product-1",
    ///     "Flat White",
    ///     Money::from_minor(320, Currency::GBP),
    ///     ["coffee".to_string()],
    /// );
    ///
    /// let item = Item::from_product("line-1", &product);
    /// assert_eq!(item.name, "Flat White");
    /// assert_eq!(item.price, product.price);
    /// ```
    pub fn from_product(reference: impl Into<String>, product: &Product) -> Self {
        Item {
            reference: reference.into(),
            name: product.name.clone(),
            price: product.price,
            tags: product.tags.clone(),
        }
    }
}

// =============================================================================
// Basket Helpers
// =============================================================================

/// Calculates the total price of a list of items.
///
/// An empty basket totals to zero in [`DEFAULT_CURRENCY`](crate::DEFAULT_CURRENCY).
pub fn total_price(items: &[Item]) -> Result<Money, MoneyError> {
    let Some(first) = items.first() else {
        return Ok(Money::zero(DEFAULT_CURRENCY));
    };

    items[1..]
        .iter()
        .try_fold(first.price, |acc, item| acc.checked_add(item.price))
}

/// Returns the cheapest item in a list of items.
pub fn cheapest_item(items: &[Item]) -> Option<&Item> {
    items
        .iter()
        .min_by_key(|item| item.price.minor_units())
}

// =============================================================================
// Unit Tests
// =============================================================================
