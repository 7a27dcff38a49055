//! # strata-core: Pure Pricing Logic for Strata
//!
//! This crate is the **heart** of Strata. It computes the price a customer
//! pays after applying a configured set of promotional rules to a basket of
//! purchased items, with a full audit trail of which promotion affected
//! which item and by how much.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Strata Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Host Checkout Pipeline                         │   │
//! │  │    catalog lookup ──► basket build ──► pricing ──► tender      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ strata-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ promotion │  │   layer   │  │   stack   │  │   │
//! │  │   │   Money   │  │ Qualify   │  │ Selection │  │   Graph   │  │   │
//! │  │   │ Currency  │  │ Discount  │  │  Budgets  │  │  Receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Currency-qualified integer money (no floating point!)
//! - [`types`] - Domain types (Product, Item, Percentage) and basket helpers
//! - [`qualification`] - Tag-based promotion eligibility
//! - [`discount`] - Pure price transformations
//! - [`budget`] - Promotion-scoped redemption/monetary caps
//! - [`promotion`] - Discount rules and candidate selection
//! - [`layer`] - One evaluation stage with output routing
//! - [`stack`] - The validated layer graph and its execution engine
//! - [`receipt`] - The priced result and audit trail
//! - [`error`] - Domain error types
//! - [`validation`] - Constructor input validation
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same configuration + same basket = bit-for-bit the
//!    same receipt, every time
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: minor units + currency code, never floats
//! 4. **Explicit Errors**: budget exhaustion and unqualified items are
//!    normal outcomes, never errors; mixed currencies always are
//!
//! ## Example Usage
//!
//! ```rust
//! use strata_core::budget::Budget;
//! use strata_core::discount::Discount;
//! use strata_core::layer::{Layer, LayerOutput};
//! use strata_core::money::{Currency, Money};
//! use strata_core::promotion::Promotion;
//! use strata_core::qualification::Qualification;
//! use strata_core::stack::Stack;
//! use strata_core::types::{Item, Percentage, Product};
//!
//! // A 10%-off promotion on anything tagged "food".
//! let promotion = Promotion::direct(
//!     "lunch-offer",
//!     Qualification::match_any(["food".to_string()]),
//!     Discount::percentage_off(Percentage::from_decimal(0.1).unwrap()),
//!     Budget::unlimited(),
//! );
//!
//! let mut stack = Stack::linear(vec![Layer::new(
//!     "offers",
//!     LayerOutput::pass_through(),
//!     vec![promotion],
//! )]);
//!
//! let product = Product::new(
//!     "product-1",
//!     "Sandwich",
//!     Money::from_minor(300, Currency::GBP),
//!     ["food".to_string()],
//! );
//! let basket = [Item::from_product("line-1", &product)];
//!
//! let receipt = stack.process(&basket).unwrap();
//! assert_eq!(receipt.total.minor_units(), 270);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod budget;
pub mod discount;
pub mod error;
pub mod layer;
pub mod money;
pub mod promotion;
pub mod qualification;
pub mod receipt;
pub mod stack;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use strata_core::Money` instead of
// `use strata_core::money::Money`

pub use budget::Budget;
pub use discount::Discount;
pub use error::{EngineError, EngineResult, MoneyError, SplitRole, StackError, ValidationError};
pub use layer::{Layer, LayerHandle, LayerOutput};
pub use money::{Currency, Money};
pub use promotion::{DiscountOutcome, Promotion, PromotionKind};
pub use qualification::Qualification;
pub use receipt::{PromotionApplication, Receipt};
pub use stack::{Stack, StackBuilder};
pub use types::{Item, Percentage, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency assumed for empty baskets, whose zero totals have no item to
/// borrow a currency from.
///
/// ## Why a constant?
/// Every monetary value in one processing run must share a single currency,
/// and that currency always comes from the basket itself. Only the
/// degenerate zero-item basket needs a default, and making it a visible
/// constant keeps the choice out of hosts' way until they care.
pub const DEFAULT_CURRENCY: Currency = Currency::GBP;
