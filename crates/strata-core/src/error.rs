//! # Error Types
//!
//! Domain-specific error types for strata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  strata-core errors (this file)                                        │
//! │  ├── MoneyError       - Currency mismatch, arithmetic overflow         │
//! │  ├── StackError       - Structural layer-graph problems               │
//! │  ├── ValidationError  - Constructor input validation failures          │
//! │  └── EngineError      - Umbrella returned by Stack::process            │
//! │                                                                         │
//! │  Flow: ValidationError → caught at construction time                   │
//! │        StackError      → caught at validate_graph/build time           │
//! │        MoneyError      → configuration bug surfaced during process     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (layer reference, currency, etc.)
//! 3. Errors are enum variants, never String
//! 4. Budget exhaustion and qualification mismatch are NOT errors - an item
//!    simply keeps its price

use thiserror::Error;

use crate::money::Currency;

// =============================================================================
// Money Error
// =============================================================================

/// Monetary arithmetic errors.
///
/// These indicate a caller/configuration bug (mixing currencies in one run,
/// or amounts outside the representable range), never a business-rule
/// outcome. They are fatal to the operation and must not be retried without
/// fixing the input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// Two operands carried different currencies.
    ///
    /// ## When This Occurs
    /// - A basket mixes items priced in different currencies
    /// - A promotion's monetary budget is denominated in a currency other
    ///   than the basket's
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: Currency,
        actual: Currency,
    },

    /// An amount left the representable range of minor units.
    #[error("Monetary amount overflow")]
    Overflow,
}

// =============================================================================
// Stack Error
// =============================================================================

/// Structural layer-graph problems.
///
/// Raised at `validate_graph`/`build` time, never for business-rule reasons.
/// The message wording is part of the contract hosts match on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StackError {
    /// The stack holds no layers at all.
    #[error("Stack must contain at least one layer.")]
    Empty,

    /// A linear stack guarantees a single terminal path, so split routing
    /// is rejected there.
    #[error("LayerOutput::Split is not supported in a linear Stack (layer {layer}).")]
    SplitInLinearStack { layer: String },

    /// A split output points at a handle that no registered layer backs.
    #[error(
        "Split output {role} target of layer {layer} must be one of the layers already added."
    )]
    DanglingSplitTarget { layer: String, role: SplitRole },

    /// A split layer routes exclusively through its two targets; a
    /// pass-through successor edge on top of that is ambiguous.
    #[error("Split layer {layer} cannot also have a pass-through successor.")]
    SplitLayerWithSuccessor { layer: String },

    /// A handle (root or pass-through edge endpoint) does not correspond
    /// to a layer registered in this stack.
    #[error("Layer handle must be one of the layers already added.")]
    UnknownLayerHandle,

    /// Execution is a one-pass traversal; a cycle reachable from the root
    /// would never terminate.
    #[error("Layer graph contains a cycle reachable from the root (via layer {layer}).")]
    CycleDetected { layer: String },
}

/// Which branch of a split output an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRole {
    Participating,
    NonParticipating,
}

impl std::fmt::Display for SplitRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitRole::Participating => write!(f, "participating"),
            SplitRole::NonParticipating => write!(f, "nonParticipating"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when constructor input doesn't meet requirements.
/// Used for early validation before any pricing logic runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Engine Error
// =============================================================================

/// Umbrella error returned by `Stack::process`.
///
/// A `Stack` variant means the graph was never validated and is malformed;
/// a `Money` variant means the promotion configuration or basket violates
/// the single-currency invariant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Stack(#[from] StackError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
