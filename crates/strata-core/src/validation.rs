//! # Validation Module
//!
//! Input validation for promotion configuration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Constructors (this module)                                   │
//! │  ├── Currency codes, percentage range, window geometry                 │
//! │  └── Rejected before any promotion object exists                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stack::validate_graph                                        │
//! │  ├── Empty stack, split targets, cycles                                │
//! │  └── Rejected before any basket is processed                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Money arithmetic during process                              │
//! │  └── Currency mismatches surface as typed errors, never coercion       │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Currency Validators
// =============================================================================

/// Validates a currency code.
///
/// ## Rules
/// - Exactly three characters
/// - ASCII uppercase letters only (ISO 4217 style)
///
/// ## Example
/// ```rust
/// use strata_core::validation::validate_currency_code;
///
/// assert!(validate_currency_code("GBP").is_ok());
/// assert!(validate_currency_code("gbp").is_err());
/// assert!(validate_currency_code("").is_err());
/// ```
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency code".to_string(),
        });
    }

    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency code".to_string(),
            reason: "must be three uppercase ASCII letters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Percentage Validators
// =============================================================================

/// Validates a decimal percentage ratio.
///
/// ## Rules
/// - Must be finite
/// - Must lie in `[0, 1]` (0% to 100%)
pub fn validate_percentage_decimal(ratio: f64) -> ValidationResult<()> {
    if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
        return Err(ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0,
            max: 1,
        });
    }

    Ok(())
}

// =============================================================================
// Window Validators
// =============================================================================

/// Validates a positional promotion's window size.
///
/// ## Rules
/// - Must be positive (a zero-length window matches nothing and is a
///   configuration mistake, not a no-op)
pub fn validate_window_size(size: usize) -> ValidationResult<()> {
    if size == 0 {
        return Err(ValidationError::MustBePositive {
            field: "size".to_string(),
        });
    }

    Ok(())
}

/// Validates a positional promotion's offset set against its window size.
///
/// ## Rules
/// - At least one position
/// - Every position must be a valid offset within a window (`< size`);
///   an offset past the window could never select an item
pub fn validate_positions(size: usize, positions: &BTreeSet<usize>) -> ValidationResult<()> {
    if positions.is_empty() {
        return Err(ValidationError::Required {
            field: "positions".to_string(),
        });
    }

    if positions.iter().any(|&p| p >= size) {
        return Err(ValidationError::OutOfRange {
            field: "positions".to_string(),
            min: 0,
            max: size.saturating_sub(1) as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("GBP").is_ok());
        assert!(validate_currency_code("USD").is_ok());

        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("GB").is_err());
        assert!(validate_currency_code("GBPX").is_err());
        assert!(validate_currency_code("gbp").is_err());
        assert!(validate_currency_code("G8P").is_err());
    }

    #[test]
    fn test_validate_percentage_decimal() {
        assert!(validate_percentage_decimal(0.0).is_ok());
        assert!(validate_percentage_decimal(0.5).is_ok());
        assert!(validate_percentage_decimal(1.0).is_ok());

        assert!(validate_percentage_decimal(-0.01).is_err());
        assert!(validate_percentage_decimal(1.01).is_err());
        assert!(validate_percentage_decimal(f64::INFINITY).is_err());
        assert!(validate_percentage_decimal(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_window_size() {
        assert!(validate_window_size(1).is_ok());
        assert!(validate_window_size(3).is_ok());
        assert!(validate_window_size(0).is_err());
    }

    #[test]
    fn test_validate_positions() {
        let positions: BTreeSet<usize> = [0, 2].into_iter().collect();
        assert!(validate_positions(3, &positions).is_ok());

        let empty = BTreeSet::new();
        assert!(validate_positions(3, &empty).is_err());

        let past_window: BTreeSet<usize> = [3].into_iter().collect();
        assert!(validate_positions(3, &past_window).is_err());
    }
}
