//! # Promotion
//!
//! A named discount rule: eligibility (qualification), price transformation
//! (discount), consumption cap (budget), and a variant-specific selection
//! strategy deciding which basket items are candidates at all.
//!
//! ## Candidate Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Candidate Selection                                │
//! │                                                                         │
//! │  Direct:       every qualifying item, in basket order                  │
//! │                                                                         │
//! │  Positional:   basket split into consecutive windows of `size`;        │
//! │                offsets count BACKWARD from the window end              │
//! │                                                                         │
//! │     size = 3, positions = {2}                                          │
//! │     ┌──────┬──────┬──────┐  ┌──────┬──────┐                            │
//! │     │ p=2  │ p=1  │ p=0  │  │ p=1  │ p=0  │   (trailing partial       │
//! │     │  ★   │      │      │  │      │      │    window, as-is)          │
//! │     └──────┴──────┴──────┘  └──────┴──────┘                            │
//! │                                                                         │
//! │  Position 0 is the LAST item of a window; in a full window position    │
//! │  p selects forward index size - 1 - p.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use crate::budget::Budget;
use crate::discount::Discount;
use crate::error::{MoneyError, ValidationResult};
use crate::money::Money;
use crate::qualification::Qualification;
use crate::types::Item;
use crate::validation::{validate_positions, validate_window_size};

// =============================================================================
// Discount Outcome
// =============================================================================

/// The result of evaluating a promotion against one item at one price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountOutcome {
    /// The price after the discount.
    pub new_price: Money,

    /// How much was taken off (`price - new_price`, never negative).
    pub discount_amount: Money,
}

// =============================================================================
// Promotion
// =============================================================================

/// Variant-specific candidate-selection data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionKind {
    /// Every qualifying item is an independent discount candidate.
    Direct,

    /// Qualifying items at fixed offsets within consecutive windows.
    Positional {
        /// Window length (> 0).
        size: usize,

        /// Zero-based offsets counted backward from the window end.
        positions: BTreeSet<usize>,
    },
}

/// A named discount rule.
///
/// Immutable after construction except for its [`Budget`], which the layer
/// algorithm consumes as redemptions are accepted. A promotion shared
/// between baskets keeps its consumed state; callers wanting per-basket
/// isolation construct fresh promotions.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    reference: String,
    qualification: Qualification,
    discount: Discount,
    budget: Budget,
    kind: PromotionKind,
}

impl Promotion {
    /// Creates a direct discount promotion: every qualifying item is a
    /// candidate.
    pub fn direct(
        reference: impl Into<String>,
        qualification: Qualification,
        discount: Discount,
        budget: Budget,
    ) -> Self {
        Promotion {
            reference: reference.into(),
            qualification,
            discount,
            budget,
            kind: PromotionKind::Direct,
        }
    }

    /// Creates a positional discount promotion: qualifying items at the
    /// given offsets within consecutive windows of `size` items.
    ///
    /// ## Errors
    /// Rejects a zero window size, an empty offset set, and offsets past
    /// the window (`>= size`), none of which could ever select an item.
    pub fn positional(
        reference: impl Into<String>,
        size: usize,
        positions: impl IntoIterator<Item = usize>,
        qualification: Qualification,
        discount: Discount,
        budget: Budget,
    ) -> ValidationResult<Self> {
        let positions: BTreeSet<usize> = positions.into_iter().collect();

        validate_window_size(size)?;
        validate_positions(size, &positions)?;

        Ok(Promotion {
            reference: reference.into(),
            qualification,
            discount,
            budget,
            kind: PromotionKind::Positional { size, positions },
        })
    }

    /// The promotion's reference token, echoed into the audit trail.
    #[inline]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The eligibility predicate.
    #[inline]
    pub fn qualification(&self) -> &Qualification {
        &self.qualification
    }

    /// The price transformation.
    #[inline]
    pub fn discount(&self) -> &Discount {
        &self.discount
    }

    /// The consumption budget (read-only view).
    #[inline]
    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    #[inline]
    pub(crate) fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }

    /// The variant-specific selection data.
    #[inline]
    pub fn kind(&self) -> &PromotionKind {
        &self.kind
    }

    /// The subset of `items` this promotion is structurally eligible to
    /// discount, in basket order.
    pub fn candidates<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        let refs: Vec<&Item> = items.iter().collect();

        self.candidate_indices(&refs)
            .into_iter()
            .map(|idx| &items[idx])
            .collect()
    }

    /// Candidate positions within `items`, ascending.
    pub(crate) fn candidate_indices(&self, items: &[&Item]) -> Vec<usize> {
        match &self.kind {
            PromotionKind::Direct => items
                .iter()
                .enumerate()
                .filter(|(_, item)| self.qualification.matches(item))
                .map(|(idx, _)| idx)
                .collect(),

            PromotionKind::Positional { size, positions } => {
                let mut indices = Vec::new();

                for (window_idx, window) in items.chunks(*size).enumerate() {
                    for &position in positions {
                        // Offsets count backward from the window end; a
                        // partial window counts from its actual end.
                        if position >= window.len() {
                            continue;
                        }

                        let idx = window_idx * size + (window.len() - 1 - position);
                        if self.qualification.matches(items[idx]) {
                            indices.push(idx);
                        }
                    }
                }

                indices.sort_unstable();
                indices
            }
        }
    }

    /// Applies qualification then discount to an item at its current
    /// running price. Returns `None` when the item is unqualified - not an
    /// error, the item simply keeps its price.
    pub fn evaluate(
        &self,
        item: &Item,
        price: Money,
    ) -> Result<Option<DiscountOutcome>, MoneyError> {
        if !self.qualification.matches(item) {
            return Ok(None);
        }

        let new_price = self.discount.apply(price)?;
        let discount_amount = price.checked_sub(new_price)?;

        Ok(Some(DiscountOutcome {
            new_price,
            discount_amount,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use crate::types::Percentage;

    fn gbp(minor: i64) -> Money {
        Money::from_minor(minor, Currency::GBP)
    }

    fn item(reference: &str, minor: i64, tags: &[&str]) -> Item {
        Item::new(
            reference,
            reference.to_uppercase(),
            gbp(minor),
            tags.iter().map(|t| t.to_string()),
        )
    }

    fn ten_percent_off() -> Discount {
        Discount::percentage_off(Percentage::from_decimal(0.1).unwrap())
    }

    #[test]
    fn test_direct_candidates_follow_basket_order() {
        let promotion = Promotion::direct(
            "promo",
            Qualification::match_any(["food".to_string()]),
            ten_percent_off(),
            Budget::unlimited(),
        );

        let items = [
            item("a", 100, &["food"]),
            item("b", 200, &["drink"]),
            item("c", 300, &["food"]),
        ];

        let candidates = promotion.candidates(&items);
        let references: Vec<&str> = candidates.iter().map(|i| i.reference.as_str()).collect();

        assert_eq!(references, vec!["a", "c"]);
    }

    #[test]
    fn test_positional_full_window_counts_from_window_end() {
        // size 3, position 2 => forward index 0 of each full window.
        let promotion = Promotion::positional(
            "promo",
            3,
            [2],
            Qualification::match_all(),
            ten_percent_off(),
            Budget::unlimited(),
        )
        .unwrap();

        let items = [
            item("a", 300, &[]),
            item("b", 700, &[]),
            item("c", 500, &[]),
        ];

        let candidates = promotion.candidates(&items);
        let references: Vec<&str> = candidates.iter().map(|i| i.reference.as_str()).collect();

        assert_eq!(references, vec!["a"]);
    }

    #[test]
    fn test_positional_position_zero_is_last_of_window() {
        let promotion = Promotion::positional(
            "promo",
            3,
            [0],
            Qualification::match_all(),
            ten_percent_off(),
            Budget::unlimited(),
        )
        .unwrap();

        let items = [
            item("a", 100, &[]),
            item("b", 200, &[]),
            item("c", 300, &[]),
            item("d", 400, &[]),
            item("e", 500, &[]),
            item("f", 600, &[]),
        ];

        let candidates = promotion.candidates(&items);
        let references: Vec<&str> = candidates.iter().map(|i| i.reference.as_str()).collect();

        assert_eq!(references, vec!["c", "f"]);
    }

    #[test]
    fn test_positional_partial_window_counts_from_its_actual_end() {
        let promotion = Promotion::positional(
            "promo",
            3,
            [0, 2],
            Qualification::match_all(),
            ten_percent_off(),
            Budget::unlimited(),
        )
        .unwrap();

        // One full window [a b c] and a partial [d e].
        let items = [
            item("a", 100, &[]),
            item("b", 200, &[]),
            item("c", 300, &[]),
            item("d", 400, &[]),
            item("e", 500, &[]),
        ];

        let candidates = promotion.candidates(&items);
        let references: Vec<&str> = candidates.iter().map(|i| i.reference.as_str()).collect();

        // Full window: position 0 => c, position 2 => a.
        // Partial window of length 2: position 0 => e, position 2 absent.
        assert_eq!(references, vec!["a", "c", "e"]);
    }

    #[test]
    fn test_positional_candidates_still_require_qualification() {
        let promotion = Promotion::positional(
            "promo",
            2,
            [0],
            Qualification::match_any(["food".to_string()]),
            ten_percent_off(),
            Budget::unlimited(),
        )
        .unwrap();

        let items = [
            item("a", 100, &[]),
            item("b", 200, &["food"]),
            item("c", 300, &[]),
            item("d", 400, &[]),
        ];

        let candidates = promotion.candidates(&items);
        let references: Vec<&str> = candidates.iter().map(|i| i.reference.as_str()).collect();

        // Window [a b]: position 0 is b (qualified). Window [c d]:
        // position 0 is d (unqualified, dropped).
        assert_eq!(references, vec!["b"]);
    }

    #[test]
    fn test_positional_constructor_rejects_bad_geometry() {
        let qualification = Qualification::match_all();

        assert!(Promotion::positional(
            "promo",
            0,
            [0],
            qualification.clone(),
            ten_percent_off(),
            Budget::unlimited(),
        )
        .is_err());

        assert!(Promotion::positional(
            "promo",
            3,
            Vec::<usize>::new(),
            qualification.clone(),
            ten_percent_off(),
            Budget::unlimited(),
        )
        .is_err());

        assert!(Promotion::positional(
            "promo",
            3,
            [3],
            qualification,
            ten_percent_off(),
            Budget::unlimited(),
        )
        .is_err());
    }

    #[test]
    fn test_evaluate_applies_qualification_then_discount() {
        let promotion = Promotion::direct(
            "promo",
            Qualification::match_any(["food".to_string()]),
            ten_percent_off(),
            Budget::unlimited(),
        );

        let qualified = item("a", 300, &["food"]);
        let outcome = promotion.evaluate(&qualified, qualified.price).unwrap();
        assert_eq!(
            outcome,
            Some(DiscountOutcome {
                new_price: gbp(270),
                discount_amount: gbp(30),
            })
        );

        let unqualified = item("b", 300, &["drink"]);
        assert_eq!(
            promotion.evaluate(&unqualified, unqualified.price).unwrap(),
            None
        );
    }

    #[test]
    fn test_evaluate_uses_the_running_price_not_the_shelf_price() {
        let promotion = Promotion::direct(
            "promo",
            Qualification::match_all(),
            ten_percent_off(),
            Budget::unlimited(),
        );

        // A previous layer already knocked the item down to 200.
        let shelf = item("a", 300, &[]);
        let outcome = promotion.evaluate(&shelf, gbp(200)).unwrap().unwrap();

        assert_eq!(outcome.new_price, gbp(180));
        assert_eq!(outcome.discount_amount, gbp(20));
    }
}
