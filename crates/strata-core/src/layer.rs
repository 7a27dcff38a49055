//! # Layer
//!
//! One stage of promotion evaluation applied to (a subset of) the basket,
//! with a routing decision for its output.
//!
//! ## Per-Item Selection Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Best Discount Wins, Budgets Can Veto                       │
//! │                                                                         │
//! │  item at current price                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  evaluate every promotion that lists the item as a candidate            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort outcomes: lowest resulting price first,                           │
//! │                 ties by promotion list order                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  try best ──► budget rejects? ──► try next-best ──► ... ──► none left  │
//! │       │                                                        │        │
//! │       ▼                                                        ▼        │
//! │  consume budget, record application              item keeps its price   │
//! │  (participating)                                 (non-participating)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Budgets are consumed immediately, so later items in the same basket see
//! the reduced remaining capacity.

use tracing::debug;

use crate::error::MoneyError;
use crate::money::Money;
use crate::promotion::{DiscountOutcome, Promotion};
use crate::receipt::PromotionApplication;
use crate::types::Item;

// =============================================================================
// Layer Handle
// =============================================================================

/// An opaque reference to a layer registered in a stack.
///
/// Handles index into the stack's layer arena instead of owning the target
/// layer, which keeps routing a plain graph: two split outputs may target
/// the same layer (fan-in) without any shared-ownership gymnastics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub(crate) usize);

impl LayerHandle {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// Layer Output
// =============================================================================

/// Where a layer's items go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOutput {
    /// Forward all items, participating and non-participating alike, to the
    /// successor (or terminate if the layer has none).
    PassThrough,

    /// Forward participating items to one layer and non-participating items
    /// to another; each branch continues independently from there.
    Split {
        participating: LayerHandle,
        non_participating: LayerHandle,
    },
}

impl LayerOutput {
    /// Pass-through routing.
    pub fn pass_through() -> Self {
        LayerOutput::PassThrough
    }

    /// Split routing to two already-registered layers.
    pub fn split(participating: LayerHandle, non_participating: LayerHandle) -> Self {
        LayerOutput::Split {
            participating,
            non_participating,
        }
    }
}

// =============================================================================
// Layer
// =============================================================================

/// A set of promotions applied to a basket subset, plus output routing.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    reference: String,
    output: LayerOutput,
    promotions: Vec<Promotion>,
}

impl Layer {
    /// Creates a layer. Promotion order matters: it is the tie-breaker when
    /// two promotions produce the same resulting price.
    pub fn new(
        reference: impl Into<String>,
        output: LayerOutput,
        promotions: Vec<Promotion>,
    ) -> Self {
        Layer {
            reference: reference.into(),
            output,
            promotions,
        }
    }

    /// The layer's reference token.
    #[inline]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The layer's output routing.
    #[inline]
    pub fn output(&self) -> LayerOutput {
        self.output
    }

    /// The layer's promotions, in tie-break order.
    #[inline]
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }
}

// =============================================================================
// Layer Execution
// =============================================================================

/// What one layer did to its input: new prices for items it discounted,
/// untouched prices for the rest, and the audit records it produced.
///
/// Items are tracked as `(basket index, running price)` pairs so the stack
/// can thread prices through split boundaries without cloning items.
#[derive(Debug)]
pub(crate) struct LayerOutcome {
    pub(crate) participating: Vec<(usize, Money)>,
    pub(crate) non_participating: Vec<(usize, Money)>,
    pub(crate) applications: Vec<PromotionApplication>,
}

impl Layer {
    /// Applies the layer's promotions to `input` (pairs of basket index and
    /// current price, in basket order), consuming budgets as it goes.
    pub(crate) fn apply(
        &mut self,
        basket: &[Item],
        input: &[(usize, Money)],
    ) -> Result<LayerOutcome, MoneyError> {
        debug!(
            layer = %self.reference,
            items = input.len(),
            promotions = self.promotions.len(),
            "applying layer"
        );

        let item_refs: Vec<&Item> = input.iter().map(|&(idx, _)| &basket[idx]).collect();

        // Candidate membership per promotion, computed once over the whole
        // input: positional windows depend on the full sequence, not on the
        // single item under consideration.
        let candidate_sets: Vec<Vec<bool>> = self
            .promotions
            .iter()
            .map(|promotion| {
                let mut members = vec![false; item_refs.len()];
                for local in promotion.candidate_indices(&item_refs) {
                    members[local] = true;
                }
                members
            })
            .collect();

        let mut outcome = LayerOutcome {
            participating: Vec::new(),
            non_participating: Vec::new(),
            applications: Vec::new(),
        };

        for (local, &(basket_idx, price)) in input.iter().enumerate() {
            let item = &basket[basket_idx];

            let mut evaluated: Vec<(usize, DiscountOutcome)> = Vec::new();
            for (promo_idx, promotion) in self.promotions.iter().enumerate() {
                if !candidate_sets[promo_idx][local] {
                    continue;
                }

                if let Some(candidate) = promotion.evaluate(item, price)? {
                    evaluated.push((promo_idx, candidate));
                }
            }

            // Lowest resulting price first; ties go to the earliest-listed
            // promotion.
            evaluated.sort_by(|a, b| {
                a.1.new_price
                    .minor_units()
                    .cmp(&b.1.new_price.minor_units())
                    .then(a.0.cmp(&b.0))
            });

            let mut accepted = None;
            for (promo_idx, candidate) in evaluated {
                let budget = self.promotions[promo_idx].budget_mut();

                if budget.can_redeem(candidate.discount_amount)? {
                    budget.consume(candidate.discount_amount)?;
                    accepted = Some((promo_idx, candidate));
                    break;
                }

                debug!(
                    promotion = %self.promotions[promo_idx].reference(),
                    item = %item.reference,
                    "budget rejected candidate, trying next-best outcome"
                );
            }

            match accepted {
                Some((promo_idx, candidate)) => {
                    outcome.applications.push(PromotionApplication {
                        promotion: self.promotions[promo_idx].reference().to_string(),
                        item: item.clone(),
                        original_price: price,
                        final_price: candidate.new_price,
                    });
                    outcome.participating.push((basket_idx, candidate.new_price));
                }
                None => outcome.non_participating.push((basket_idx, price)),
            }
        }

        Ok(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
