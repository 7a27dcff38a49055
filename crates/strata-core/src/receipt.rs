//! # Receipt
//!
//! The immutable result of running a basket through a stack, with a full
//! audit trail of which promotion affected which item and by how much.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Item;

// =============================================================================
// Promotion Application
// =============================================================================

/// One audit record: a single promotion discounting a single item.
///
/// `original_price` is the item's price when its layer started (which may
/// already include earlier layers' discounts); `final_price` is the price
/// the layer left it at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PromotionApplication {
    /// Reference token of the promotion that was applied.
    pub promotion: String,

    /// Snapshot of the discounted item.
    pub item: Item,

    /// Price entering the layer.
    pub original_price: Money,

    /// Price leaving the layer.
    pub final_price: Money,
}

impl PromotionApplication {
    /// The discount this application granted.
    pub fn discount_amount(&self) -> Money {
        // original >= final within one layer, and both share a currency,
        // so the subtraction cannot fail; fall back to the delta of zero.
        self.original_price
            .sub_clamped(self.final_price)
            .unwrap_or_else(|_| Money::zero(self.original_price.currency()))
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// The priced outcome of one `process` call.
///
/// Produced once per call and owned by the caller; the engine keeps no
/// reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    /// Sum of original item prices, before any layer ran.
    pub subtotal: Money,

    /// Sum of final item prices, after all reachable layers acted.
    pub total: Money,

    /// Items whose final price equals their original price, in basket
    /// order.
    pub full_price_items: Vec<Item>,

    /// Every accepted discount, in the order layers executed and items
    /// were processed within each layer.
    pub promotion_applications: Vec<PromotionApplication>,

    /// When this receipt was produced.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// The total discount granted across all layers.
    pub fn total_discount(&self) -> Money {
        self.subtotal
            .sub_clamped(self.total)
            .unwrap_or_else(|_| Money::zero(self.subtotal.currency()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn gbp(minor: i64) -> Money {
        Money::from_minor(minor, Currency::GBP)
    }

    #[test]
    fn test_application_discount_amount() {
        let application = PromotionApplication {
            promotion: "promo".to_string(),
            item: Item::new("a", "A", gbp(300), []),
            original_price: gbp(300),
            final_price: gbp(270),
        };

        assert_eq!(application.discount_amount(), gbp(30));
    }

    #[test]
    fn test_receipt_total_discount() {
        let receipt = Receipt {
            subtotal: gbp(1500),
            total: gbp(1200),
            full_price_items: vec![],
            promotion_applications: vec![],
            created_at: Utc::now(),
        };

        assert_eq!(receipt.total_discount(), gbp(300));
    }

    #[test]
    fn test_receipt_serializes_for_hosts() {
        let receipt = Receipt {
            subtotal: gbp(300),
            total: gbp(270),
            full_price_items: vec![],
            promotion_applications: vec![PromotionApplication {
                promotion: "promo".to_string(),
                item: Item::new("a", "A", gbp(300), []),
                original_price: gbp(300),
                final_price: gbp(270),
            }],
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&receipt).unwrap();
        let back: Receipt = serde_json::from_str(&json).unwrap();

        assert_eq!(back, receipt);
    }
}
