//! # Qualification
//!
//! The eligibility predicate for a promotion, based on item tags.

use std::collections::BTreeSet;

use crate::types::Item;

/// Decides whether an item is eligible for a promotion.
///
/// A closed set of variants matched exhaustively at the single call site
/// ([`Qualification::matches`]); adding a variant is a compile-checked
/// change, not a new subclass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualification {
    /// Accepts every item. Used both for "applies to everything" and as the
    /// universal fallback (e.g., a staff discount).
    MatchAll,

    /// Accepts an item whose tag set intersects the given tags.
    MatchAny { tags: BTreeSet<String> },
}

impl Qualification {
    /// A qualification that accepts every item.
    pub fn match_all() -> Self {
        Qualification::MatchAll
    }

    /// A qualification that accepts items carrying at least one of `tags`.
    pub fn match_any(tags: impl IntoIterator<Item = String>) -> Self {
        Qualification::MatchAny {
            tags: tags.into_iter().collect(),
        }
    }

    /// Tests an item. No side effects.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::money::{Currency, Money};
    /// use strata_core::qualification::Qualification;
    /// use strata_core::types::Item;
    ///
    /// let sandwich = Item::new(
    ///     "item-1",
    ///     "Sandwich",
    ///     Money::from_minor(350, Currency::GBP),
    ///     ["food".to_string()],
    /// );
    ///
    /// assert!(Qualification::match_all().matches(&sandwich));
    /// assert!(Qualification::match_any(["food".to_string()]).matches(&sandwich));
    /// assert!(!Qualification::match_any(["drink".to_string()]).matches(&sandwich));
    /// ```
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Qualification::MatchAll => true,
            Qualification::MatchAny { tags } => !tags.is_disjoint(&item.tags),
        }
    }
}
