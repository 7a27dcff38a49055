//! # Stack
//!
//! The validated graph of layers defining the full pricing policy, and the
//! engine that drives a basket through it.
//!
//! ## Construction Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Two Ways to Build a Stack                           │
//! │                                                                         │
//! │  Linear (Stack::linear):                                                │
//! │    [layer 0] ──► [layer 1] ──► [layer 2]        root = first layer,    │
//! │                                                  Split forbidden        │
//! │                                                                         │
//! │  Graph (StackBuilder):                                                  │
//! │                   ┌──► [participating terminal]                         │
//! │    [root: split] ─┤                                                     │
//! │                   └──► [staff discount] ──► [loyalty]                   │
//! │                                                                         │
//! │    add_layer() hands out handles; Split outputs and                     │
//! │    connect_pass_through() edges reference those handles.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Execution Model
//! Layers form an arena indexed by [`LayerHandle`]; routing stores handles,
//! never owning references, so diamonds and fan-in are plain data. After
//! validation (acyclic, targets in range) the basket is threaded through a
//! deterministic topological traversal: a layer runs once all its inputs
//! have arrived, lowest handle first among the ready.

use chrono::Utc;
use tracing::debug;

use crate::error::{EngineResult, SplitRole, StackError};
use crate::layer::{Layer, LayerHandle, LayerOutput};
use crate::money::Money;
use crate::receipt::Receipt;
use crate::types::{total_price, Item};
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Stack
// =============================================================================

/// How the stack was constructed; linear mode carries extra guarantees
/// (single terminal path) that validation enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstructionMode {
    Linear,
    Graph,
}

/// The full set of layers plus one designated root.
///
/// Read-only during processing except for the budgets reachable through its
/// promotions; `process` therefore takes `&mut self`, which also rules out
/// two concurrent runs sharing one set of budgets. Callers wanting parallel
/// evaluation against the same configuration clone the stack - budgets are
/// cloned with it.
#[derive(Debug, Clone)]
pub struct Stack {
    layers: Vec<Layer>,
    /// Pass-through successor per layer; `None` means terminal.
    pass_through_edges: Vec<Option<LayerHandle>>,
    root: Option<LayerHandle>,
    mode: ConstructionMode,
}

impl Stack {
    /// Creates a linear stack: layers run in sequence, the first layer is
    /// the root, and `Split` output is forbidden (validation enforces it).
    pub fn linear(layers: Vec<Layer>) -> Self {
        let count = layers.len();
        let pass_through_edges = (0..count)
            .map(|idx| {
                if idx + 1 < count {
                    Some(LayerHandle(idx + 1))
                } else {
                    None
                }
            })
            .collect();

        Stack {
            layers,
            pass_through_edges,
            root: if count == 0 { None } else { Some(LayerHandle(0)) },
            mode: ConstructionMode::Linear,
        }
    }

    /// Starts a graph-mode builder.
    pub fn builder() -> StackBuilder {
        StackBuilder::new()
    }

    /// The stack's layers, in registration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Checks every structural invariant of the layer graph.
    ///
    /// ## Checked Invariants
    /// - at least one layer
    /// - linear mode: no `Split` outputs
    /// - graph mode: split targets are registered layers, and a split layer
    ///   has no pass-through successor on top of its two targets
    /// - no cycle reachable from the root
    ///
    /// ## Errors
    /// [`StackError`] naming the violated invariant. Validation is
    /// all-or-nothing; there is no partial result.
    pub fn validate_graph(&self) -> Result<(), StackError> {
        if self.layers.is_empty() {
            return Err(StackError::Empty);
        }

        match self.mode {
            ConstructionMode::Linear => {
                for layer in &self.layers {
                    if matches!(layer.output(), LayerOutput::Split { .. }) {
                        return Err(StackError::SplitInLinearStack {
                            layer: layer.reference().to_string(),
                        });
                    }
                }
            }
            ConstructionMode::Graph => {
                for (idx, layer) in self.layers.iter().enumerate() {
                    let LayerOutput::Split {
                        participating,
                        non_participating,
                    } = layer.output()
                    else {
                        continue;
                    };

                    if participating.index() >= self.layers.len() {
                        return Err(StackError::DanglingSplitTarget {
                            layer: layer.reference().to_string(),
                            role: SplitRole::Participating,
                        });
                    }

                    if non_participating.index() >= self.layers.len() {
                        return Err(StackError::DanglingSplitTarget {
                            layer: layer.reference().to_string(),
                            role: SplitRole::NonParticipating,
                        });
                    }

                    if self.pass_through_edges[idx].is_some() {
                        return Err(StackError::SplitLayerWithSuccessor {
                            layer: layer.reference().to_string(),
                        });
                    }
                }
            }
        }

        let root = self.root.ok_or(StackError::Empty)?;
        self.execution_order(root).map(|_| ())
    }

    /// Runs the basket through the layer graph and produces a receipt.
    ///
    /// Structure is validated up front, so a malformed stack fails with the
    /// same typed error `validate_graph` would give - business-rule
    /// outcomes (budget exhaustion, unqualified items) never error.
    ///
    /// ## Example
    /// ```rust
    /// use strata_core::budget::Budget;
    /// use strata_core::discount::Discount;
    /// use strata_core::layer::{Layer, LayerOutput};
    /// use strata_core::money::{Currency, Money};
    /// use strata_core::promotion::Promotion;
    /// use strata_core::qualification::Qualification;
    /// use strata_core::stack::Stack;
    /// use strata_core::types::{Item, Percentage};
    ///
    /// let promotion = Promotion::direct(
    ///     "ten-percent",
    ///     Qualification::match_all(),
    ///     Discount::percentage_off(Percentage::from_decimal(0.1).unwrap()),
    ///     Budget::unlimited(),
    /// );
    ///
    /// let mut stack = Stack::linear(vec![Layer::new(
    ///     "layer-1",
    ///     LayerOutput::pass_through(),
    ///     vec![promotion],
    /// )]);
    ///
    /// let basket = [Item::new(
    ///     "item-1",
    ///     "Espresso",
    ///     Money::from_minor(300, Currency::GBP),
    ///     [],
    /// )];
    ///
    /// let receipt = stack.process(&basket).unwrap();
    /// assert_eq!(receipt.subtotal.minor_units(), 300);
    /// assert_eq!(receipt.total.minor_units(), 270);
    /// ```
    pub fn process(&mut self, items: &[Item]) -> EngineResult<Receipt> {
        self.validate_graph()?;
        let root = self.root.ok_or(StackError::Empty)?;

        debug!(
            items = items.len(),
            layers = self.layers.len(),
            "processing basket"
        );

        let subtotal = total_price(items)?;
        let order = self.execution_order(root)?;

        // Per-layer accumulated input: (basket index, running price).
        let mut inbox: Vec<Vec<(usize, Money)>> = vec![Vec::new(); self.layers.len()];
        inbox[root.index()] = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (idx, item.price))
            .collect();

        let mut final_prices: Vec<Money> = items.iter().map(|item| item.price).collect();
        let mut applications = Vec::new();

        for handle in order {
            let idx = handle.index();

            let mut input = std::mem::take(&mut inbox[idx]);
            if input.is_empty() {
                continue;
            }

            // Fan-in can interleave arrivals; layers always see basket order.
            input.sort_unstable_by_key(|&(basket_idx, _)| basket_idx);

            let outcome = self.layers[idx].apply(items, &input)?;
            applications.extend(outcome.applications);

            match self.layers[idx].output() {
                LayerOutput::PassThrough => match self.pass_through_edges[idx] {
                    Some(next) => {
                        inbox[next.index()].extend(outcome.participating);
                        inbox[next.index()].extend(outcome.non_participating);
                    }
                    None => {
                        // Terminal: prices are final for every item here.
                        for (basket_idx, price) in outcome
                            .participating
                            .into_iter()
                            .chain(outcome.non_participating)
                        {
                            final_prices[basket_idx] = price;
                        }
                    }
                },
                LayerOutput::Split {
                    participating,
                    non_participating,
                } => {
                    inbox[participating.index()].extend(outcome.participating);
                    inbox[non_participating.index()].extend(outcome.non_participating);
                }
            }
        }

        let total = match final_prices.split_first() {
            None => Money::zero(DEFAULT_CURRENCY),
            Some((first, rest)) => rest
                .iter()
                .try_fold(*first, |acc, price| acc.checked_add(*price))?,
        };

        let full_price_items = items
            .iter()
            .enumerate()
            .filter(|&(idx, item)| final_prices[idx] == item.price)
            .map(|(_, item)| item.clone())
            .collect();

        debug!(
            subtotal = %subtotal,
            total = %total,
            applications = applications.len(),
            "basket processed"
        );

        Ok(Receipt {
            subtotal,
            total,
            full_price_items,
            promotion_applications: applications,
            created_at: Utc::now(),
        })
    }

    /// Deterministic topological order of the layers reachable from `root`.
    ///
    /// Doubles as the cycle check: if some reachable layer never becomes
    /// ready, a cycle is keeping its in-degree positive.
    fn execution_order(&self, root: LayerHandle) -> Result<Vec<LayerHandle>, StackError> {
        let count = self.layers.len();
        if root.index() >= count {
            return Err(StackError::UnknownLayerHandle);
        }

        let successors = |idx: usize| -> Vec<usize> {
            match self.layers[idx].output() {
                LayerOutput::Split {
                    participating,
                    non_participating,
                } => vec![participating.index(), non_participating.index()],
                LayerOutput::PassThrough => self.pass_through_edges[idx]
                    .map(|next| vec![next.index()])
                    .unwrap_or_default(),
            }
        };

        let mut reachable = vec![false; count];
        let mut pending = vec![root.index()];
        while let Some(idx) = pending.pop() {
            if reachable[idx] {
                continue;
            }
            reachable[idx] = true;
            pending.extend(successors(idx));
        }

        let mut indegree = vec![0usize; count];
        for idx in 0..count {
            if !reachable[idx] {
                continue;
            }
            for successor in successors(idx) {
                indegree[successor] += 1;
            }
        }

        // Lowest handle first among the ready keeps execution order (and
        // therefore the audit trail) reproducible run over run.
        let mut ready: std::collections::BTreeSet<usize> = (0..count)
            .filter(|&idx| reachable[idx] && indegree[idx] == 0)
            .collect();
        let mut order = Vec::new();
        let mut placed = vec![false; count];

        while let Some(idx) = ready.pop_first() {
            placed[idx] = true;
            order.push(LayerHandle(idx));

            for successor in successors(idx) {
                indegree[successor] -= 1;
                if indegree[successor] == 0 {
                    ready.insert(successor);
                }
            }
        }

        let reachable_count = reachable.iter().filter(|&&r| r).count();
        if order.len() < reachable_count {
            let culprit = (0..count)
                .find(|&idx| reachable[idx] && !placed[idx])
                .map(|idx| self.layers[idx].reference().to_string())
                .unwrap_or_default();

            return Err(StackError::CycleDetected { layer: culprit });
        }

        Ok(order)
    }
}

// =============================================================================
// Stack Builder
// =============================================================================

/// Graph-mode stack construction.
///
/// `add_layer` registers a layer and returns the handle later `Split`
/// outputs (and `set_root`/`connect_pass_through`) refer to, which is why
/// split targets are always added before the layer that splits to them.
#[derive(Debug, Default)]
pub struct StackBuilder {
    layers: Vec<Layer>,
    edges: Vec<Option<LayerHandle>>,
    root: Option<LayerHandle>,
}

impl StackBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        StackBuilder::default()
    }

    /// Registers a layer and returns its handle.
    pub fn add_layer(&mut self, layer: Layer) -> LayerHandle {
        let handle = LayerHandle(self.layers.len());
        self.layers.push(layer);
        self.edges.push(None);
        handle
    }

    /// Designates the entry point. Without this, the first layer added is
    /// the root.
    pub fn set_root(&mut self, root: LayerHandle) {
        self.root = Some(root);
    }

    /// Adds a pass-through edge: after `from` runs, all its items continue
    /// at `to`. Calling again for the same `from` replaces the edge.
    ///
    /// ## Errors
    /// Rejects handles not registered in this builder, and a `from` layer
    /// with split output (its routing is already fully determined).
    pub fn connect_pass_through(
        &mut self,
        from: LayerHandle,
        to: LayerHandle,
    ) -> Result<(), StackError> {
        if from.index() >= self.layers.len() || to.index() >= self.layers.len() {
            return Err(StackError::UnknownLayerHandle);
        }

        if matches!(self.layers[from.index()].output(), LayerOutput::Split { .. }) {
            return Err(StackError::SplitLayerWithSuccessor {
                layer: self.layers[from.index()].reference().to_string(),
            });
        }

        self.edges[from.index()] = Some(to);
        Ok(())
    }

    /// Finalizes and validates the stack.
    pub fn build(self) -> Result<Stack, StackError> {
        let root = self.root.or_else(|| {
            if self.layers.is_empty() {
                None
            } else {
                Some(LayerHandle(0))
            }
        });

        let stack = Stack {
            layers: self.layers,
            pass_through_edges: self.edges,
            root,
            mode: ConstructionMode::Graph,
        };

        stack.validate_graph()?;
        Ok(stack)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
