//! Dispatching rules and the selection chain.
//!
//! The priority selector picks exactly one ready operation per round. It
//! is built from composable [`DispatchingRule`]s evaluated sequentially:
//! the next rule in the chain only matters when all earlier rules tie.
//! Ties surviving the whole chain fall back to pool order, which makes
//! selection fully deterministic for identical input.
//!
//! The engine wires the fixed chain EDD, then minimum slack, then
//! shortest duration via [`RuleChain::tardiness_default`].
//!
//! # Score Convention
//! **Lower score = higher priority.** Rules return smaller values for
//! operations that should be placed first.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod chain;
pub mod rules;

pub use chain::RuleChain;

use crate::models::Operation;
use std::collections::HashMap;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
pub type RuleScore = f64;

/// Per-round state the rules may consult.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    /// Remaining processing work per product (product_id -> minutes),
    /// counted from each product's current pending step to route end.
    pub remaining_work: HashMap<String, i64>,
}

impl SelectionContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remaining work for a product.
    pub fn with_remaining_work(mut self, product_id: impl Into<String>, minutes: i64) -> Self {
        self.remaining_work.insert(product_id.into(), minutes);
        self
    }

    /// Remaining work for a product, falling back to the operation's own
    /// duration when the product is unknown.
    pub fn remaining_for(&self, op: &Operation) -> i64 {
        self.remaining_work
            .get(&op.product_id)
            .copied()
            .unwrap_or(op.duration_min)
    }
}

/// A dispatching rule that scores operation urgency.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g. "EDD", "SPT").
    fn name(&self) -> &'static str;

    /// Evaluates an operation; lower = place first.
    fn evaluate(&self, op: &Operation, context: &SelectionContext) -> RuleScore;
}
