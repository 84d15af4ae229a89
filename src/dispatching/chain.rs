//! Sequential rule chain.
//!
//! Compares operations rule by rule; a later rule is consulted only when
//! every earlier rule ties (within epsilon). Ties after the whole chain
//! keep the earlier pool position, so selection is stable and
//! deterministic.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule, SelectionContext};
use crate::models::Operation;

/// A fixed, ordered chain of dispatching rules.
#[derive(Clone)]
pub struct RuleChain {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleChain {
    /// Creates an empty chain. With no rules every comparison ties and
    /// selection degenerates to pool order.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// The engine's chain: EDD, then minimum slack, then SPT.
    pub fn tardiness_default() -> Self {
        Self::new()
            .with_rule(rules::Edd)
            .with_rule(rules::MinSlack)
            .with_rule(rules::Spt)
    }

    /// Appends a rule to the chain.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Compares two operations through the chain.
    pub fn compare(&self, a: &Operation, b: &Operation, context: &SelectionContext) -> Ordering {
        for rule in &self.rules {
            let sa = rule.evaluate(a, context);
            let sb = rule.evaluate(b, context);
            if (sa - sb).abs() > self.epsilon {
                return sa.partial_cmp(&sb).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }

    /// Selects exactly one operation from the ready subset.
    ///
    /// `ready` holds indices into `pool`, in pool order. The first index
    /// wins any full-chain tie, which pins the deterministic output for
    /// identical input.
    ///
    /// Returns `None` only for an empty ready set; the caller treats that
    /// as a precedence deadlock when the pool is non-empty.
    pub fn select(
        &self,
        pool: &[Operation],
        ready: &[usize],
        context: &SelectionContext,
    ) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &idx in ready {
            match best {
                None => best = Some(idx),
                Some(current) => {
                    if self.compare(&pool[idx], &pool[current], context) == Ordering::Less {
                        best = Some(idx);
                    }
                }
            }
        }
        best
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::tardiness_default()
    }
}
