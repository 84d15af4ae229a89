//! Operation pool and readiness tracking.
//!
//! The pool owns every not-yet-placed operation. Readiness is recomputed
//! each round by filtering the remaining pool against the set of placed
//! steps; no dependency graph is persisted. That is O(pool) per round,
//! which is fine at the target scale of hundreds of operations.

use std::collections::HashSet;

use crate::models::{Operation, Product};

/// Key identifying a placed step: (product_id, step_index).
pub type PlacedStep = (String, usize);

/// Owns all unplaced operations, in flattening order.
#[derive(Debug, Clone)]
pub struct OperationPool {
    ops: Vec<Operation>,
}

impl OperationPool {
    /// Flattens every product's route into operations, preserving
    /// product order and step order. Step 0 starts at offset 0; later
    /// steps have their earliest start raised as predecessors are placed.
    pub fn from_products(products: &[Product]) -> Self {
        let mut ops = Vec::new();
        for product in products {
            for (step_index, step) in product.route.iter().enumerate() {
                ops.push(Operation {
                    product_id: product.id.clone(),
                    step_index,
                    name: format!("{}#{}", step.capability, step_index),
                    capability: step.capability.clone(),
                    duration_min: step.duration_min,
                    family: product.family.clone(),
                    due_min: product.due_min,
                    earliest_start_min: 0,
                });
            }
        }
        Self { ops }
    }

    /// Remaining operations, in pool order.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Number of unplaced operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the pool is drained.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Indices of ready operations, in pool order.
    ///
    /// Ready: step 0, or the product's previous step is placed.
    pub fn ready_indices(&self, placed: &HashSet<PlacedStep>) -> Vec<usize> {
        self.ops
            .iter()
            .enumerate()
            .filter(|(_, op)| {
                op.step_index == 0
                    || placed.contains(&(op.product_id.clone(), op.step_index - 1))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Remaining in-pool work for a product from `from_step` on
    /// (minutes). Later steps are always still pooled when `from_step`
    /// is, so this equals the route-tail work.
    pub fn remaining_work_min(&self, product_id: &str, from_step: usize) -> i64 {
        self.ops
            .iter()
            .filter(|op| op.product_id == product_id && op.step_index >= from_step)
            .map(|op| op.duration_min)
            .sum()
    }

    /// Removes and returns the operation at `idx`, preserving the order
    /// of the rest (pool order is the final tie-break key).
    pub fn take(&mut self, idx: usize) -> Operation {
        self.ops.remove(idx)
    }

    /// Raises the earliest start of a product's step to at least
    /// `floor_min`. Called when the predecessor step is placed; a no-op
    /// when the step is not in the pool (last step of a route).
    pub fn raise_earliest_start(&mut self, product_id: &str, step_index: usize, floor_min: i64) {
        if let Some(op) = self
            .ops
            .iter_mut()
            .find(|op| op.product_id == product_id && op.step_index == step_index)
        {
            op.earliest_start_min = op.earliest_start_min.max(floor_min);
        }
    }
}
