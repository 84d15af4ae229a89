//! Operation: the schedulable unit.
//!
//! One operation is one route step of one product, flattened into the
//! pool with enough denormalized context (family, due) to be selected
//! and placed without chasing the product again.
//!
//! `earliest_start_min` is the only mutable field: it starts at 0 for
//! step 0 and is raised to the prior step's end once that step is placed.

use serde::{Deserialize, Serialize};

/// A single schedulable operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Owning product.
    pub product_id: String,
    /// Position in the product's route (0-indexed).
    pub step_index: usize,
    /// Display name for output payloads, derived by the pool.
    pub name: String,
    /// Capability an executing resource must provide.
    pub capability: String,
    /// Processing duration (minutes).
    pub duration_min: i64,
    /// Product family, drives changeover lookups.
    pub family: String,
    /// Product due offset (minutes).
    pub due_min: i64,
    /// Earliest permissible start (minutes). Raised when the
    /// predecessor step is placed.
    pub earliest_start_min: i64,
}

impl Operation {
    /// Slack given the remaining work of this product from this step on.
    ///
    /// Negative slack means the product cannot finish on time even with
    /// uninterrupted processing from its earliest start.
    pub fn slack_min(&self, remaining_work_min: i64) -> i64 {
        self.due_min - self.earliest_start_min - remaining_work_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slack() {
        let op = Operation {
            product_id: "P1".into(),
            step_index: 0,
            name: "fill#0".into(),
            capability: "fill".into(),
            duration_min: 30,
            family: "A".into(),
            due_min: 120,
            earliest_start_min: 20,
        };
        // 120 - 20 - 50 = 50
        assert_eq!(op.slack_min(50), 50);
        // Tight route: negative slack.
        assert_eq!(op.slack_min(150), -50);
    }
}
