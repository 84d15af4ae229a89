//! Schedule (solution) model.
//!
//! The schedule is the growing set of assignments produced by one run.
//! Assignments are immutable once created; all per-resource ordering
//! lives in the engine's run state, this type only answers queries.

use serde::{Deserialize, Serialize};

/// An operation-resource-time assignment.
///
/// `end_min = start_min + duration`; the changeover preceding an
/// assignment occupies the gap before `start_min` and is not part of the
/// interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Owning product.
    pub product_id: String,
    /// Route position of the placed operation.
    pub step_index: usize,
    /// Product family at placement time.
    pub family: String,
    /// Operation display name.
    pub operation: String,
    /// Executing resource.
    pub resource_id: String,
    /// Start offset (minutes, inclusive).
    pub start_min: i64,
    /// End offset (minutes, exclusive).
    pub end_min: i64,
}

impl Assignment {
    /// Processing duration (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }
}

/// A complete or in-progress schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// All assignments, in placement order.
    pub assignments: Vec<Assignment>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an assignment.
    pub fn add(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule has no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// All assignments of one product.
    pub fn for_product(&self, product_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.product_id == product_id)
            .collect()
    }

    /// All assignments on one resource.
    pub fn for_resource(&self, resource_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.resource_id == resource_id)
            .collect()
    }

    /// Completion offset of a product: latest end over its assignments.
    pub fn product_completion_min(&self, product_id: &str) -> Option<i64> {
        self.for_product(product_id)
            .iter()
            .map(|a| a.end_min)
            .max()
    }

    /// Makespan: latest end minus earliest start, 0 when empty.
    pub fn makespan_min(&self) -> i64 {
        let earliest = self.assignments.iter().map(|a| a.start_min).min();
        let latest = self.assignments.iter().map(|a| a.end_min).max();
        match (earliest, latest) {
            (Some(s), Some(e)) => e - s,
            _ => 0,
        }
    }
}
