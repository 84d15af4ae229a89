//! Per-resource mutable run state.
//!
//! One `ResourceState` per resource per run: the ordered assignment list
//! and the family of the most recently placed job. The marker is
//! incidental bookkeeping; the placement search always re-derives the
//! preceding family per gap from the ordered list, because an insertion
//! into an early gap has a different predecessor than the resource's
//! chronologically last job.

use crate::models::{Assignment, Interval};

/// Mutable scheduling state of one resource during a run.
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    /// Assignments on this resource, kept sorted by start.
    pub assignments: Vec<Assignment>,
    /// Family of the most recently placed job.
    pub last_family: Option<String>,
}

impl ResourceState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a placement: inserts the assignment, restores start
    /// order, and updates the last-family marker.
    pub fn record(&mut self, assignment: Assignment) {
        self.last_family = Some(assignment.family.clone());
        self.assignments.push(assignment);
        self.assignments.sort_by_key(|a| a.start_min);
    }

    /// Occupied intervals on this resource, sorted by start.
    pub fn occupied(&self) -> Vec<Interval> {
        self.assignments
            .iter()
            .map(|a| Interval::new(a.start_min, a.end_min))
            .collect()
    }
}
