//! Product (job) model.
//!
//! A product is one job to complete inside the horizon: a family tag for
//! changeover lookups, a due offset, and an ordered route of steps. Route
//! order is the precedence chain, step *i+1* cannot start before step *i*
//! ends.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

/// One step of a product's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Capability a resource must provide to execute this step.
    pub capability: String,
    /// Processing duration in minutes.
    pub duration_min: i64,
}

/// A product (job) to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Family tag, drives changeover lookups.
    pub family: String,
    /// Due time as a minute offset from the horizon start.
    pub due_min: i64,
    /// Ordered processing steps; the order is the precedence chain.
    pub route: Vec<RouteStep>,
}

impl Product {
    /// Creates a product with an empty route.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            family: String::new(),
            due_min: 0,
            route: Vec::new(),
        }
    }

    /// Sets the family tag.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Sets the due offset (minutes).
    pub fn with_due(mut self, due_min: i64) -> Self {
        self.due_min = due_min;
        self
    }

    /// Appends a route step.
    pub fn with_step(mut self, capability: impl Into<String>, duration_min: i64) -> Self {
        self.route.push(RouteStep {
            capability: capability.into(),
            duration_min,
        });
        self
    }

    /// Total processing time across the whole route (minutes).
    pub fn total_work_min(&self) -> i64 {
        self.route.iter().map(|s| s.duration_min).sum()
    }

    /// Processing time of `from_step` and every later step (minutes).
    ///
    /// This is the `remaining_work` term in the slack computation.
    pub fn remaining_work_min(&self, from_step: usize) -> i64 {
        self.route
            .iter()
            .skip(from_step)
            .map(|s| s.duration_min)
            .sum()
    }

    /// Number of route steps.
    pub fn step_count(&self) -> usize {
        self.route.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_builder() {
        let p = Product::new("P1")
            .with_family("A")
            .with_due(1440)
            .with_step("fill", 30)
            .with_step("cap", 15);

        assert_eq!(p.id, "P1");
        assert_eq!(p.family, "A");
        assert_eq!(p.due_min, 1440);
        assert_eq!(p.step_count(), 2);
        assert_eq!(p.route[0].capability, "fill");
    }

    #[test]
    fn test_work_sums() {
        let p = Product::new("P1")
            .with_step("fill", 30)
            .with_step("cap", 15)
            .with_step("label", 5);

        assert_eq!(p.total_work_min(), 50);
        assert_eq!(p.remaining_work_min(0), 50);
        assert_eq!(p.remaining_work_min(1), 20);
        assert_eq!(p.remaining_work_min(2), 5);
        assert_eq!(p.remaining_work_min(3), 0);
    }
}
