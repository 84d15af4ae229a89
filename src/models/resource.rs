//! Resource model.
//!
//! A resource is anything that executes operations: a machine, a line, a
//! cell. Eligibility is a plain capability-containment test; availability
//! is a list of calendar windows in minute offsets.
//!
//! The calendar is normalized once (merged, clipped to the horizon,
//! zero-length windows dropped) and immutable afterwards. Only the
//! per-run [`ResourceState`](crate::engine::ResourceState) mutates during
//! scheduling.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Interval;

/// A resource that can execute operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Capabilities this resource provides.
    pub capabilities: HashSet<String>,
    /// Normalized working windows: sorted, disjoint, inside the horizon.
    pub calendar: Vec<Interval>,
}

impl Resource {
    /// Creates a resource with no capabilities and an empty calendar.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capabilities: HashSet::new(),
            calendar: Vec::new(),
        }
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    /// Adds a calendar window. Callers building resources directly are
    /// expected to add windows already sorted and disjoint; the input
    /// normalizer establishes this for wire requests.
    pub fn with_window(mut self, start_min: i64, end_min: i64) -> Self {
        self.calendar.push(Interval::new(start_min, end_min));
        self
    }

    /// Whether this resource can execute an operation requiring
    /// `capability`.
    pub fn can_perform(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Total working time across all calendar windows (minutes).
    ///
    /// This is the utilization denominator in the result compiler.
    pub fn calendar_capacity_min(&self) -> i64 {
        self.calendar.iter().map(Interval::duration_min).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("M1")
            .with_capability("fill")
            .with_capability("cap")
            .with_window(0, 480)
            .with_window(600, 1080);

        assert_eq!(r.id, "M1");
        assert!(r.can_perform("fill"));
        assert!(r.can_perform("cap"));
        assert!(!r.can_perform("label"));
        assert_eq!(r.calendar.len(), 2);
    }

    #[test]
    fn test_calendar_capacity() {
        let r = Resource::new("M1").with_window(0, 480).with_window(600, 660);
        assert_eq!(r.calendar_capacity_min(), 540);

        let empty = Resource::new("M2");
        assert_eq!(empty.calendar_capacity_min(), 0);
    }
}
