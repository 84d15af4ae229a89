//! Family-to-family changeover matrix.
//!
//! Maps an ordered family pair to the setup minutes required between two
//! consecutive jobs of those families on the same resource. Lookups for
//! missing pairs return 0; entries are directional, `A -> B` and `B -> A`
//! may differ.
//!
//! # Reference
//! Allahverdi et al. (2008), "A survey of scheduling problems with
//! setup times or costs"

use std::collections::HashMap;

/// Directional changeover lookup table.
#[derive(Debug, Clone, Default)]
pub struct ChangeoverMatrix {
    minutes: HashMap<(String, String), i64>,
}

impl ChangeoverMatrix {
    /// Creates an empty matrix (all changeovers are 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines the changeover from one family to another.
    pub fn set(&mut self, from: impl Into<String>, to: impl Into<String>, minutes: i64) {
        self.minutes.insert((from.into(), to.into()), minutes);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>, minutes: i64) -> Self {
        self.set(from, to, minutes);
        self
    }

    /// Changeover minutes from one family to another.
    ///
    /// A missing pair means no changeover is required and yields 0.
    pub fn minutes_between(&self, from: &str, to: &str) -> i64 {
        self.minutes
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Number of defined pairs.
    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    /// Whether no pairs are defined.
    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}
