//! Placement search.
//!
//! For one operation, scans every eligible resource, every calendar
//! window, and every gap between that resource's existing assignments,
//! inserting the required changeover time, and keeps the candidate that
//! minimizes projected tardiness (earliest end as tie-break).
//!
//! The changeover is evaluated per gap, from the family of the
//! assignment immediately preceding that specific gap. A single running
//! "last family" per resource would be wrong whenever insertion lands in
//! an earlier gap whose predecessor differs from the resource's
//! chronologically last job. A gap at the start of a window has no
//! in-window predecessor and incurs no changeover.

use std::collections::HashMap;

use crate::error::ScheduleError;
use crate::models::{Assignment, ChangeoverMatrix, Operation, Resource};

use super::state::ResourceState;

/// A feasible placement for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Chosen resource.
    pub resource_id: String,
    /// Start offset (minutes), changeover already absorbed.
    pub start_min: i64,
    /// End offset (minutes).
    pub end_min: i64,
    /// Changeover inserted before the start (minutes).
    pub changeover_min: i64,
}

impl Candidate {
    fn projected_tardiness(&self, due_min: i64) -> i64 {
        (self.end_min - due_min).max(0)
    }

    /// Whether this candidate beats `other` for an operation due at
    /// `due_min`: lower projected tardiness, then earlier end.
    fn beats(&self, other: &Self, due_min: i64) -> bool {
        let mine = (self.projected_tardiness(due_min), self.end_min);
        let theirs = (other.projected_tardiness(due_min), other.end_min);
        mine < theirs
    }
}

/// Largest rejected gap, kept for the `cannot_place` diagnosis.
#[derive(Debug, Clone, Default)]
struct NearMiss {
    gap_min: i64,
    changeover_min: i64,
}

/// Searches all eligible resources for the best placement of `op`.
///
/// Fails with the structured reason the diagnoser reports: missing
/// capability, horizon overflow, or no admissible gap (with the largest
/// near-miss gap attached).
pub fn find_best_placement(
    op: &Operation,
    resources: &[Resource],
    states: &HashMap<String, ResourceState>,
    changeovers: &ChangeoverMatrix,
    horizon_min: i64,
) -> Result<Candidate, ScheduleError> {
    let eligible: Vec<&Resource> = resources
        .iter()
        .filter(|r| r.can_perform(&op.capability))
        .collect();

    if eligible.is_empty() {
        return Err(ScheduleError::NoEligibleResource {
            product: op.product_id.clone(),
            step: op.step_index,
            capability: op.capability.clone(),
        });
    }

    if op.earliest_start_min + op.duration_min > horizon_min {
        return Err(ScheduleError::HorizonExceeded {
            product: op.product_id.clone(),
            step: op.step_index,
            earliest_end_min: op.earliest_start_min + op.duration_min,
            horizon_min,
        });
    }

    let mut best: Option<Candidate> = None;
    let mut near_miss = NearMiss::default();

    for resource in eligible {
        let empty = ResourceState::new();
        let state = states.get(&resource.id).unwrap_or(&empty);

        for window in &resource.calendar {
            // Assignments inside this window, already sorted by start.
            let in_window: Vec<&Assignment> = state
                .assignments
                .iter()
                .filter(|a| a.start_min >= window.start_min && a.end_min <= window.end_min)
                .collect();

            // Gap i is bounded below by assignment i-1 (or the window
            // start) and above by assignment i (or the window end).
            let mut prev: Option<&Assignment> = None;
            for slot in 0..=in_window.len() {
                let gap_lo = prev.map_or(window.start_min, |p| p.end_min);
                let gap_hi = in_window
                    .get(slot)
                    .map_or(window.end_min, |next| next.start_min);

                let gap_start = gap_lo.max(op.earliest_start_min);
                let gap_end = gap_hi.min(window.end_min);

                if gap_end > gap_start {
                    let changeover_min = prev
                        .map(|p| changeovers.minutes_between(&p.family, &op.family))
                        .unwrap_or(0);
                    let start_min = gap_start + changeover_min;
                    let end_min = start_min + op.duration_min;

                    if end_min <= gap_end && end_min <= horizon_min {
                        let candidate = Candidate {
                            resource_id: resource.id.clone(),
                            start_min,
                            end_min,
                            changeover_min,
                        };
                        let better = match &best {
                            None => true,
                            Some(current) => candidate.beats(current, op.due_min),
                        };
                        if better {
                            best = Some(candidate);
                        }
                    } else {
                        let gap_min = gap_end - gap_start;
                        if gap_min > near_miss.gap_min {
                            near_miss = NearMiss {
                                gap_min,
                                changeover_min,
                            };
                        }
                    }
                }

                prev = in_window.get(slot).copied();
            }
        }
    }

    best.ok_or_else(|| ScheduleError::CannotPlace {
        product: op.product_id.clone(),
        step: op.step_index,
        largest_gap_min: near_miss.gap_min,
        changeover_min: near_miss.changeover_min,
    })
}
