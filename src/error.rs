//! Engine failure taxonomy.
//!
//! Every failure is terminal for the run and converts into a wire-level
//! `{error, why}` payload: `category()` supplies the machine-readable
//! category string, `why()` the human-readable, operation-identifying
//! detail lines. The engine never retries, relaxes constraints, or
//! backtracks.
//!
//! Input errors are absent here on purpose: the request validator rejects
//! malformed input before the engine runs and produces its own payload.

use thiserror::Error;

/// Result alias for engine operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// A terminal scheduling failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    /// No resource's capability set contains the required capability.
    #[error("no resource can perform '{capability}' for product '{product}' step {step}")]
    NoEligibleResource {
        product: String,
        step: usize,
        capability: String,
    },

    /// The capability exists somewhere, but no gap across all eligible
    /// resources admits the operation.
    #[error("no feasible slot for product '{product}' step {step}")]
    CannotPlace {
        product: String,
        step: usize,
        /// Largest gap that was inspected and rejected (minutes).
        largest_gap_min: i64,
        /// Changeover that would have been required in that gap (minutes).
        changeover_min: i64,
    },

    /// The operation cannot end inside the horizon on any resource.
    #[error("product '{product}' step {step} cannot finish inside the horizon")]
    HorizonExceeded {
        product: String,
        step: usize,
        /// Earliest end the operation could reach (minutes).
        earliest_end_min: i64,
        /// Horizon length (minutes).
        horizon_min: i64,
    },

    /// The ready set is empty while unplaced operations remain.
    #[error("precedence deadlock with {remaining} unplaced operations")]
    PrecedenceDeadlock { remaining: usize },

    /// The wall-clock budget elapsed before completion.
    #[error("time limit of {limit_secs}s exceeded after {placed} placements")]
    DeadlineExceeded { limit_secs: f64, placed: usize },

    /// The hard iteration ceiling was hit.
    #[error("iteration cap of {cap} exceeded")]
    IterationCapExceeded { cap: usize },

    /// The post-run overlap/precedence re-check failed. This signals a
    /// defect in the placement search, not a property of the input.
    #[error("schedule consistency check failed: {detail}")]
    ConsistencyViolation { detail: String },
}

impl ScheduleError {
    /// Machine-readable category string for the wire payload.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NoEligibleResource { .. } => "no_eligible_resource",
            Self::CannotPlace { .. } => "cannot_place",
            Self::HorizonExceeded { .. } => "horizon_exceeded",
            Self::PrecedenceDeadlock { .. } => "precedence_deadlock",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
            Self::IterationCapExceeded { .. } => "iteration_cap_exceeded",
            Self::ConsistencyViolation { .. } => "consistency_check_failed",
        }
    }

    /// Human-readable detail lines naming the offending operation.
    pub fn why(&self) -> Vec<String> {
        match self {
            Self::NoEligibleResource {
                product,
                step,
                capability,
            } => vec![format!(
                "product '{product}' step {step} requires capability '{capability}' \
                 but no resource provides it"
            )],
            Self::CannotPlace {
                product,
                step,
                largest_gap_min,
                changeover_min,
            } => vec![
                format!(
                    "no calendar gap on any eligible resource admits product \
                     '{product}' step {step}"
                ),
                format!(
                    "largest near-miss gap was {largest_gap_min} minutes \
                     (changeover required there: {changeover_min} minutes)"
                ),
            ],
            Self::HorizonExceeded {
                product,
                step,
                earliest_end_min,
                horizon_min,
            } => vec![format!(
                "product '{product}' step {step} would end at minute \
                 {earliest_end_min} at the earliest, past the {horizon_min}-minute horizon"
            )],
            Self::PrecedenceDeadlock { remaining } => vec![format!(
                "{remaining} operations remain unplaced but none are ready; \
                 route precedence cannot make progress"
            )],
            Self::DeadlineExceeded { limit_secs, placed } => vec![format!(
                "run exceeded the {limit_secs}s time limit after {placed} placements"
            )],
            Self::IterationCapExceeded { cap } => {
                vec![format!("run exceeded the hard iteration cap of {cap}")]
            }
            Self::ConsistencyViolation { detail } => vec![
                "final consistency re-check failed; this indicates an engine \
                 defect, not an input problem"
                    .to_string(),
                detail.clone(),
            ],
        }
    }
}
