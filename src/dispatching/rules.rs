//! Built-in dispatching rules.
//!
//! The three rules the engine chains, in its fixed order:
//! due date, slack, duration.

use super::{DispatchingRule, RuleScore, SelectionContext};
use crate::models::Operation;

/// Earliest Due Date.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on a single
/// machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, op: &Operation, _context: &SelectionContext) -> RuleScore {
        op.due_min as f64
    }
}

/// Minimum Slack.
///
/// Slack = due - earliest_start - remaining work of the product from
/// this step on. Least slack first: the most urgent chain wins.
#[derive(Debug, Clone, Copy)]
pub struct MinSlack;

impl DispatchingRule for MinSlack {
    fn name(&self) -> &'static str {
        "SLACK"
    }

    fn evaluate(&self, op: &Operation, context: &SelectionContext) -> RuleScore {
        op.slack_min(context.remaining_for(op)) as f64
    }
}

/// Shortest Processing Time.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on a single
/// machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, op: &Operation, _context: &SelectionContext) -> RuleScore {
        op.duration_min as f64
    }
}
