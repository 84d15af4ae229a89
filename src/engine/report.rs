//! Result compiler.
//!
//! Turns a completed assignment set into the output payload: absolute
//! timestamps and the KPI block. Before anything is returned, a global
//! consistency re-check re-validates per-resource no-overlap and
//! per-product precedence; a violation there is a placement-search
//! defect and surfaces as a hard error, never a silently patched result.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | tardiness_minutes | sum of max(0, completion - due) over products |
//! | on_time_jobs | products with zero tardiness |
//! | makespan_minutes | max(end) - min(start), 0 when empty |
//! | changeovers | adjacent same-resource pairs with differing family |
//! | utilization | (busy + changeover) / calendar capacity, percent |

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::Schedule;
use crate::normalize::NormalizedProblem;

/// An assignment with offsets converted back to timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedAssignment {
    /// Product identifier.
    pub product: String,
    /// Operation display name.
    pub operation: String,
    /// Executing resource.
    pub resource: String,
    /// Absolute start.
    pub start: DateTime<Utc>,
    /// Absolute end.
    pub end: DateTime<Utc>,
}

/// The KPI block of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kpis {
    /// Total tardiness across all products (minutes).
    pub tardiness_minutes: i64,
    /// Count of family changeovers across all resources.
    pub changeovers: usize,
    /// Span from earliest start to latest end (minutes).
    pub makespan_minutes: i64,
    /// Per-resource utilization percent, rounded to nearest integer.
    pub utilization: HashMap<String, u32>,
    /// Products completing at or before their due time.
    pub on_time_jobs: usize,
    /// Total products in the request.
    pub total_jobs: usize,
}

/// A compiled, wire-ready schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledSchedule {
    /// Assignments sorted by start, then resource, then product.
    pub assignments: Vec<TimedAssignment>,
    /// The KPI block.
    pub kpis: Kpis,
}

/// Compiles the final schedule into timestamps and KPIs.
pub fn compile(problem: &NormalizedProblem, schedule: &Schedule) -> ScheduleResult<CompiledSchedule> {
    verify_consistency(problem, schedule)?;

    let mut tardiness_minutes = 0i64;
    let mut on_time_jobs = 0usize;
    let mut worst: Option<(&str, i64)> = None;
    for product in &problem.products {
        let completion = schedule.product_completion_min(&product.id).unwrap_or(0);
        let tardiness = (completion - product.due_min).max(0);
        tardiness_minutes += tardiness;
        if tardiness == 0 {
            on_time_jobs += 1;
        } else if worst.map_or(true, |(_, t)| tardiness > t) {
            worst = Some((&product.id, tardiness));
        }
    }
    if let Some((product, tardiness)) = worst {
        debug!(product, tardiness_min = tardiness, "worst tardiness");
    }

    let mut changeovers = 0usize;
    let mut utilization = HashMap::new();
    for resource in &problem.resources {
        let mut on_resource = schedule.for_resource(&resource.id);
        on_resource.sort_by_key(|a| a.start_min);

        let busy_min: i64 = on_resource.iter().map(|a| a.duration_min()).sum();
        let mut changeover_min = 0i64;
        for pair in on_resource.windows(2) {
            if pair[0].family != pair[1].family {
                changeovers += 1;
                changeover_min += problem
                    .changeovers
                    .minutes_between(&pair[0].family, &pair[1].family);
            }
        }

        let capacity_min = resource.calendar_capacity_min();
        let percent = if capacity_min > 0 {
            ((busy_min + changeover_min) as f64 / capacity_min as f64 * 100.0).round() as u32
        } else {
            0
        };
        utilization.insert(resource.id.clone(), percent);
    }

    let mut assignments: Vec<TimedAssignment> = schedule
        .assignments
        .iter()
        .map(|a| TimedAssignment {
            product: a.product_id.clone(),
            operation: a.operation.clone(),
            resource: a.resource_id.clone(),
            start: problem.horizon.timestamp_of(a.start_min),
            end: problem.horizon.timestamp_of(a.end_min),
        })
        .collect();
    assignments.sort_by(|a, b| {
        (a.start, &a.resource, &a.product).cmp(&(b.start, &b.resource, &b.product))
    });

    Ok(CompiledSchedule {
        assignments,
        kpis: Kpis {
            tardiness_minutes,
            changeovers,
            makespan_minutes: schedule.makespan_min(),
            utilization,
            on_time_jobs,
            total_jobs: problem.products.len(),
        },
    })
}

/// Re-validates the two global invariants the placement search must
/// uphold: no overlap on any resource, and route precedence within any
/// product.
fn verify_consistency(problem: &NormalizedProblem, schedule: &Schedule) -> ScheduleResult<()> {
    for resource in &problem.resources {
        let mut on_resource = schedule.for_resource(&resource.id);
        on_resource.sort_by_key(|a| a.start_min);
        for pair in on_resource.windows(2) {
            if pair[1].start_min < pair[0].end_min {
                return Err(ScheduleError::ConsistencyViolation {
                    detail: format!(
                        "assignments overlap on resource '{}': '{}' [{}, {}) and '{}' [{}, {})",
                        resource.id,
                        pair[0].product_id,
                        pair[0].start_min,
                        pair[0].end_min,
                        pair[1].product_id,
                        pair[1].start_min,
                        pair[1].end_min,
                    ),
                });
            }
        }
    }

    for product in &problem.products {
        let mut steps = schedule.for_product(&product.id);
        steps.sort_by_key(|a| a.step_index);
        for pair in steps.windows(2) {
            if pair[1].start_min < pair[0].end_min {
                return Err(ScheduleError::ConsistencyViolation {
                    detail: format!(
                        "precedence violated for product '{}': step {} starts at {} before step {} ends at {}",
                        product.id,
                        pair[1].step_index,
                        pair[1].start_min,
                        pair[0].step_index,
                        pair[0].end_min,
                    ),
                });
            }
        }
    }

    Ok(())
}
