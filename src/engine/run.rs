//! The driving loop.
//!
//! Strictly sequential: select one ready operation, place it, mutate the
//! run state, repeat until the pool drains or a terminal condition hits.
//! All mutable state is owned by this function's frame, so concurrent
//! runs need no synchronization.
//!
//! Two guards sit at the top of each iteration: the wall-clock deadline
//! (injectable clock) and a hard iteration cap. Each iteration either
//! places an operation or fails terminally, so the cap only trips on
//! pathological non-progress.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::dispatching::{RuleChain, SelectionContext};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Assignment, Schedule};
use crate::normalize::NormalizedProblem;

use super::clock::Clock;
use super::placement::find_best_placement;
use super::pool::{OperationPool, PlacedStep};
use super::state::ResourceState;

/// Iteration ceiling multiplier over the operation count.
const ITERATION_FACTOR: usize = 8;

/// Runs one full scheduling pass over a normalized problem.
///
/// Returns the complete schedule, or the first terminal failure. An
/// empty product list short-circuits to an empty schedule without
/// entering the loop.
pub fn execute(problem: &NormalizedProblem, clock: &dyn Clock) -> ScheduleResult<Schedule> {
    let mut pool = OperationPool::from_products(&problem.products);
    let total_ops = pool.len();
    if total_ops == 0 {
        info!("nothing to schedule, returning empty schedule");
        return Ok(Schedule::new());
    }

    let mut states: HashMap<String, ResourceState> = problem
        .resources
        .iter()
        .map(|r| (r.id.clone(), ResourceState::new()))
        .collect();
    let mut placed: HashSet<PlacedStep> = HashSet::new();
    let mut schedule = Schedule::new();
    let chain = RuleChain::tardiness_default();
    let iteration_cap = total_ops * ITERATION_FACTOR;
    let mut iterations = 0usize;

    while !pool.is_empty() {
        if clock.elapsed_secs() > problem.time_limit_secs {
            warn!(
                placed = schedule.len(),
                remaining = pool.len(),
                "deadline exceeded, aborting run"
            );
            return Err(ScheduleError::DeadlineExceeded {
                limit_secs: problem.time_limit_secs,
                placed: schedule.len(),
            });
        }

        iterations += 1;
        if iterations > iteration_cap {
            warn!(iteration_cap, "iteration cap exceeded, aborting run");
            return Err(ScheduleError::IterationCapExceeded { cap: iteration_cap });
        }

        let ready = pool.ready_indices(&placed);
        let mut context = SelectionContext::new();
        for &idx in &ready {
            let op = &pool.ops()[idx];
            context = context.with_remaining_work(
                op.product_id.clone(),
                pool.remaining_work_min(&op.product_id, op.step_index),
            );
        }

        let Some(pick) = chain.select(pool.ops(), &ready, &context) else {
            warn!(remaining = pool.len(), "no ready operation, precedence deadlock");
            return Err(ScheduleError::PrecedenceDeadlock {
                remaining: pool.len(),
            });
        };

        let op = pool.take(pick);
        let candidate = find_best_placement(
            &op,
            &problem.resources,
            &states,
            &problem.changeovers,
            problem.horizon_len_min,
        )?;

        let assignment = Assignment {
            product_id: op.product_id.clone(),
            step_index: op.step_index,
            family: op.family.clone(),
            operation: op.name.clone(),
            resource_id: candidate.resource_id.clone(),
            start_min: candidate.start_min,
            end_min: candidate.end_min,
        };
        debug!(
            product = %assignment.product_id,
            step = assignment.step_index,
            resource = %assignment.resource_id,
            start_min = assignment.start_min,
            end_min = assignment.end_min,
            changeover_min = candidate.changeover_min,
            "placed operation"
        );

        if let Some(state) = states.get_mut(&candidate.resource_id) {
            state.record(assignment.clone());
        }
        placed.insert((op.product_id.clone(), op.step_index));
        pool.raise_earliest_start(&op.product_id, op.step_index + 1, assignment.end_min);
        schedule.add(assignment);
    }

    info!(
        assignments = schedule.len(),
        iterations, "scheduling run complete"
    );
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;
    use crate::models::{ChangeoverMatrix, Horizon, Product, Resource};
    use chrono::TimeZone;
    use chrono::Utc;

    fn problem(resources: Vec<Resource>, products: Vec<Product>, changeovers: ChangeoverMatrix) -> NormalizedProblem {
        let horizon = Horizon::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap(),
        );
        NormalizedProblem {
            horizon_len_min: horizon.length_min(),
            horizon,
            resources,
            products,
            changeovers,
            time_limit_secs: 10.0,
        }
    }

    fn frozen() -> ManualClock {
        ManualClock::with_step(0.0)
    }

    #[test]
    fn test_empty_products_short_circuit() {
        let p = problem(
            vec![Resource::new("M1").with_capability("fill").with_window(0, 480)],
            Vec::new(),
            ChangeoverMatrix::new(),
        );
        let schedule = execute(&p, &frozen()).unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_single_operation_starts_at_zero() {
        let p = problem(
            vec![Resource::new("M1").with_capability("fill").with_window(0, 480)],
            vec![Product::new("P1").with_family("A").with_due(480).with_step("fill", 30)],
            ChangeoverMatrix::new(),
        );
        let schedule = execute(&p, &frozen()).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.assignments[0].start_min, 0);
        assert_eq!(schedule.assignments[0].end_min, 30);
    }

    #[test]
    fn test_route_precedence_enforced() {
        let p = problem(
            vec![
                Resource::new("M1").with_capability("fill").with_window(0, 480),
                Resource::new("M2").with_capability("cap").with_window(0, 480),
            ],
            vec![Product::new("P1")
                .with_family("A")
                .with_due(480)
                .with_step("fill", 30)
                .with_step("cap", 20)],
            ChangeoverMatrix::new(),
        );
        let schedule = execute(&p, &frozen()).unwrap();
        assert_eq!(schedule.len(), 2);
        let fill = &schedule.for_product("P1")[0];
        let cap = schedule
            .assignments
            .iter()
            .find(|a| a.step_index == 1)
            .unwrap();
        assert!(cap.start_min >= fill.end_min);
        assert_eq!(cap.resource_id, "M2");
    }

    #[test]
    fn test_changeover_separates_families() {
        let p = problem(
            vec![Resource::new("M1").with_capability("fill").with_window(0, 480)],
            vec![
                Product::new("P1").with_family("A").with_due(480).with_step("fill", 30),
                Product::new("P2").with_family("B").with_due(480).with_step("fill", 30),
            ],
            ChangeoverMatrix::new().with("A", "B", 30),
        );
        let schedule = execute(&p, &frozen()).unwrap();
        assert_eq!(schedule.len(), 2);
        let first = schedule.for_product("P1")[0];
        let second = schedule.for_product("P2")[0];
        assert!(second.start_min >= first.end_min + 30);
    }

    #[test]
    fn test_earlier_due_scheduled_first() {
        let p = problem(
            vec![Resource::new("M1").with_capability("fill").with_window(0, 480)],
            vec![
                Product::new("late").with_family("A").with_due(480).with_step("fill", 30),
                Product::new("soon").with_family("A").with_due(60).with_step("fill", 30),
            ],
            ChangeoverMatrix::new(),
        );
        let schedule = execute(&p, &frozen()).unwrap();
        let soon = schedule.for_product("soon")[0];
        let late = schedule.for_product("late")[0];
        assert_eq!(soon.start_min, 0);
        assert!(late.start_min >= soon.end_min);
    }

    #[test]
    fn test_deadline_fires_before_first_placement() {
        let p = problem(
            vec![Resource::new("M1").with_capability("fill").with_window(0, 480)],
            vec![Product::new("P1").with_family("A").with_due(480).with_step("fill", 30)],
            ChangeoverMatrix::new(),
        );
        // Each clock reading advances 60s, past the 10s limit at once.
        let err = execute(&p, &ManualClock::with_step(60.0)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::DeadlineExceeded {
                limit_secs: 10.0,
                placed: 0
            }
        );
    }

    #[test]
    fn test_missing_capability_is_terminal() {
        let p = problem(
            vec![Resource::new("M1").with_capability("fill").with_window(0, 480)],
            vec![Product::new("P1").with_family("A").with_due(480).with_step("coat", 30)],
            ChangeoverMatrix::new(),
        );
        let err = execute(&p, &frozen()).unwrap_err();
        assert_eq!(err.category(), "no_eligible_resource");
    }

    #[test]
    fn test_schedule_invariants_hold() {
        crate::logging::init_test();
        let changeovers = ChangeoverMatrix::new()
            .with("A", "B", 30)
            .with("B", "A", 20)
            .with("A", "C", 10)
            .with("C", "A", 10);
        let resources = vec![
            Resource::new("fill-1")
                .with_capability("fill")
                .with_window(0, 480)
                .with_window(600, 1080),
            Resource::new("fill-2").with_capability("fill").with_window(0, 720),
            Resource::new("pack-1")
                .with_capability("pack")
                .with_window(60, 900),
        ];
        let products = vec![
            Product::new("P1")
                .with_family("A")
                .with_due(400)
                .with_step("fill", 90)
                .with_step("pack", 45),
            Product::new("P2")
                .with_family("B")
                .with_due(500)
                .with_step("fill", 120)
                .with_step("pack", 30),
            Product::new("P3")
                .with_family("C")
                .with_due(300)
                .with_step("fill", 60),
            Product::new("P4")
                .with_family("A")
                .with_due(900)
                .with_step("fill", 200)
                .with_step("pack", 60),
        ];
        let p = problem(resources.clone(), products.clone(), changeovers.clone());
        let schedule = execute(&p, &frozen()).unwrap();
        assert_eq!(schedule.len(), 7);

        // Horizon containment.
        for a in &schedule.assignments {
            assert!(a.start_min >= 0);
            assert!(a.end_min <= p.horizon_len_min);
        }

        // Calendar containment: each assignment inside exactly one window.
        for a in &schedule.assignments {
            let resource = resources.iter().find(|r| r.id == a.resource_id).unwrap();
            let enclosing = resource
                .calendar
                .iter()
                .filter(|w| a.start_min >= w.start_min && a.end_min <= w.end_min)
                .count();
            assert_eq!(enclosing, 1, "assignment {a:?} not inside one window");
        }

        // No overlap and changeover lower bound, per resource.
        for resource in &resources {
            let mut on_resource = schedule.for_resource(&resource.id);
            on_resource.sort_by_key(|a| a.start_min);
            for pair in on_resource.windows(2) {
                assert!(pair[1].start_min >= pair[0].end_min);
                if pair[0].family != pair[1].family {
                    let required = changeovers.minutes_between(&pair[0].family, &pair[1].family);
                    assert!(
                        pair[1].start_min - pair[0].end_min >= required,
                        "changeover violated between {:?} and {:?}",
                        pair[0],
                        pair[1]
                    );
                }
            }
        }

        // Precedence per product.
        for product in &products {
            let mut steps = schedule.for_product(&product.id);
            steps.sort_by_key(|a| a.step_index);
            for pair in steps.windows(2) {
                assert!(pair[1].start_min >= pair[0].end_min);
            }
        }
    }

    #[test]
    fn test_identical_input_identical_output() {
        let build = || {
            problem(
                vec![
                    Resource::new("M1").with_capability("fill").with_window(0, 480),
                    Resource::new("M2").with_capability("fill").with_window(0, 480),
                ],
                vec![
                    Product::new("P1").with_family("A").with_due(200).with_step("fill", 30),
                    Product::new("P2").with_family("A").with_due(200).with_step("fill", 30),
                    Product::new("P3").with_family("B").with_due(200).with_step("fill", 30),
                ],
                ChangeoverMatrix::new().with("A", "B", 15),
            )
        };
        let a = execute(&build(), &frozen()).unwrap();
        let b = execute(&build(), &frozen()).unwrap();
        let key = |s: &Schedule| -> Vec<(String, usize, String, i64, i64)> {
            s.assignments
                .iter()
                .map(|a| {
                    (
                        a.product_id.clone(),
                        a.step_index,
                        a.resource_id.clone(),
                        a.start_min,
                        a.end_min,
                    )
                })
                .collect()
        };
        assert_eq!(key(&a), key(&b));
    }
}
