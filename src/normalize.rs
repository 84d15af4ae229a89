//! Input normalizer.
//!
//! Pure transform of a validated wire request into the engine's internal
//! problem: timestamps become minute offsets, calendars are merged and
//! clipped to the horizon, the changeover map is parsed into the matrix.
//! No failure modes live here; malformed input is rejected by the
//! request validator before the engine runs.

use crate::api::ScheduleRequest;
use crate::models::{
    merge, ChangeoverMatrix, Horizon, Interval, Product, Resource,
};

/// Separator of the wire changeover keys ("famA->famB").
pub const CHANGEOVER_KEY_SEPARATOR: &str = "->";

/// A normalized scheduling problem, ready for the driving loop.
#[derive(Debug, Clone)]
pub struct NormalizedProblem {
    /// The time epoch.
    pub horizon: Horizon,
    /// Horizon length in minutes, the upper bound for every assignment.
    pub horizon_len_min: i64,
    /// Normalized resources, in request order.
    pub resources: Vec<Resource>,
    /// Normalized products, in request order.
    pub products: Vec<Product>,
    /// Parsed changeover matrix.
    pub changeovers: ChangeoverMatrix,
    /// Wall-clock budget for the run (seconds).
    pub time_limit_secs: f64,
}

/// Normalizes a validated request.
pub fn normalize(request: &ScheduleRequest) -> NormalizedProblem {
    let horizon = Horizon::new(request.horizon.start, request.horizon.end);
    let horizon_len_min = horizon.length_min();

    let resources = request
        .resources
        .iter()
        .map(|r| {
            let windows: Vec<Interval> = r
                .calendar
                .iter()
                .map(|(start, end)| {
                    Interval::new(
                        horizon.offset_of(*start).max(0),
                        horizon.offset_of(*end).min(horizon_len_min),
                    )
                })
                .filter(|iv| iv.end_min > iv.start_min)
                .collect();
            Resource {
                id: r.id.clone(),
                capabilities: r.capabilities.iter().cloned().collect(),
                calendar: merge(windows),
            }
        })
        .collect();

    let products = request
        .products
        .iter()
        .map(|p| {
            let mut product = Product::new(&p.id)
                .with_family(&p.family)
                .with_due(horizon.offset_of(p.due));
            for step in &p.route {
                product = product.with_step(&step.capability, step.duration_minutes);
            }
            product
        })
        .collect();

    let mut changeovers = ChangeoverMatrix::new();
    for (key, &minutes) in &request.changeovers {
        if let Some((from, to)) = key.split_once(CHANGEOVER_KEY_SEPARATOR) {
            changeovers.set(from, to, minutes);
        }
    }

    NormalizedProblem {
        horizon,
        horizon_len_min,
        resources,
        products,
        changeovers,
        time_limit_secs: request.settings.time_limit_seconds,
    }
}
