//! External interface: request/response payloads and entry points.
//!
//! The wire shapes here map 1:1 onto a transport layer's JSON bodies;
//! this crate does not own a listener. Both success and failure payloads
//! carry the schema version tag so consumers can detect drift.
//!
//! [`schedule`] expects validated input (the validator is a separate
//! collaborator, see [`crate::validation`]); [`schedule_to_response`]
//! runs validation first and folds every outcome into a wire payload.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::report::{CompiledSchedule, Kpis, TimedAssignment};
use crate::engine::{Clock, SystemClock};
use crate::error::ScheduleError;
use crate::validation::{self, ValidationError};
use crate::{engine, normalize};

/// Version tag carried by every payload, success or failure.
pub const SCHEMA_VERSION: &str = "1";

fn schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// The scheduling window, as timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonSpec {
    /// Horizon start.
    pub start: DateTime<Utc>,
    /// Horizon end.
    pub end: DateTime<Utc>,
}

/// A resource, as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Unique resource identifier.
    pub id: String,
    /// Capabilities this resource provides.
    pub capabilities: Vec<String>,
    /// Working windows as `[start, end]` timestamp pairs.
    pub calendar: Vec<(DateTime<Utc>, DateTime<Utc>)>,
}

/// One route step, as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStepSpec {
    /// Required capability.
    pub capability: String,
    /// Processing duration in minutes.
    pub duration_minutes: i64,
}

/// A product, as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    /// Unique product identifier.
    pub id: String,
    /// Family tag for changeover lookups.
    pub family: String,
    /// Due timestamp.
    pub due: DateTime<Utc>,
    /// Ordered route.
    pub route: Vec<RouteStepSpec>,
}

/// Run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Wall-clock budget for the run (seconds).
    #[serde(default = "Settings::default_time_limit")]
    pub time_limit_seconds: f64,
}

impl Settings {
    fn default_time_limit() -> f64 {
        10.0
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit_seconds: Self::default_time_limit(),
        }
    }
}

/// A complete scheduling request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// The scheduling window.
    pub horizon: HorizonSpec,
    /// Available resources.
    pub resources: Vec<ResourceSpec>,
    /// Products to schedule.
    pub products: Vec<ProductSpec>,
    /// Changeover minutes keyed by "famA->famB".
    #[serde(default)]
    pub changeovers: HashMap<String, i64>,
    /// Run settings.
    #[serde(default)]
    pub settings: Settings,
}

/// A successful scheduling response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// Payload schema version.
    #[serde(default = "schema_version")]
    pub schema_version: String,
    /// Placed assignments with absolute timestamps.
    pub assignments: Vec<TimedAssignment>,
    /// The KPI block.
    pub kpis: Kpis,
}

/// A failure payload: category plus human-readable detail lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Payload schema version.
    #[serde(default = "schema_version")]
    pub schema_version: String,
    /// Machine-readable category.
    pub error: String,
    /// Operation-identifying detail lines.
    pub why: Vec<String>,
}

impl ErrorBody {
    /// Builds the payload for a rejected request.
    pub fn from_validation(errors: Vec<ValidationError>) -> Self {
        Self {
            schema_version: schema_version(),
            error: "validation_failure".to_string(),
            why: errors.into_iter().map(|e| e.message).collect(),
        }
    }
}

impl From<ScheduleError> for ErrorBody {
    fn from(err: ScheduleError) -> Self {
        Self {
            schema_version: schema_version(),
            error: err.category().to_string(),
            why: err.why(),
        }
    }
}

impl From<CompiledSchedule> for ScheduleResponse {
    fn from(compiled: CompiledSchedule) -> Self {
        Self {
            schema_version: schema_version(),
            assignments: compiled.assignments,
            kpis: compiled.kpis,
        }
    }
}

/// Schedules a validated request with the real clock.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shop_schedule::api::{self, HorizonSpec, ProductSpec, ResourceSpec, RouteStepSpec, ScheduleRequest, Settings};
/// use std::collections::HashMap;
///
/// let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();
/// let request = ScheduleRequest {
///     horizon: HorizonSpec { start, end },
///     resources: vec![ResourceSpec {
///         id: "filler-1".into(),
///         capabilities: vec!["fill".into()],
///         calendar: vec![(start, end)],
///     }],
///     products: vec![ProductSpec {
///         id: "batch-7".into(),
///         family: "lager".into(),
///         due: end,
///         route: vec![RouteStepSpec { capability: "fill".into(), duration_minutes: 30 }],
///     }],
///     changeovers: HashMap::new(),
///     settings: Settings::default(),
/// };
///
/// let response = api::schedule(&request).unwrap();
/// assert_eq!(response.kpis.on_time_jobs, 1);
/// assert_eq!(response.kpis.tardiness_minutes, 0);
/// ```
pub fn schedule(request: &ScheduleRequest) -> Result<ScheduleResponse, ScheduleError> {
    schedule_with_clock(request, &SystemClock::new())
}

/// Schedules a validated request against an injected clock.
pub fn schedule_with_clock(
    request: &ScheduleRequest,
    clock: &dyn Clock,
) -> Result<ScheduleResponse, ScheduleError> {
    let problem = normalize::normalize(request);
    let schedule = engine::run::execute(&problem, clock)?;
    let compiled = engine::report::compile(&problem, &schedule)?;
    Ok(compiled.into())
}

/// Validates and schedules, folding every outcome into a wire payload.
///
/// A transport layer maps the result 1:1: success to 200, a
/// `validation_failure` body to 400, anything else to the status its
/// category warrants.
pub fn schedule_to_response(request: &ScheduleRequest) -> Result<ScheduleResponse, ErrorBody> {
    if let Err(errors) = validation::validate_request(request) {
        return Err(ErrorBody::from_validation(errors));
    }
    schedule(request).map_err(ErrorBody::from)
}
