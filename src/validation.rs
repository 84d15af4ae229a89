//! Request validation.
//!
//! Structural integrity checks for a scheduling request, run before the
//! engine sees the input. Detects:
//! - Duplicate resource or product IDs
//! - Inverted horizon or calendar windows
//! - Empty routes and non-positive step durations
//! - Malformed or negative changeover entries
//!
//! All problems are collected, not just the first, so one round trip
//! fixes a whole request. A due date before the horizon start is legal
//! but suspicious; it is logged, not rejected, since such a product can
//! still be scheduled (it will simply be tardy).

use std::collections::HashSet;

use tracing::warn;

use crate::api::ScheduleRequest;
use crate::normalize::CHANGEOVER_KEY_SEPARATOR;

/// Validation result: `Ok(())` or every detected issue.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// Horizon end does not lie after horizon start.
    InvalidHorizon,
    /// A calendar window ends at or before it starts.
    InvalidWindow,
    /// A route step has a non-positive duration.
    InvalidDuration,
    /// A product has no route steps.
    EmptyRoute,
    /// A changeover entry is malformed or negative.
    InvalidChangeover,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a request's structure.
///
/// Returns `Ok(())` when the request may be handed to the engine, or
/// the full list of detected issues.
pub fn validate_request(request: &ScheduleRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if request.horizon.end <= request.horizon.start {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidHorizon,
            format!(
                "horizon end {} does not lie after start {}",
                request.horizon.end, request.horizon.start
            ),
        ));
    }

    let mut resource_ids = HashSet::new();
    for resource in &request.resources {
        if !resource_ids.insert(resource.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate resource ID: {}", resource.id),
            ));
        }
        for (start, end) in &resource.calendar {
            if end <= start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!(
                        "resource '{}' has a calendar window ending at or before its start ({start} .. {end})",
                        resource.id
                    ),
                ));
            }
        }
    }

    let mut product_ids = HashSet::new();
    for product in &request.products {
        if !product_ids.insert(product.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate product ID: {}", product.id),
            ));
        }
        if product.route.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRoute,
                format!("product '{}' has no route steps", product.id),
            ));
        }
        for (index, step) in product.route.iter().enumerate() {
            if step.duration_minutes <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDuration,
                    format!(
                        "product '{}' step {} has non-positive duration {}",
                        product.id, index, step.duration_minutes
                    ),
                ));
            }
        }
        if product.due < request.horizon.start {
            warn!(
                product = %product.id,
                due = %product.due,
                "product is due before the horizon starts; it will be tardy"
            );
        }
    }

    for (key, &minutes) in &request.changeovers {
        match key.split_once(CHANGEOVER_KEY_SEPARATOR) {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => {}
            _ => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidChangeover,
                    format!("changeover key '{key}' is not of the form 'famA->famB'"),
                ));
            }
        }
        if minutes < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidChangeover,
                format!("changeover '{key}' has negative minutes {minutes}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
