// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crewcall::CoreError;
use crewcall_domain::DomainError;
use crewcall_persistence::PersistenceError;
use tracing::error;

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and
/// represent the API contract. Each variant maps to exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The worker failed one or more eligibility rules.
    IneligibleWorker {
        /// The worker that was checked.
        worker_id: Option<i64>,
        /// The shift the worker was checked against.
        shift_id: i64,
        /// Stable reason codes, one per failed rule.
        reasons: Vec<String>,
    },
    /// The write collides with existing state.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A guarded transition's precondition does not hold.
    PreconditionFailed {
        /// A human-readable description of the failed precondition.
        message: String,
    },
    /// A status transition outside the allowed table.
    InvalidTransition {
        /// What is transitioning: shift, assignment or event.
        entity: String,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::IneligibleWorker {
                worker_id,
                shift_id,
                reasons,
            } => {
                let worker = worker_id.map_or_else(|| String::from("?"), |id| id.to_string());
                write!(
                    f,
                    "Worker {worker} is not eligible for shift {shift_id}: {}",
                    reasons.join(", ")
                )
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::PreconditionFailed { message } => write!(f, "Precondition failed: {message}"),
            Self::InvalidTransition { entity, from, to } => {
                write!(f, "Invalid {entity} transition from '{from}' to '{to}'")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidSkillName(_) | DomainError::UnknownSkill(_) => {
            invalid("skill", message)
        }
        DomainError::InvalidName(_) => invalid("name", message),
        DomainError::InvalidCoordinates(_) => invalid("coordinates", message),
        DomainError::InvalidTimezone(_) => invalid("timezone", message),
        DomainError::InvalidSchedule { .. } => invalid("schedule", message),
        DomainError::InvalidSkillRequirement { .. } => invalid("requirements", message),
        DomainError::InvalidCapacity(_) => invalid("capacity", message),
        DomainError::InvalidHourlyRate(_) => invalid("hourly_rate", message),
        DomainError::InvalidHoursWorked { .. } => invalid("hours_worked", message),
        DomainError::InvalidEvent(_)
        | DomainError::MissingSchedule { .. }
        | DomainError::NoSkillRequirements { .. }
        | DomainError::EventNotSchedulable { .. } => invalid("event", message),
        DomainError::InvalidShiftStatus(_)
        | DomainError::InvalidAssignmentStatus(_)
        | DomainError::InvalidEventStatus(_) => invalid("status", message),
        DomainError::InvalidTimestamp { .. } => invalid("timestamp", message),
        DomainError::EventNotFound(id) => not_found("Event", format!("Event {id} does not exist")),
        DomainError::ShiftNotFound(id) => not_found("Shift", format!("Shift {id} does not exist")),
        DomainError::WorkerNotFound(id) => {
            not_found("Worker", format!("Worker {id} does not exist"))
        }
        DomainError::AssignmentNotFound(id) => {
            not_found("Assignment", format!("Assignment {id} does not exist"))
        }
        DomainError::VenueNotFound(id) => not_found("Venue", format!("Venue {id} does not exist")),
        DomainError::CertificationNotFound(id) => not_found(
            "Certification",
            format!("Certification {id} does not exist"),
        ),
        DomainError::IneligibleWorker {
            worker_id,
            shift_id,
            reasons,
        } => ApiError::IneligibleWorker {
            worker_id,
            shift_id,
            reasons: reasons.iter().map(|r| r.as_str().to_string()).collect(),
        },
        DomainError::ShiftAtCapacity { .. } => ApiError::Conflict { message },
        DomainError::ShiftNotFullyStaffed { .. } | DomainError::ShiftNotAssignable { .. } => {
            ApiError::PreconditionFailed { message }
        }
        DomainError::InvalidShiftTransition { from, to } => ApiError::InvalidTransition {
            entity: String::from("shift"),
            from: from.to_string(),
            to: to.to_string(),
        },
        DomainError::InvalidAssignmentTransition { from, to } => ApiError::InvalidTransition {
            entity: String::from("assignment"),
            from: from.to_string(),
            to: to.to_string(),
        },
        DomainError::InvalidEventTransition { from, to } => ApiError::InvalidTransition {
            entity: String::from("event"),
            from: from.to_string(),
            to: to.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Store failures that are not a caller's fault are logged here, once.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::ActiveAssignmentConflict { .. }
        | PersistenceError::StaleGraph(_)
        | PersistenceError::DuplicateRecord(_) => ApiError::Conflict {
            message: err.to_string(),
        },
        PersistenceError::NotFound(msg) => not_found("Record", msg),
        other => {
            error!(error = %other, "Persistence error");
            ApiError::Internal {
                message: format!("Persistence error: {other}"),
            }
        }
    }
}
