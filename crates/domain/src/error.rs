// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::AssignmentStatus;
use crate::eligibility::IneligibilityReason;
use crate::event::EventStatus;
use crate::shift_status::ShiftStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Skill name is empty or malformed.
    InvalidSkillName(String),
    /// Skill name is well formed but not present in the skill catalog.
    UnknownSkill(String),
    /// A name or title is empty or invalid.
    InvalidName(String),
    /// Venue coordinates are out of range.
    InvalidCoordinates(String),
    /// Timezone identifier is not a known IANA zone.
    InvalidTimezone(String),
    /// Event schedule is inconsistent.
    InvalidSchedule {
        /// Description of the problem.
        reason: String,
    },
    /// Skill requirement is invalid.
    InvalidSkillRequirement {
        /// Description of the problem.
        reason: String,
    },
    /// Capacity must be at least one worker.
    InvalidCapacity(u32),
    /// Hourly rate is negative or not finite.
    InvalidHourlyRate(String),
    /// Hours worked failed validation.
    InvalidHoursWorked {
        /// Description of the problem.
        reason: String,
    },
    /// An event is missing data it needs for the requested operation.
    InvalidEvent(String),
    /// Shift status string is not recognized.
    InvalidShiftStatus(String),
    /// Assignment status string is not recognized.
    InvalidAssignmentStatus(String),
    /// Event status string is not recognized.
    InvalidEventStatus(String),
    /// Shift generation requires a schedule.
    MissingSchedule {
        /// The event lacking a schedule.
        event_id: i64,
    },
    /// Shift generation requires at least one skill requirement.
    NoSkillRequirements {
        /// The event lacking requirements.
        event_id: i64,
    },
    /// The event's status does not allow shifts to be (re)generated or staffed.
    EventNotSchedulable {
        /// The event.
        event_id: i64,
        /// Its current status.
        status: EventStatus,
    },
    /// Event does not exist.
    EventNotFound(i64),
    /// Shift does not exist.
    ShiftNotFound(i64),
    /// Worker does not exist.
    WorkerNotFound(i64),
    /// Assignment does not exist.
    AssignmentNotFound(i64),
    /// Venue does not exist.
    VenueNotFound(i64),
    /// Certification does not exist.
    CertificationNotFound(i64),
    /// The worker failed one or more eligibility rules for the shift.
    IneligibleWorker {
        /// The worker that was checked.
        worker_id: Option<i64>,
        /// The shift the worker was checked against.
        shift_id: i64,
        /// Every rule that failed.
        reasons: Vec<IneligibilityReason>,
    },
    /// The shift's capacity is already taken by active assignments.
    ShiftAtCapacity {
        /// The full shift.
        shift_id: i64,
        /// The shift's capacity.
        capacity: u32,
    },
    /// The shift's status no longer takes new assignments.
    ShiftNotAssignable {
        /// The shift.
        shift_id: i64,
        /// Its current status.
        status: ShiftStatus,
    },
    /// A guarded shift transition requires the shift to be fully staffed.
    ShiftNotFullyStaffed {
        /// The shift.
        shift_id: i64,
        /// Its current staffing percentage.
        percentage: u32,
    },
    /// Shift status transition is not in the transition table.
    InvalidShiftTransition {
        /// Current status.
        from: ShiftStatus,
        /// Requested status.
        to: ShiftStatus,
    },
    /// Assignment status transition is not permitted.
    InvalidAssignmentTransition {
        /// Current status.
        from: AssignmentStatus,
        /// Requested status.
        to: AssignmentStatus,
    },
    /// Event status transition is not permitted.
    InvalidEventTransition {
        /// Current status.
        from: EventStatus,
        /// Requested status.
        to: EventStatus,
    },
    /// Failed to parse a timestamp or date.
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// The parser's message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSkillName(msg) => write!(f, "Invalid skill name: {msg}"),
            Self::UnknownSkill(name) => write!(f, "Skill '{name}' is not in the skill catalog"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidCoordinates(msg) => write!(f, "Invalid coordinates: {msg}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::InvalidSchedule { reason } => write!(f, "Invalid schedule: {reason}"),
            Self::InvalidSkillRequirement { reason } => {
                write!(f, "Invalid skill requirement: {reason}")
            }
            Self::InvalidCapacity(value) => {
                write!(f, "Invalid capacity: {value}. Must be at least 1")
            }
            Self::InvalidHourlyRate(msg) => write!(f, "Invalid hourly rate: {msg}"),
            Self::InvalidHoursWorked { reason } => write!(f, "Invalid hours worked: {reason}"),
            Self::InvalidEvent(msg) => write!(f, "Invalid event: {msg}"),
            Self::InvalidShiftStatus(status) => write!(f, "Invalid shift status: '{status}'"),
            Self::InvalidAssignmentStatus(status) => {
                write!(f, "Invalid assignment status: '{status}'")
            }
            Self::InvalidEventStatus(status) => write!(f, "Invalid event status: '{status}'"),
            Self::MissingSchedule { event_id } => {
                write!(f, "Event {event_id} has no schedule: missing schedule")
            }
            Self::NoSkillRequirements { event_id } => {
                write!(f, "Event {event_id} has no skill requirements")
            }
            Self::EventNotSchedulable { event_id, status } => {
                write!(
                    f,
                    "Event {event_id} in status '{status}' cannot be scheduled or staffed"
                )
            }
            Self::EventNotFound(id) => write!(f, "Event {id} not found"),
            Self::ShiftNotFound(id) => write!(f, "Shift {id} not found"),
            Self::WorkerNotFound(id) => write!(f, "Worker {id} not found"),
            Self::AssignmentNotFound(id) => write!(f, "Assignment {id} not found"),
            Self::VenueNotFound(id) => write!(f, "Venue {id} not found"),
            Self::CertificationNotFound(id) => write!(f, "Certification {id} not found"),
            Self::IneligibleWorker {
                worker_id,
                shift_id,
                reasons,
            } => {
                let codes: Vec<&str> = reasons.iter().map(IneligibilityReason::as_str).collect();
                match worker_id {
                    Some(id) => write!(
                        f,
                        "Worker {id} is not eligible for shift {shift_id}: {}",
                        codes.join(", ")
                    ),
                    None => write!(
                        f,
                        "Worker is not eligible for shift {shift_id}: {}",
                        codes.join(", ")
                    ),
                }
            }
            Self::ShiftAtCapacity { shift_id, capacity } => {
                write!(
                    f,
                    "Shift {shift_id} is already fully staffed (capacity {capacity})"
                )
            }
            Self::ShiftNotAssignable { shift_id, status } => {
                write!(
                    f,
                    "Shift {shift_id} in status '{status}' does not accept assignments"
                )
            }
            Self::ShiftNotFullyStaffed {
                shift_id,
                percentage,
            } => {
                write!(
                    f,
                    "Shift {shift_id} must be fully staffed before it can be marked assigned (currently {percentage}%)"
                )
            }
            Self::InvalidShiftTransition { from, to } => {
                write!(f, "Shift status cannot transition from '{from}' to '{to}'")
            }
            Self::InvalidAssignmentTransition { from, to } => {
                write!(
                    f,
                    "Assignment status cannot transition from '{from}' to '{to}'"
                )
            }
            Self::InvalidEventTransition { from, to } => {
                write!(f, "Event status cannot transition from '{from}' to '{to}'")
            }
            Self::InvalidTimestamp { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
