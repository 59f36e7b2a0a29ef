// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall_audit::{AuditEvent, StateSnapshot};
use crewcall_domain::{
    Assignment, AssignmentStatus, DomainError, EligibilityPolicy, Event, EventSchedule,
    EventSkillRequirement, EventStaffingProgress, EventStatus, HoursPolicy, NewAssignment, Shift,
    ShiftStaffingProgress, ShiftStatus, ShiftSyncPlan, Worker, WorkerBooking,
    event_staffing_progress, shift_staffing_progress,
};
use time::OffsetDateTime;

/// Everything the engine needs to know about one catering event.
///
/// The graph is loaded eagerly, in a fixed number of queries, and every
/// staffing view and command works on it without further I/O. `assignments`
/// includes inactive rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EventGraph {
    pub event: Event,
    pub schedule: Option<EventSchedule>,
    pub requirements: Vec<EventSkillRequirement>,
    pub shifts: Vec<Shift>,
    pub assignments: Vec<Assignment>,
}

impl EventGraph {
    /// The persisted event id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEvent` if the event was never persisted.
    pub fn event_id(&self) -> Result<i64, DomainError> {
        self.event.event_id.ok_or_else(|| {
            DomainError::InvalidEvent(String::from("event graph holds an unpersisted event"))
        })
    }

    /// Looks up a shift of this event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ShiftNotFound` if the shift is not part of the event.
    pub fn shift(&self, shift_id: i64) -> Result<&Shift, DomainError> {
        self.shifts
            .iter()
            .find(|s| s.shift_id == shift_id)
            .ok_or(DomainError::ShiftNotFound(shift_id))
    }

    /// Looks up an assignment on one of this event's shifts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AssignmentNotFound` if it is not part of the event.
    pub fn assignment(&self, assignment_id: i64) -> Result<&Assignment, DomainError> {
        self.assignments
            .iter()
            .find(|a| a.assignment_id == assignment_id)
            .ok_or(DomainError::AssignmentNotFound(assignment_id))
    }

    /// Active assignments on a shift.
    pub fn active_assignments_on(&self, shift_id: i64) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.shift_id == shift_id && a.is_active())
    }

    /// Shift-level staffing progress.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ShiftNotFound` if the shift is not part of the event.
    pub fn shift_progress(&self, shift_id: i64) -> Result<ShiftStaffingProgress, DomainError> {
        let shift = self.shift(shift_id)?;
        Ok(shift_staffing_progress(shift, &self.assignments))
    }

    /// Event-level staffing progress, including the per-role breakdown.
    #[must_use]
    pub fn staffing_progress(&self) -> EventStaffingProgress {
        event_staffing_progress(&self.requirements, &self.shifts, &self.assignments)
    }

    /// Audit rendering of the event's staffing state.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let progress = self.staffing_progress();
        StateSnapshot::new(format!(
            "event_status={},shifts={},assigned={},required={}",
            self.event.status,
            self.shifts.len(),
            progress.assigned,
            progress.required
        ))
    }
}

/// A worker together with their active bookings across all events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerProfile {
    pub worker: Worker,
    pub bookings: Vec<WorkerBooking>,
}

/// Configurable staffing rules.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaffingPolicy {
    pub eligibility: EligibilityPolicy,
    pub hours: HoursPolicy,
    /// Used when neither the caller nor the matching requirement gives a rate.
    pub default_hourly_rate: Option<f64>,
}

/// Inputs to [`apply`](crate::apply) beyond the event graph and the command.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext<'a> {
    /// The worker named by an `Assign` command. Ignored otherwise.
    pub worker: Option<&'a WorkerProfile>,
    pub policy: &'a StaffingPolicy,
    pub now: OffsetDateTime,
}

/// The store write a successful command requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Delete, keep, and create shifts per the plan.
    SyncShifts(ShiftSyncPlan),
    /// Insert a new assignment. The store enforces one active assignment
    /// per shift and reports a conflict if it loses a race.
    CreateAssignment(NewAssignment),
    /// Overwrite an assignment's status, hours, and notes. The store writes
    /// only while the row still holds `from`, the status the command was
    /// validated against.
    UpdateAssignment {
        from: AssignmentStatus,
        assignment: Assignment,
    },
    /// Set a shift's status.
    UpdateShiftStatus { shift_id: i64, status: ShiftStatus },
    /// Set the event's status and move the listed shifts to `published`.
    UpdateEventStatus {
        event_id: i64,
        status: EventStatus,
        published_shift_ids: Vec<i64>,
    },
}

/// Something the caller should surface, even though the command succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionWarning {
    /// Hours recorded exceed the shift's scheduled length.
    HoursExceedSchedule {
        assignment_id: i64,
        hours_worked: f64,
        scheduled_hours: f64,
    },
    /// Damaged shifts holding an active assignment were left for an operator.
    FlaggedShifts { shift_ids: Vec<i64> },
}

impl std::fmt::Display for TransitionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HoursExceedSchedule {
                assignment_id,
                hours_worked,
                scheduled_hours,
            } => write!(
                f,
                "Assignment {assignment_id} recorded {hours_worked} hours, more than the {scheduled_hours:.2} scheduled"
            ),
            Self::FlaggedShifts { shift_ids } => {
                let ids: Vec<String> = shift_ids.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "Shifts {} are damaged but hold active assignments and were left untouched",
                    ids.join(", ")
                )
            }
        }
    }
}

/// The result of a successful command.
///
/// Nothing has been written yet. The caller persists `mutation` and
/// `audit_event` together in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    pub mutation: Mutation,
    pub audit_event: AuditEvent,
    pub warnings: Vec<TransitionWarning>,
}

/// Renders an assignment for audit snapshots.
pub(crate) fn assignment_snapshot(assignment: &Assignment) -> StateSnapshot {
    StateSnapshot::new(format!(
        "assignment_id={},shift_id={},worker_id={},status={},hours_worked={}",
        assignment.assignment_id,
        assignment.shift_id,
        assignment.worker_id,
        assignment.status,
        assignment
            .hours_worked
            .map_or_else(|| String::from("none"), |h| h.to_string())
    ))
}

/// Renders a shift's occupancy for audit snapshots.
pub(crate) fn shift_snapshot(shift: &Shift, active: usize, status: ShiftStatus) -> StateSnapshot {
    StateSnapshot::new(format!(
        "shift_id={},status={status},active_assignments={active}",
        shift.shift_id
    ))
}
