// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall_domain::{EventStatus, ShiftStatus};

/// A staffing write, expressed as data.
///
/// Every command applies to one catering event's [`EventGraph`](crate::EventGraph).
/// Commands are the only way to change shifts, assignments, or event status.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Delete unassigned shifts and regenerate them from the requirements.
    GenerateShifts,
    /// Replace unassigned damaged shifts and top up the per-role deficit.
    RepairShifts,
    /// Assign a worker to a shift.
    Assign {
        worker_id: i64,
        shift_id: i64,
        /// Explicit rate; resolved from the requirement or policy when absent.
        hourly_rate: Option<f64>,
    },
    /// The worker acknowledged the shift.
    ConfirmAssignment { assignment_id: i64 },
    /// Cancel an assignment, freeing its slot.
    Unassign {
        assignment_id: i64,
        reason: Option<String>,
    },
    /// Record that the worker did not show up, freeing the slot.
    MarkNoShow {
        assignment_id: i64,
        notes: Option<String>,
    },
    /// Record hours worked. Repeating it on a completed assignment corrects the hours.
    RecordCompletion {
        assignment_id: i64,
        hours_worked: f64,
    },
    /// Move a shift through its status workflow.
    TransitionShiftStatus {
        shift_id: i64,
        target: ShiftStatus,
    },
    /// Move the event through its lifecycle. Publishing cascades to draft shifts.
    TransitionEventStatus { target: EventStatus },
}

impl Command {
    /// Stable name used as the audit action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GenerateShifts => "GenerateShifts",
            Self::RepairShifts => "RepairShifts",
            Self::Assign { .. } => "Assign",
            Self::ConfirmAssignment { .. } => "ConfirmAssignment",
            Self::Unassign { .. } => "Unassign",
            Self::MarkNoShow { .. } => "MarkNoShow",
            Self::RecordCompletion { .. } => "RecordCompletion",
            Self::TransitionShiftStatus { .. } => "TransitionShiftStatus",
            Self::TransitionEventStatus { .. } => "TransitionEventStatus",
        }
    }
}
