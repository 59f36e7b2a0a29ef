// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the CrewCall staffing system.
//!
//! Handlers resolve references through the persistence layer, hand the
//! staffing decision to the core engine, and persist its result together
//! with the audit event. Every write names the acting admin explicitly.

mod config;
mod error;
mod handlers;
mod request_response;
mod timesheet;

#[cfg(test)]
mod tests;

use crewcall_audit::Actor;

pub use config::{StaffingConfig, StaffingConfigError};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    assign_worker, bulk_assign, confirm_assignment, create_certification, create_event,
    create_skill, create_venue, create_worker, generate_shifts, get_event_staffing,
    get_role_staffing, get_shift_staffing, grant_certification, list_audit_events, list_workers,
    mark_no_show, preview_eligibility, record_completion, repair_shifts, replace_requirements,
    set_schedule, set_worker_active, transition_event_status, transition_shift_status, unassign,
};
pub use request_response::{
    AssignWorkerRequest, AssignmentInfo, AssignmentResponse, AuditEventInfo, BulkAssignItem,
    BulkAssignRequest, BulkAssignResponse, CreateCertificationRequest, CreateEventRequest,
    CreateEventResponse, CreateReferenceResponse, CreateSkillRequest, CreateVenueRequest,
    CreateWorkerRequest, EligibilityResponse, EventStaffingResponse, GrantCertificationRequest,
    HeldCertification, ListWorkersResponse, MarkNoShowRequest, RecordCompletionRequest,
    ReplaceRequirementsRequest, RequirementInput, ScheduleInfo, ScheduleInput,
    SetScheduleRequest, SetWorkerActiveRequest, ShiftInfo, ShiftSyncResponse,
    TransitionStatusRequest, TransitionStatusResponse, UnassignRequest, WorkerInfo,
    WriteResponse,
};
pub use timesheet::{TIMESHEET_HEADER, export_timesheet};

/// The admin performing a write.
///
/// Passed explicitly into every write; recorded as `assigned_by` on new
/// assignments and as the actor of the audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingAdmin {
    /// The admin's identifier.
    pub id: String,
}

impl ActingAdmin {
    /// Creates an acting admin.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id }
    }

    /// Converts this admin into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::admin(&self.id)
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
