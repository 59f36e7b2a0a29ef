// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps cross the boundary as RFC 3339 strings and statuses as their
//! lowercase names.

use crewcall_domain::{EventStaffingProgress, ShiftAnomaly, ShiftStaffingProgress};
use serde::{Deserialize, Serialize};

/// API request to add a skill to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSkillRequest {
    /// The skill name.
    pub name: String,
}

/// API request to add a certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCertificationRequest {
    /// The certification name.
    pub name: String,
}

/// API response for a created skill or certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReferenceResponse {
    /// The canonical identifier.
    pub id: i64,
    /// The stored name.
    pub name: String,
    /// A success message.
    pub message: String,
}

/// API request to create a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub arrival_instructions: Option<String>,
    #[serde(default)]
    pub parking_instructions: Option<String>,
    /// IANA timezone, e.g. `America/New_York`.
    pub timezone: String,
}

/// A certification held by a new worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldCertification {
    pub certification_id: i64,
    /// RFC 3339 expiry.
    pub expires_at: String,
}

/// API request to create a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Skill names; each must be in the catalog.
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<HeldCertification>,
}

/// API request to grant or renew a worker's certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantCertificationRequest {
    pub certification_id: i64,
    /// RFC 3339 expiry.
    pub expires_at: String,
}

/// API request to activate or deactivate a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetWorkerActiveRequest {
    pub active: bool,
}

/// A worker as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub worker_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub skills: Vec<String>,
    pub certification_ids: Vec<i64>,
}

/// API response for listing workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWorkersResponse {
    pub workers: Vec<WorkerInfo>,
}

/// An event schedule as entered by an admin.
///
/// `utc` takes RFC 3339 timestamps. `local` takes a date and wall-clock
/// times at the event's venue; an end at or before the start falls on the
/// next day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleInput {
    Utc {
        start_time: String,
        end_time: String,
        #[serde(default)]
        break_minutes: u32,
    },
    Local {
        /// `YYYY-MM-DD`.
        date: String,
        /// `HH:MM`.
        start: String,
        /// `HH:MM`.
        end: String,
        #[serde(default)]
        break_minutes: u32,
    },
}

/// One skill requirement of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementInput {
    pub skill_name: String,
    pub needed_workers: u32,
    #[serde(default)]
    pub uniform_name: Option<String>,
    #[serde(default)]
    pub certification_id: Option<i64>,
    #[serde(default)]
    pub pay_rate: Option<f64>,
}

/// API request to create an event.
///
/// Events are created as drafts; publishing is a status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub venue_id: i64,
    #[serde(default)]
    pub check_in_instructions: Option<String>,
    #[serde(default)]
    pub supervisor_name: Option<String>,
    #[serde(default)]
    pub supervisor_phone: Option<String>,
    #[serde(default)]
    pub schedule: Option<ScheduleInput>,
    #[serde(default)]
    pub requirements: Vec<RequirementInput>,
}

/// API response for a successful event creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub event_id: i64,
    pub title: String,
    /// Sum of the requirement counts.
    pub total_workers_needed: u32,
    pub message: String,
}

/// API request to replace every requirement of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceRequirementsRequest {
    pub requirements: Vec<RequirementInput>,
}

/// API request to set an event's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScheduleRequest {
    pub schedule: ScheduleInput,
}

/// A schedule as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub start_time: String,
    pub end_time: String,
    pub break_minutes: u32,
}

/// API response for reference-data writes that return no new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// A success message.
    pub message: String,
}

/// API response for shift generation and repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSyncResponse {
    pub event_id: i64,
    pub audit_event_id: i64,
    pub created: usize,
    pub deleted_shift_ids: Vec<i64>,
    /// Shifts kept because they hold an active assignment.
    pub retained_shift_ids: Vec<i64>,
    /// Damaged shifts that hold an active assignment and were left alone.
    pub flagged_shift_ids: Vec<i64>,
    pub anomalies: Vec<ShiftAnomaly>,
    pub warnings: Vec<String>,
}

/// API request to assign a worker to a shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignWorkerRequest {
    pub shift_id: i64,
    pub worker_id: i64,
    /// Explicit rate; resolved from the requirement or the default when absent.
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}

/// API request to assign many workers round-robin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAssignRequest {
    pub worker_ids: Vec<i64>,
    pub shift_ids: Vec<i64>,
    /// One rate for every shift; resolved per shift when absent.
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}

/// The outcome of one shift in a bulk assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignItem {
    pub shift_id: i64,
    /// `None` when the shift was full before pairing.
    pub worker_id: Option<i64>,
    pub success: bool,
    pub assignment_id: Option<i64>,
    pub error: Option<String>,
}

/// API response for a bulk assignment, one entry per requested shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignResponse {
    pub results: Vec<BulkAssignItem>,
    pub succeeded: usize,
    pub failed: usize,
}

/// API request to cancel an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnassignRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to record a no-show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkNoShowRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to record hours worked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordCompletionRequest {
    pub hours_worked: f64,
}

/// An assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub worker_id: i64,
    pub assigned_by: String,
    pub assigned_at: String,
    pub status: String,
    pub hours_worked: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub notes: Option<String>,
}

/// API response for an assignment write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub assignment: AssignmentInfo,
    pub audit_event_id: i64,
    /// Non-fatal findings, such as hours above the scheduled length.
    pub warnings: Vec<String>,
}

/// API request to move a shift or an event to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStatusRequest {
    /// Lowercase target status.
    pub status: String,
}

/// API response for a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStatusResponse {
    pub from: String,
    pub to: String,
    pub audit_event_id: i64,
    pub message: String,
}

/// A shift with its staffing progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInfo {
    pub shift_id: i64,
    pub event_id: i64,
    /// `None` for a damaged shift.
    pub role_needed: Option<String>,
    /// `None` for a damaged shift.
    pub capacity: Option<u32>,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub required_certification: Option<i64>,
    pub progress: ShiftStaffingProgress,
}

/// API response for an event's staffing overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStaffingResponse {
    pub event_id: i64,
    pub title: String,
    pub status: String,
    pub schedule: Option<ScheduleInfo>,
    pub progress: EventStaffingProgress,
    pub shifts: Vec<ShiftInfo>,
}

/// API response for an eligibility preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub shift_id: i64,
    pub worker_id: i64,
    pub eligible: bool,
    /// Stable reason codes, empty when eligible.
    pub reasons: Vec<String>,
}

/// An audit event as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    pub audit_event_id: Option<i64>,
    pub event_id: Option<i64>,
    pub shift_id: Option<i64>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_snapshot: String,
    pub after_snapshot: String,
}
