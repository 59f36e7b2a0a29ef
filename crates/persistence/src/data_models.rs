// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain values.
//!
//! Timestamps are stored as RFC 3339 text in UTC. Statuses are stored as
//! their lowercase string form. Conversion failures surface as
//! `PersistenceError::ReconstructionError` so a damaged row never panics.

use std::collections::BTreeSet;
use std::str::FromStr;

use crewcall_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use crewcall_domain::{
    Assignment, AssignmentStatus, Capacity, Certification, Event, EventSchedule,
    EventSkillRequirement, EventStatus, Shift, ShiftStatus, SkillName, Venue, Worker,
    WorkerCertification,
};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

use crate::diesel_schema::{
    assignments, audit_events, certifications, event_schedules, event_skill_requirements, events,
    shifts, venues, worker_certifications, workers,
};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be rendered as RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(at.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `ReconstructionError` if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid timestamp '{value}': {e}"))
    })
}

fn reconstruct<E: std::fmt::Display>(err: E) -> PersistenceError {
    PersistenceError::ReconstructionError(err.to_string())
}

fn parse_skill(value: &str) -> Result<SkillName, PersistenceError> {
    SkillName::parse(value).map_err(reconstruct)
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VenueRow {
    pub venue_id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival_instructions: Option<String>,
    pub parking_instructions: Option<String>,
    pub timezone: String,
}

impl From<VenueRow> for Venue {
    fn from(row: VenueRow) -> Self {
        Self {
            venue_id: Some(row.venue_id),
            name: row.name,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            arrival_instructions: row.arrival_instructions,
            parking_instructions: row.parking_instructions,
            timezone: row.timezone,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = certifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CertificationRow {
    pub certification_id: i64,
    pub name: String,
}

impl From<CertificationRow> for Certification {
    fn from(row: CertificationRow) -> Self {
        Self {
            certification_id: Some(row.certification_id),
            name: row.name,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = workers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkerRow {
    pub worker_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = worker_certifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkerCertificationRow {
    pub certification_id: i64,
    pub expires_at: String,
}

impl WorkerRow {
    /// Assembles a worker from its row, skill names, and certification rows.
    ///
    /// # Errors
    ///
    /// Returns `ReconstructionError` if a skill name or expiry is invalid.
    pub fn into_domain(
        self,
        skill_names: &[String],
        certifications: Vec<WorkerCertificationRow>,
    ) -> Result<Worker, PersistenceError> {
        let skills: BTreeSet<SkillName> = skill_names
            .iter()
            .map(|s| parse_skill(s))
            .collect::<Result<_, _>>()?;

        let certifications: Vec<WorkerCertification> = certifications
            .into_iter()
            .map(|c| {
                Ok(WorkerCertification {
                    certification_id: c.certification_id,
                    expires_at: parse_timestamp(&c.expires_at)?,
                })
            })
            .collect::<Result<_, PersistenceError>>()?;

        Ok(Worker {
            worker_id: Some(self.worker_id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            active: self.is_active != 0,
            skills,
            certifications,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub event_id: i64,
    pub title: String,
    pub status: String,
    pub venue_id: i64,
    pub check_in_instructions: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_phone: Option<String>,
}

impl TryFrom<EventRow> for Event {
    type Error = PersistenceError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            event_id: Some(row.event_id),
            title: row.title,
            status: EventStatus::from_str(&row.status).map_err(reconstruct)?,
            venue_id: row.venue_id,
            check_in_instructions: row.check_in_instructions,
            supervisor_name: row.supervisor_name,
            supervisor_phone: row.supervisor_phone,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = event_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScheduleRow {
    pub start_time: String,
    pub end_time: String,
    pub break_minutes: i32,
}

impl TryFrom<ScheduleRow> for EventSchedule {
    type Error = PersistenceError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let break_minutes: u32 = row.break_minutes.to_u32().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "negative break minutes: {}",
                row.break_minutes
            ))
        })?;
        Self::new(
            parse_timestamp(&row.start_time)?,
            parse_timestamp(&row.end_time)?,
            break_minutes,
        )
        .map_err(reconstruct)
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = event_skill_requirements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RequirementRow {
    pub requirement_id: i64,
    pub skill_name: String,
    pub needed_workers: i32,
    pub uniform_name: Option<String>,
    pub certification_id: Option<i64>,
    pub pay_rate: Option<f64>,
}

impl TryFrom<RequirementRow> for EventSkillRequirement {
    type Error = PersistenceError;

    fn try_from(row: RequirementRow) -> Result<Self, Self::Error> {
        Ok(Self {
            requirement_id: Some(row.requirement_id),
            skill_name: parse_skill(&row.skill_name)?,
            needed_workers: row.needed_workers,
            uniform_name: row.uniform_name,
            required_certification: row.certification_id,
            pay_rate: row.pay_rate,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = shifts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ShiftRow {
    pub shift_id: i64,
    pub event_id: i64,
    pub role_needed: Option<String>,
    pub capacity: Option<i32>,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub certification_id: Option<i64>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = PersistenceError;

    /// A null role or capacity loads as `None`, and so does a role that is
    /// not a valid skill name. The shift is then an anomaly for the repair
    /// operation rather than a load failure.
    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let role_needed: Option<SkillName> = row.role_needed.as_deref().and_then(|role| {
            SkillName::parse(role)
                .map_err(|e| warn!(shift_id = row.shift_id, role, "Unreadable shift role: {e}"))
                .ok()
        });

        let capacity: Option<Capacity> = row
            .capacity
            .map(|c| {
                let slots: u32 = c.to_u32().ok_or_else(|| {
                    PersistenceError::ReconstructionError(format!("negative capacity: {c}"))
                })?;
                Capacity::new(slots).map_err(reconstruct)
            })
            .transpose()?;

        Ok(Self {
            shift_id: row.shift_id,
            event_id: row.event_id,
            role_needed,
            capacity,
            start_time: parse_timestamp(&row.start_time)?,
            end_time: parse_timestamp(&row.end_time)?,
            status: ShiftStatus::from_str(&row.status).map_err(reconstruct)?,
            required_certification: row.certification_id,
        })
    }
}

/// Insert form of a shift, used for the single-statement bulk insert.
///
/// `None` is written as `NULL` so every row has the same column list and
/// `SQLite` can take the whole batch in one `INSERT`.
#[derive(Debug, Insertable)]
#[diesel(table_name = shifts)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewShiftRow<'a> {
    pub event_id: i64,
    pub role_needed: &'a str,
    pub capacity: i32,
    pub start_time: String,
    pub end_time: String,
    pub status: &'a str,
    pub certification_id: Option<i64>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub worker_id: i64,
    pub assigned_by: String,
    pub assigned_at: String,
    pub status: String,
    pub hours_worked: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub notes: Option<String>,
    pub updated_at: String,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = PersistenceError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            assignment_id: row.assignment_id,
            shift_id: row.shift_id,
            worker_id: row.worker_id,
            assigned_by: row.assigned_by,
            assigned_at: parse_timestamp(&row.assigned_at)?,
            status: AssignmentStatus::from_str(&row.status).map_err(reconstruct)?,
            hours_worked: row.hours_worked,
            hourly_rate: row.hourly_rate,
            notes: row.notes,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditEventRow {
    pub audit_event_id: i64,
    pub event_id: Option<i64>,
    pub shift_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&row.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

        let mut event = Self::new(
            Actor::new(actor_data.id, actor_data.actor_type),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
            row.event_id,
        );
        event.audit_event_id = Some(row.audit_event_id);
        event.shift_id = row.shift_id;
        Ok(event)
    }
}

/// Insert form of an audit event, with every JSON column serialized.
#[derive(Debug, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow<'a> {
    pub event_id: Option<i64>,
    pub shift_id: Option<i64>,
    pub actor_id: &'a str,
    pub actor_type: &'a str,
    pub action_name: &'a str,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}

impl<'a> TryFrom<&'a AuditEvent> for NewAuditEventRow<'a> {
    type Error = PersistenceError;

    fn try_from(event: &'a AuditEvent) -> Result<Self, Self::Error> {
        let snapshot = |data: &str| {
            serde_json::to_string(&StateSnapshotData {
                data: data.to_string(),
            })
        };

        Ok(Self {
            event_id: event.event_id,
            shift_id: event.shift_id,
            actor_id: &event.actor.id,
            actor_type: &event.actor.actor_type,
            action_name: &event.action.name,
            actor_json: serde_json::to_string(&ActorData {
                id: event.actor.id.clone(),
                actor_type: event.actor.actor_type.clone(),
            })?,
            cause_json: serde_json::to_string(&CauseData {
                id: event.cause.id.clone(),
                description: event.cause.description.clone(),
            })?,
            action_json: serde_json::to_string(&ActionData {
                name: event.action.name.clone(),
                details: event.action.details.clone(),
            })?,
            before_snapshot_json: snapshot(&event.before.data)?,
            after_snapshot_json: snapshot(&event.after.data)?,
        })
    }
}

/// One line of the timesheet export: a completed assignment with the
/// worker and shift details the payroll workflow needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetEntry {
    pub assignment_id: i64,
    pub worker_id: i64,
    pub worker_name: String,
    /// `None` for a damaged shift.
    pub role: Option<String>,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub hours_worked: Option<f64>,
    pub hourly_rate: Option<f64>,
}

impl TimesheetEntry {
    /// Hours times rate, when both are known.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.hours_worked
            .zip(self.hourly_rate)
            .map(|(hours, rate)| hours * rate)
    }
}
