// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persisting the outcome of a staffing command.
//!
//! The mutation and its audit event are written in one `IMMEDIATE`
//! transaction. The engine validated the command against a snapshot; this
//! module re-checks the few facts that a concurrent writer could have
//! changed since, and reports a conflict instead of writing over them.

use crewcall::{Mutation, TransitionResult};
use crewcall_domain::{
    Assignment, AssignmentStatus, EventStatus, NewAssignment, ShiftStatus, ShiftSyncPlan,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use num_traits::ToPrimitive;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewShiftRow, format_timestamp};
use crate::diesel_schema::{assignments, events, shifts};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// What a persisted transition produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistTransitionResult {
    /// The audit event written with the mutation.
    pub audit_event_id: i64,
    /// The new assignment, for `CreateAssignment`.
    pub assignment_id: Option<i64>,
    /// Shifts inserted by a sync.
    pub shifts_created: usize,
    /// Shifts deleted by a sync.
    pub shifts_deleted: usize,
}

/// Persists a transition result: the mutation and its audit event.
///
/// # Errors
///
/// - `ActiveAssignmentConflict` if another active assignment won the shift
/// - `StaleGraph` if a shift planned for deletion gained an assignment or
///   was already removed, or if an assignment changed status since it was read
/// - `NotFound` if an updated row no longer exists
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let mut outcome = PersistTransitionResult::default();

        match &result.mutation {
            Mutation::SyncShifts(plan) => {
                let (deleted, created) = sync_shifts(conn, plan)?;
                outcome.shifts_deleted = deleted;
                outcome.shifts_created = created;
            }
            Mutation::CreateAssignment(new_assignment) => {
                outcome.assignment_id = Some(insert_assignment(conn, new_assignment)?);
            }
            Mutation::UpdateAssignment { from, assignment } => {
                update_assignment(conn, *from, assignment)?;
            }
            Mutation::UpdateShiftStatus { shift_id, status } => {
                update_shift_status(conn, *shift_id, *status)?;
            }
            Mutation::UpdateEventStatus {
                event_id,
                status,
                published_shift_ids,
            } => {
                update_event_status(conn, *event_id, *status, published_shift_ids)?;
            }
        }

        outcome.audit_event_id = persist_audit_event(conn, &result.audit_event)?;

        info!(
            audit_event_id = outcome.audit_event_id,
            action = %result.audit_event.action.name,
            event_id = ?result.audit_event.event_id,
            shift_id = ?result.audit_event.shift_id,
            "Persisted transition"
        );

        Ok(outcome)
    })
}

fn sync_shifts(
    conn: &mut SqliteConnection,
    plan: &ShiftSyncPlan,
) -> Result<(usize, usize), PersistenceError> {
    let mut deleted: usize = 0;

    if !plan.delete_shift_ids.is_empty() {
        let occupied: Vec<i64> = assignments::table
            .filter(assignments::shift_id.eq_any(&plan.delete_shift_ids))
            .filter(assignments::status.eq_any(AssignmentStatus::ACTIVE_STRS))
            .select(assignments::shift_id)
            .load(conn)?;
        if !occupied.is_empty() {
            return Err(PersistenceError::StaleGraph(format!(
                "shifts {occupied:?} gained an active assignment"
            )));
        }

        deleted = diesel::delete(
            shifts::table.filter(shifts::shift_id.eq_any(&plan.delete_shift_ids)),
        )
        .execute(conn)?;
        if deleted != plan.delete_shift_ids.len() {
            return Err(PersistenceError::StaleGraph(format!(
                "expected to delete {} shifts, found {deleted}",
                plan.delete_shift_ids.len()
            )));
        }
    }

    let mut rows: Vec<NewShiftRow<'_>> = Vec::with_capacity(plan.create.len());
    for shift in &plan.create {
        let capacity: i32 = shift.capacity.value().to_i32().ok_or_else(|| {
            PersistenceError::SerializationError(format!(
                "capacity out of range: {}",
                shift.capacity.value()
            ))
        })?;
        rows.push(NewShiftRow {
            event_id: shift.event_id,
            role_needed: shift.role_needed.value(),
            capacity,
            start_time: format_timestamp(shift.start_time)?,
            end_time: format_timestamp(shift.end_time)?,
            status: shift.status.as_str(),
            certification_id: shift.required_certification,
        });
    }

    let created: usize = if rows.is_empty() {
        0
    } else {
        diesel::insert_into(shifts::table)
            .values(&rows)
            .execute(conn)?
    };

    debug!(deleted, created, "Synced shifts");
    Ok((deleted, created))
}

fn insert_assignment(
    conn: &mut SqliteConnection,
    new_assignment: &NewAssignment,
) -> Result<i64, PersistenceError> {
    let assigned_at: String = format_timestamp(new_assignment.assigned_at)?;

    let inserted = diesel::insert_into(assignments::table)
        .values((
            assignments::shift_id.eq(new_assignment.shift_id),
            assignments::worker_id.eq(new_assignment.worker_id),
            assignments::assigned_by.eq(&new_assignment.assigned_by),
            assignments::assigned_at.eq(&assigned_at),
            assignments::status.eq(new_assignment.status.as_str()),
            assignments::hourly_rate.eq(new_assignment.hourly_rate),
            assignments::updated_at.eq(&assigned_at),
        ))
        .execute(conn);

    match inserted {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::ActiveAssignmentConflict {
                shift_id: new_assignment.shift_id,
            });
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    get_last_insert_rowid(conn)
}

fn update_assignment(
    conn: &mut SqliteConnection,
    from: AssignmentStatus,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        assignments::table
            .filter(assignments::assignment_id.eq(assignment.assignment_id))
            .filter(assignments::status.eq(from.as_str())),
    )
    .set((
        assignments::status.eq(assignment.status.as_str()),
        assignments::hours_worked.eq(assignment.hours_worked),
        assignments::hourly_rate.eq(assignment.hourly_rate),
        assignments::notes.eq(&assignment.notes),
        assignments::updated_at.eq(format_timestamp(assignment.updated_at)?),
    ))
    .execute(conn)?;

    if updated == 0 {
        let current: Option<String> = assignments::table
            .filter(assignments::assignment_id.eq(assignment.assignment_id))
            .select(assignments::status)
            .first(conn)
            .optional()?;
        return Err(match current {
            Some(status) => PersistenceError::StaleGraph(format!(
                "assignment {} is {status}, expected {from}",
                assignment.assignment_id
            )),
            None => PersistenceError::NotFound(format!(
                "Assignment {}",
                assignment.assignment_id
            )),
        });
    }
    Ok(())
}

fn update_shift_status(
    conn: &mut SqliteConnection,
    shift_id: i64,
    status: ShiftStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(shifts::table.filter(shifts::shift_id.eq(shift_id)))
        .set(shifts::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Shift {shift_id}")));
    }
    Ok(())
}

fn update_event_status(
    conn: &mut SqliteConnection,
    event_id: i64,
    status: EventStatus,
    published_shift_ids: &[i64],
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(events::table.filter(events::event_id.eq(event_id)))
        .set(events::status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Event {event_id}")));
    }

    if !published_shift_ids.is_empty() {
        let published: usize = diesel::update(
            shifts::table
                .filter(shifts::shift_id.eq_any(published_shift_ids))
                .filter(shifts::status.eq(ShiftStatus::Draft.as_str())),
        )
        .set(shifts::status.eq(ShiftStatus::Published.as_str()))
        .execute(conn)?;
        debug!(event_id, published, "Published draft shifts");
    }

    Ok(())
}
