// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event graph loading.
//!
//! An event graph is loaded in five queries regardless of how many shifts
//! the event has. Staffing views are computed from the loaded graph.

use crewcall::EventGraph;
use crewcall_domain::{Assignment, Event, EventSchedule, EventSkillRequirement, Shift};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{AssignmentRow, EventRow, RequirementRow, ScheduleRow, ShiftRow};
use crate::diesel_schema::{assignments, event_schedules, event_skill_requirements, events, shifts};
use crate::error::PersistenceError;

/// Loads a single event.
///
/// # Errors
///
/// Returns `NotFound` if the event does not exist.
pub fn load_event(conn: &mut SqliteConnection, event_id: i64) -> Result<Event, PersistenceError> {
    let row: EventRow = events::table
        .filter(events::event_id.eq(event_id))
        .select(EventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Event {event_id}")))?;

    Event::try_from(row)
}

/// Loads an event together with everything the staffing engine needs.
///
/// # Errors
///
/// Returns `NotFound` if the event does not exist, or `ReconstructionError`
/// if a stored row is invalid.
pub fn load_event_graph(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<EventGraph, PersistenceError> {
    let event: Event = load_event(conn, event_id)?;

    let schedule: Option<EventSchedule> = event_schedules::table
        .filter(event_schedules::event_id.eq(event_id))
        .select(ScheduleRow::as_select())
        .first(conn)
        .optional()?
        .map(EventSchedule::try_from)
        .transpose()?;

    let requirements: Vec<EventSkillRequirement> = event_skill_requirements::table
        .filter(event_skill_requirements::event_id.eq(event_id))
        .order(event_skill_requirements::requirement_id.asc())
        .select(RequirementRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EventSkillRequirement::try_from)
        .collect::<Result<_, _>>()?;

    let shifts: Vec<Shift> = shifts::table
        .filter(shifts::event_id.eq(event_id))
        .order(shifts::shift_id.asc())
        .select(ShiftRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Shift::try_from)
        .collect::<Result<_, _>>()?;

    let assignments: Vec<Assignment> = assignments::table
        .inner_join(shifts::table)
        .filter(shifts::event_id.eq(event_id))
        .order(assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Assignment::try_from)
        .collect::<Result<_, _>>()?;

    debug!(
        event_id,
        requirements = requirements.len(),
        shifts = shifts.len(),
        assignments = assignments.len(),
        "Loaded event graph"
    );

    Ok(EventGraph {
        event,
        schedule,
        requirements,
        shifts,
        assignments,
    })
}

/// Resolves the event a shift belongs to.
///
/// # Errors
///
/// Returns `NotFound` if the shift does not exist.
pub fn find_event_id_for_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<i64, PersistenceError> {
    shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(shifts::event_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Shift {shift_id}")))
}

/// Resolves the event an assignment belongs to.
///
/// # Errors
///
/// Returns `NotFound` if the assignment does not exist.
pub fn find_event_id_for_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<i64, PersistenceError> {
    assignments::table
        .inner_join(shifts::table)
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(shifts::event_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Assignment {assignment_id}")))
}

/// Lists every event id, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_event_ids(conn: &mut SqliteConnection) -> Result<Vec<i64>, PersistenceError> {
    Ok(events::table
        .select(events::event_id)
        .order(events::event_id.asc())
        .load(conn)?)
}

/// Counts the shifts of an event.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_shifts(conn: &mut SqliteConnection, event_id: i64) -> Result<i64, PersistenceError> {
    Ok(shifts::table
        .filter(shifts::event_id.eq(event_id))
        .count()
        .get_result(conn)?)
}

/// Counts the active assignments on a shift.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_assignments(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::shift_id.eq(shift_id))
        .filter(assignments::status.eq_any(crewcall_domain::AssignmentStatus::ACTIVE_STRS))
        .count()
        .get_result(conn)?)
}
