// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker queries.

use std::collections::HashMap;

use crewcall::WorkerProfile;
use crewcall_domain::{AssignmentStatus, Worker, WorkerBooking};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{WorkerCertificationRow, WorkerRow, parse_timestamp};
use crate::diesel_schema::{assignments, shifts, worker_certifications, worker_skills, workers};
use crate::error::PersistenceError;

/// Loads a worker with skills and certifications.
///
/// # Errors
///
/// Returns `NotFound` if the worker does not exist.
pub fn load_worker(conn: &mut SqliteConnection, worker_id: i64) -> Result<Worker, PersistenceError> {
    let row: WorkerRow = workers::table
        .filter(workers::worker_id.eq(worker_id))
        .select(WorkerRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Worker {worker_id}")))?;

    let skills: Vec<String> = worker_skills::table
        .filter(worker_skills::worker_id.eq(worker_id))
        .select(worker_skills::skill_name)
        .order(worker_skills::skill_name.asc())
        .load(conn)?;

    let certifications: Vec<WorkerCertificationRow> = worker_certifications::table
        .filter(worker_certifications::worker_id.eq(worker_id))
        .select(WorkerCertificationRow::as_select())
        .load(conn)?;

    row.into_domain(&skills, certifications)
}

/// Loads a worker together with their active bookings across all events.
///
/// # Errors
///
/// Returns `NotFound` if the worker does not exist.
pub fn load_worker_profile(
    conn: &mut SqliteConnection,
    worker_id: i64,
) -> Result<WorkerProfile, PersistenceError> {
    let worker: Worker = load_worker(conn, worker_id)?;

    let rows: Vec<(i64, i64, String, String)> = assignments::table
        .inner_join(shifts::table)
        .filter(assignments::worker_id.eq(worker_id))
        .filter(assignments::status.eq_any(AssignmentStatus::ACTIVE_STRS))
        .select((
            assignments::assignment_id,
            assignments::shift_id,
            shifts::start_time,
            shifts::end_time,
        ))
        .load(conn)?;

    let bookings: Vec<WorkerBooking> = rows
        .into_iter()
        .map(|(assignment_id, shift_id, start, end)| {
            Ok(WorkerBooking {
                assignment_id,
                shift_id,
                start_time: parse_timestamp(&start)?,
                end_time: parse_timestamp(&end)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    debug!(worker_id, bookings = bookings.len(), "Loaded worker profile");

    Ok(WorkerProfile { worker, bookings })
}

/// Lists every worker with skills and certifications.
///
/// Runs three queries regardless of the number of workers.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row is invalid.
pub fn list_workers(conn: &mut SqliteConnection) -> Result<Vec<Worker>, PersistenceError> {
    let rows: Vec<WorkerRow> = workers::table
        .order(workers::worker_id.asc())
        .select(WorkerRow::as_select())
        .load(conn)?;

    let mut skills: HashMap<i64, Vec<String>> = HashMap::new();
    for (worker_id, skill) in worker_skills::table
        .select((worker_skills::worker_id, worker_skills::skill_name))
        .load::<(i64, String)>(conn)?
    {
        skills.entry(worker_id).or_default().push(skill);
    }

    let mut certifications: HashMap<i64, Vec<WorkerCertificationRow>> = HashMap::new();
    for (worker_id, certification_id, expires_at) in worker_certifications::table
        .select((
            worker_certifications::worker_id,
            worker_certifications::certification_id,
            worker_certifications::expires_at,
        ))
        .load::<(i64, i64, String)>(conn)?
    {
        certifications
            .entry(worker_id)
            .or_default()
            .push(WorkerCertificationRow {
                certification_id,
                expires_at,
            });
    }

    rows.into_iter()
        .map(|row| {
            let worker_id = row.worker_id;
            let worker_skills: Vec<String> = skills.remove(&worker_id).unwrap_or_default();
            row.into_domain(
                &worker_skills,
                certifications.remove(&worker_id).unwrap_or_default(),
            )
        })
        .collect()
}
