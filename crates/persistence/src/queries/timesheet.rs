// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Completed-assignment reads for the payroll timesheet.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{TimesheetEntry, parse_timestamp};
use crate::diesel_schema::{assignments, shifts, workers};
use crate::error::PersistenceError;

type TimesheetRow = (
    i64,
    i64,
    String,
    Option<String>,
    String,
    String,
    Option<f64>,
    Option<f64>,
);

/// Lists the completed assignments of an event, ordered by shift start.
///
/// # Errors
///
/// Returns an error if the query fails or a timestamp is invalid.
pub fn completed_assignments(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<TimesheetEntry>, PersistenceError> {
    let rows: Vec<TimesheetRow> = assignments::table
        .inner_join(shifts::table)
        .inner_join(workers::table)
        .filter(shifts::event_id.eq(event_id))
        .filter(assignments::status.eq("completed"))
        .order((shifts::start_time.asc(), assignments::assignment_id.asc()))
        .select((
            assignments::assignment_id,
            assignments::worker_id,
            workers::name,
            shifts::role_needed,
            shifts::start_time,
            shifts::end_time,
            assignments::hours_worked,
            assignments::hourly_rate,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(
            |(assignment_id, worker_id, worker_name, role, start, end, hours, rate)| {
                Ok(TimesheetEntry {
                    assignment_id,
                    worker_id,
                    worker_name,
                    role,
                    start_time: parse_timestamp(&start)?,
                    end_time: parse_timestamp(&end)?,
                    hours_worked: hours,
                    hourly_rate: rate,
                })
            },
        )
        .collect()
}
