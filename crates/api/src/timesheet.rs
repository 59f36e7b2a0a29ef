// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payroll timesheet export.

use crewcall_domain::DomainError;
use crewcall_persistence::{Persistence, PersistenceError, TimesheetEntry};
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};

/// Column order of the exported timesheet.
pub const TIMESHEET_HEADER: [&str; 7] = ["worker", "role", "start", "end", "hours", "rate", "amount"];

fn money(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.2}"))
}

fn csv_error(err: &csv::Error) -> ApiError {
    ApiError::Internal {
        message: format!("Failed to write timesheet: {err}"),
    }
}

fn timesheet_row(entry: &TimesheetEntry) -> Result<[String; 7], ApiError> {
    let format = |at: time::OffsetDateTime| {
        at.format(&Rfc3339).map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp {at}: {e}"),
        })
    };

    Ok([
        entry.worker_name.clone(),
        entry.role.clone().unwrap_or_default(),
        format(entry.start_time)?,
        format(entry.end_time)?,
        money(entry.hours_worked),
        money(entry.hourly_rate),
        money(entry.amount()),
    ])
}

/// Exports an event's completed assignments as CSV.
///
/// One row per completed assignment, ordered by shift start and worker.
/// Hours, rate and amount are written with two decimals; a missing rate
/// leaves both rate and amount blank.
///
/// # Errors
///
/// Returns an error if the event does not exist or the store cannot be read.
pub fn export_timesheet(persistence: &mut Persistence, event_id: i64) -> Result<String, ApiError> {
    persistence.get_event(event_id).map_err(|e| match e {
        PersistenceError::NotFound(_) => translate_domain_error(DomainError::EventNotFound(event_id)),
        other => translate_persistence_error(other),
    })?;

    let entries: Vec<TimesheetEntry> = persistence
        .completed_assignments(event_id)
        .map_err(translate_persistence_error)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(TIMESHEET_HEADER)
        .map_err(|e| csv_error(&e))?;
    for entry in &entries {
        writer
            .write_record(timesheet_row(entry)?)
            .map_err(|e| csv_error(&e))?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush timesheet: {e}"),
    })?;
    debug!(event_id, rows = entries.len(), "Exported timesheet");

    String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("Timesheet is not valid UTF-8: {e}"),
    })
}
