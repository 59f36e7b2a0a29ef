// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use crewcall_audit::AuditEvent;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns `NotFound` if the audit event does not exist, or an error if it
/// cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    audit_event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::audit_event_id.eq(audit_event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Audit event {audit_event_id}")))?;

    AuditEvent::try_from(row)
}

/// Retrieves the audit trail of a catering event, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be deserialized.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .order(audit_events::audit_event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AuditEvent::try_from)
        .collect()
}
