// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall_audit::AuditEvent;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewAuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Writes an audit event and returns its id.
///
/// Call it inside the transaction of the write the event describes so the
/// change and its record commit together.
///
/// # Errors
///
/// Returns an error if the event cannot be serialized or inserted.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let row = NewAuditEventRow::try_from(event)?;
    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)?;

    let audit_event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(audit_event_id, action = row.action_name, "Persisted audit event");
    Ok(audit_event_id)
}
