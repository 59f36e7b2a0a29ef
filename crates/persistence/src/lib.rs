// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the CrewCall staffing system.
//!
//! This crate stores venues, workers, events, shifts, assignments, and the
//! audit trail in `SQLite` via Diesel. Schema migrations are embedded and run
//! on every open.
//!
//! ## Concurrency
//!
//! Every write runs in a `BEGIN IMMEDIATE` transaction and the connection
//! carries a busy timeout, so concurrent writers queue rather than fail.
//! A partial unique index on `assignments(shift_id)` over active statuses
//! makes the database the final arbiter of one active assignment per shift:
//! the losing insert surfaces as `PersistenceError::ActiveAssignmentConflict`.
//!
//! ## Testing
//!
//! Tests use [`Persistence::new_in_memory`], which hands out a uniquely
//! named shared-cache in-memory database per call.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crewcall::{EventGraph, TransitionResult, WorkerProfile};
use crewcall_audit::AuditEvent;
use crewcall_domain::{
    Certification, Event, EventSchedule, EventSkillRequirement, SkillCatalog, SkillName, Venue,
    Worker,
};
use diesel::SqliteConnection;
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::TimesheetEntry;
pub use error::PersistenceError;
pub use mutations::PersistTransitionResult;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the staffing store.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database so tests are
    /// isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Persists the mutation and audit event of a staffing command in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `ActiveAssignmentConflict` if the shift was taken concurrently,
    /// `StaleGraph` if the plan no longer matches the store, or a database
    /// error.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::transition::persist_transition(&mut self.conn, result)
    }

    // ========================================================================
    // Event Graph & Worker Queries
    // ========================================================================

    /// Loads an event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the event does not exist.
    pub fn get_event(&mut self, event_id: i64) -> Result<Event, PersistenceError> {
        queries::event_graph::load_event(&mut self.conn, event_id)
    }

    /// Eagerly loads an event with its schedule, requirements, shifts, and
    /// assignments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the event does not exist.
    pub fn load_event_graph(&mut self, event_id: i64) -> Result<EventGraph, PersistenceError> {
        queries::event_graph::load_event_graph(&mut self.conn, event_id)
    }

    /// Finds the event owning a shift.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the shift does not exist.
    pub fn find_event_id_for_shift(&mut self, shift_id: i64) -> Result<i64, PersistenceError> {
        queries::event_graph::find_event_id_for_shift(&mut self.conn, shift_id)
    }

    /// Finds the event owning an assignment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the assignment does not exist.
    pub fn find_event_id_for_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::event_graph::find_event_id_for_assignment(&mut self.conn, assignment_id)
    }

    /// Lists every event id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_event_ids(&mut self) -> Result<Vec<i64>, PersistenceError> {
        queries::event_graph::list_event_ids(&mut self.conn)
    }

    /// Counts an event's shifts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_shifts(&mut self, event_id: i64) -> Result<i64, PersistenceError> {
        queries::event_graph::count_shifts(&mut self.conn, event_id)
    }

    /// Counts the active assignments on a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_assignments(&mut self, shift_id: i64) -> Result<i64, PersistenceError> {
        queries::event_graph::count_active_assignments(&mut self.conn, shift_id)
    }

    /// Loads a worker.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the worker does not exist.
    pub fn get_worker(&mut self, worker_id: i64) -> Result<Worker, PersistenceError> {
        queries::workers::load_worker(&mut self.conn, worker_id)
    }

    /// Loads a worker with their active bookings.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the worker does not exist.
    pub fn load_worker_profile(
        &mut self,
        worker_id: i64,
    ) -> Result<WorkerProfile, PersistenceError> {
        queries::workers::load_worker_profile(&mut self.conn, worker_id)
    }

    /// Lists every worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_workers(&mut self) -> Result<Vec<Worker>, PersistenceError> {
        queries::workers::list_workers(&mut self.conn)
    }

    // ========================================================================
    // Reference Data
    // ========================================================================

    /// Loads the skill catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_skill_catalog(&mut self) -> Result<SkillCatalog, PersistenceError> {
        queries::reference::load_skill_catalog(&mut self.conn)
    }

    /// Loads a venue.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the venue does not exist.
    pub fn get_venue(&mut self, venue_id: i64) -> Result<Venue, PersistenceError> {
        queries::reference::get_venue(&mut self.conn, venue_id)
    }

    /// Lists all certifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_certifications(&mut self) -> Result<Vec<Certification>, PersistenceError> {
        queries::reference::list_certifications(&mut self.conn)
    }

    /// Returns true if the certification exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn certification_exists(&mut self, certification_id: i64) -> Result<bool, PersistenceError> {
        queries::reference::certification_exists(&mut self.conn, certification_id)
    }

    /// Adds a skill to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRecord` if the skill exists.
    pub fn create_skill(
        &mut self,
        name: &SkillName,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_skill(&mut self.conn, name, audit_event)
    }

    /// Adds a certification.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRecord` if the certification exists.
    pub fn create_certification(
        &mut self,
        name: &str,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_certification(&mut self.conn, name, audit_event)
    }

    /// Adds a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_venue(
        &mut self,
        venue: &Venue,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_venue(&mut self.conn, venue, audit_event)
    }

    /// Adds a worker with skills and certifications.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced skill or certification is missing.
    pub fn create_worker(
        &mut self,
        worker: &Worker,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_worker(&mut self.conn, worker, audit_event)
    }

    /// Grants or renews a worker certification.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker or certification is missing.
    pub fn grant_certification(
        &mut self,
        worker_id: i64,
        certification_id: i64,
        expires_at: OffsetDateTime,
        audit_event: &AuditEvent,
    ) -> Result<(), PersistenceError> {
        mutations::reference::grant_certification(
            &mut self.conn,
            worker_id,
            certification_id,
            expires_at,
            audit_event,
        )
    }

    /// Activates or deactivates a worker.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the worker does not exist.
    pub fn set_worker_active(
        &mut self,
        worker_id: i64,
        active: bool,
        audit_event: &AuditEvent,
    ) -> Result<(), PersistenceError> {
        mutations::reference::set_worker_active(&mut self.conn, worker_id, active, audit_event)
    }

    /// Creates an event with its schedule and requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced row is missing.
    pub fn create_event(
        &mut self,
        event: &Event,
        schedule: Option<&EventSchedule>,
        requirements: &[EventSkillRequirement],
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_event(
            &mut self.conn,
            event,
            schedule,
            requirements,
            audit_event,
        )
    }

    /// Replaces an event's requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced row is missing.
    pub fn replace_requirements(
        &mut self,
        event_id: i64,
        requirements: &[EventSkillRequirement],
        audit_event: &AuditEvent,
    ) -> Result<(), PersistenceError> {
        mutations::reference::replace_requirements(
            &mut self.conn,
            event_id,
            requirements,
            audit_event,
        )
    }

    /// Sets an event's schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist.
    pub fn set_schedule(
        &mut self,
        event_id: i64,
        schedule: &EventSchedule,
        audit_event: &AuditEvent,
    ) -> Result<(), PersistenceError> {
        mutations::reference::set_schedule(&mut self.conn, event_id, schedule, audit_event)
    }

    // ========================================================================
    // Audit & Payroll Reads
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the audit event does not exist.
    pub fn get_audit_event(&mut self, audit_event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, audit_event_id)
    }

    /// Lists the audit trail of a catering event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events(&mut self, event_id: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_audit_events(&mut self.conn, event_id)
    }

    /// Lists the completed assignments of an event for timesheet export.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn completed_assignments(
        &mut self,
        event_id: i64,
    ) -> Result<Vec<TimesheetEntry>, PersistenceError> {
        queries::timesheet::completed_assignments(&mut self.conn, event_id)
    }
}
