// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data and event setup mutations.
//!
//! Each function validates nothing beyond what the schema enforces; callers
//! run the domain validators first. Every write stores the supplied audit
//! event in its own transaction. Where the write creates the catering
//! event, the audit event is scoped to the new id.

use crewcall_audit::AuditEvent;
use crewcall_domain::{Event, EventSchedule, EventSkillRequirement, SkillName, Venue, Worker};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{
    certifications, event_schedules, event_skill_requirements, events, skills, venues,
    worker_certifications, worker_skills, workers,
};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Adds a skill to the catalog.
///
/// # Errors
///
/// Returns `DuplicateRecord` if the skill already exists.
pub fn create_skill(
    conn: &mut SqliteConnection,
    name: &SkillName,
    audit_event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(skills::table)
            .values(skills::name.eq(name.value()))
            .execute(conn)?;
        let skill_id: i64 = get_last_insert_rowid(conn)?;
        persist_audit_event(conn, audit_event)?;
        info!(skill_id, skill = %name, "Created skill");
        Ok(skill_id)
    })
}

/// Adds a certification.
///
/// # Errors
///
/// Returns `DuplicateRecord` if a certification with the name exists.
pub fn create_certification(
    conn: &mut SqliteConnection,
    name: &str,
    audit_event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(certifications::table)
            .values(certifications::name.eq(name))
            .execute(conn)?;
        let certification_id: i64 = get_last_insert_rowid(conn)?;
        persist_audit_event(conn, audit_event)?;
        info!(certification_id, name, "Created certification");
        Ok(certification_id)
    })
}

/// Adds a venue.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_venue(
    conn: &mut SqliteConnection,
    venue: &Venue,
    audit_event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(venues::table)
            .values((
                venues::name.eq(&venue.name),
                venues::address.eq(&venue.address),
                venues::latitude.eq(venue.latitude),
                venues::longitude.eq(venue.longitude),
                venues::arrival_instructions.eq(&venue.arrival_instructions),
                venues::parking_instructions.eq(&venue.parking_instructions),
                venues::timezone.eq(&venue.timezone),
            ))
            .execute(conn)?;
        let venue_id: i64 = get_last_insert_rowid(conn)?;
        persist_audit_event(conn, audit_event)?;
        info!(venue_id, "Created venue");
        Ok(venue_id)
    })
}

/// Adds a worker with their skills and certifications.
///
/// # Errors
///
/// Returns an error if a skill or certification does not exist.
pub fn create_worker(
    conn: &mut SqliteConnection,
    worker: &Worker,
    audit_event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(workers::table)
            .values((
                workers::name.eq(&worker.name),
                workers::email.eq(&worker.email),
                workers::phone.eq(&worker.phone),
                workers::is_active.eq(i32::from(worker.active)),
            ))
            .execute(conn)?;
        let worker_id: i64 = get_last_insert_rowid(conn)?;

        let skill_rows: Vec<_> = worker
            .skills
            .iter()
            .map(|s| {
                (
                    worker_skills::worker_id.eq(worker_id),
                    worker_skills::skill_name.eq(s.value()),
                )
            })
            .collect();
        if !skill_rows.is_empty() {
            diesel::insert_into(worker_skills::table)
                .values(skill_rows)
                .execute(conn)?;
        }

        for certification in &worker.certifications {
            upsert_worker_certification(
                conn,
                worker_id,
                certification.certification_id,
                certification.expires_at,
            )?;
        }

        persist_audit_event(conn, audit_event)?;
        info!(worker_id, skills = worker.skills.len(), "Created worker");
        Ok(worker_id)
    })
}

fn upsert_worker_certification(
    conn: &mut SqliteConnection,
    worker_id: i64,
    certification_id: i64,
    expires_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::insert_into(worker_certifications::table)
        .values((
            worker_certifications::worker_id.eq(worker_id),
            worker_certifications::certification_id.eq(certification_id),
            worker_certifications::expires_at.eq(format_timestamp(expires_at)?),
        ))
        .on_conflict((
            worker_certifications::worker_id,
            worker_certifications::certification_id,
        ))
        .do_update()
        .set(worker_certifications::expires_at.eq(excluded(worker_certifications::expires_at)))
        .execute(conn)?;
    Ok(())
}

/// Grants a certification to a worker, or renews its expiry.
///
/// # Errors
///
/// Returns an error if the worker or certification does not exist.
pub fn grant_certification(
    conn: &mut SqliteConnection,
    worker_id: i64,
    certification_id: i64,
    expires_at: OffsetDateTime,
    audit_event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        upsert_worker_certification(conn, worker_id, certification_id, expires_at)?;
        persist_audit_event(conn, audit_event)?;
        info!(worker_id, certification_id, "Granted certification");
        Ok(())
    })
}

/// Activates or deactivates a worker.
///
/// Existing assignments are untouched.
///
/// # Errors
///
/// Returns `NotFound` if the worker does not exist.
pub fn set_worker_active(
    conn: &mut SqliteConnection,
    worker_id: i64,
    active: bool,
    audit_event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(workers::table.filter(workers::worker_id.eq(worker_id)))
            .set(workers::is_active.eq(i32::from(active)))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!("Worker {worker_id}")));
        }
        persist_audit_event(conn, audit_event)?;
        info!(worker_id, active, "Set worker active flag");
        Ok(())
    })
}

fn insert_requirements(
    conn: &mut SqliteConnection,
    event_id: i64,
    requirements: &[EventSkillRequirement],
) -> Result<usize, PersistenceError> {
    let rows: Vec<_> = requirements
        .iter()
        .map(|r| {
            (
                event_skill_requirements::event_id.eq(event_id),
                event_skill_requirements::skill_name.eq(r.skill_name.value()),
                event_skill_requirements::needed_workers.eq(r.needed_workers),
                event_skill_requirements::uniform_name.eq(r.uniform_name.as_deref()),
                event_skill_requirements::certification_id.eq(r.required_certification),
                event_skill_requirements::pay_rate.eq(r.pay_rate),
            )
        })
        .collect();

    if rows.is_empty() {
        return Ok(0);
    }

    Ok(diesel::insert_into(event_skill_requirements::table)
        .values(rows)
        .execute(conn)?)
}

fn upsert_schedule(
    conn: &mut SqliteConnection,
    event_id: i64,
    schedule: &EventSchedule,
) -> Result<(), PersistenceError> {
    let break_minutes: i32 = i32::try_from(schedule.break_minutes()).map_err(|_| {
        PersistenceError::SerializationError(format!(
            "break minutes out of range: {}",
            schedule.break_minutes()
        ))
    })?;

    diesel::insert_into(event_schedules::table)
        .values((
            event_schedules::event_id.eq(event_id),
            event_schedules::start_time.eq(format_timestamp(schedule.start_time())?),
            event_schedules::end_time.eq(format_timestamp(schedule.end_time())?),
            event_schedules::break_minutes.eq(break_minutes),
        ))
        .on_conflict(event_schedules::event_id)
        .do_update()
        .set((
            event_schedules::start_time.eq(excluded(event_schedules::start_time)),
            event_schedules::end_time.eq(excluded(event_schedules::end_time)),
            event_schedules::break_minutes.eq(excluded(event_schedules::break_minutes)),
        ))
        .execute(conn)?;
    Ok(())
}

/// Creates an event with its optional schedule and its requirements.
///
/// The audit event is stored scoped to the new event id.
///
/// # Errors
///
/// Returns an error if the venue, a skill, or a certification does not exist.
pub fn create_event(
    conn: &mut SqliteConnection,
    event: &Event,
    schedule: Option<&EventSchedule>,
    requirements: &[EventSkillRequirement],
    audit_event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(events::table)
            .values((
                events::title.eq(&event.title),
                events::status.eq(event.status.as_str()),
                events::venue_id.eq(event.venue_id),
                events::check_in_instructions.eq(&event.check_in_instructions),
                events::supervisor_name.eq(&event.supervisor_name),
                events::supervisor_phone.eq(&event.supervisor_phone),
            ))
            .execute(conn)?;
        let event_id: i64 = get_last_insert_rowid(conn)?;

        if let Some(schedule) = schedule {
            upsert_schedule(conn, event_id, schedule)?;
        }
        let inserted: usize = insert_requirements(conn, event_id, requirements)?;

        let mut scoped: AuditEvent = audit_event.clone();
        scoped.event_id = Some(event_id);
        persist_audit_event(conn, &scoped)?;

        info!(event_id, requirements = inserted, "Created event");
        Ok(event_id)
    })
}

/// Replaces every requirement of an event.
///
/// Existing shifts are untouched; regenerate or repair to reconcile them.
///
/// # Errors
///
/// Returns an error if a skill or certification does not exist.
pub fn replace_requirements(
    conn: &mut SqliteConnection,
    event_id: i64,
    requirements: &[EventSkillRequirement],
    audit_event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let removed: usize = diesel::delete(
            event_skill_requirements::table
                .filter(event_skill_requirements::event_id.eq(event_id)),
        )
        .execute(conn)?;
        let inserted: usize = insert_requirements(conn, event_id, requirements)?;
        persist_audit_event(conn, audit_event)?;
        info!(event_id, removed, inserted, "Replaced event requirements");
        Ok(())
    })
}

/// Sets or replaces an event's schedule.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn set_schedule(
    conn: &mut SqliteConnection,
    event_id: i64,
    schedule: &EventSchedule,
    audit_event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        upsert_schedule(conn, event_id, schedule)?;
        persist_audit_event(conn, audit_event)?;
        info!(event_id, "Set event schedule");
        Ok(())
    })
}
