// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use std::collections::BTreeSet;

use crewcall::{
    ApplyContext, Command, EventGraph, FixedPayRate, Mutation, PayRateResolver, StaffingPolicy,
    TransitionResult, WorkerProfile, apply, plan_round_robin,
};
use crewcall_audit::{Action, AuditEvent, Cause, StateSnapshot};
use crewcall_domain::{
    Assignment, DomainError, Event, EventSchedule, EventSkillRequirement, EventStatus,
    RoleGroupProgress, ShiftStaffingProgress, ShiftStatus, SkillCatalog, SkillName, Venue, Worker,
    WorkerCertification, eligibility_reasons, role_group_progress, schedule_from_local,
    total_workers_needed, validate_event_fields, validate_requirement, validate_venue,
    validate_worker_fields,
};
use crewcall_persistence::{PersistTransitionResult, Persistence, PersistenceError};
use num_traits::ToPrimitive;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};
use tracing::{info, warn};

use crate::ActingAdmin;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AssignWorkerRequest, AssignmentInfo, AssignmentResponse, AuditEventInfo, BulkAssignItem,
    BulkAssignRequest, BulkAssignResponse, CreateCertificationRequest, CreateEventRequest,
    CreateEventResponse, CreateReferenceResponse, CreateSkillRequest, CreateVenueRequest,
    CreateWorkerRequest, EligibilityResponse, EventStaffingResponse, GrantCertificationRequest,
    ListWorkersResponse, MarkNoShowRequest, RecordCompletionRequest, ReplaceRequirementsRequest,
    RequirementInput, ScheduleInfo, ScheduleInput, SetScheduleRequest, SetWorkerActiveRequest,
    ShiftInfo, ShiftSyncResponse, TransitionStatusRequest, TransitionStatusResponse,
    UnassignRequest, WorkerInfo, WriteResponse,
};

// ============================================================================
// Boundary conversions
// ============================================================================

fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map(|at| at.to_offset(UtcOffset::UTC))
        .map_err(|e| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not an RFC 3339 timestamp: {e}"),
        })
}

fn format_timestamp(at: OffsetDateTime) -> Result<String, ApiError> {
    at.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp {at}: {e}"),
    })
}

fn parse_skill(value: &str) -> Result<SkillName, ApiError> {
    SkillName::parse(value).map_err(translate_domain_error)
}

/// Maps a store `NotFound` to the domain error naming what was missing.
fn or_not_found(err: PersistenceError, missing: DomainError) -> ApiError {
    match err {
        PersistenceError::NotFound(_) => translate_domain_error(missing),
        other => translate_persistence_error(other),
    }
}

fn resolve_schedule(input: &ScheduleInput, timezone: &str) -> Result<EventSchedule, ApiError> {
    match input {
        ScheduleInput::Utc {
            start_time,
            end_time,
            break_minutes,
        } => {
            let start = parse_timestamp("start_time", start_time)?;
            let end = parse_timestamp("end_time", end_time)?;
            EventSchedule::new(start, end, *break_minutes).map_err(translate_domain_error)
        }
        ScheduleInput::Local {
            date,
            start,
            end,
            break_minutes,
        } => {
            let date: Date = Date::parse(date, format_description!("[year]-[month]-[day]"))
                .map_err(|e| ApiError::InvalidInput {
                    field: String::from("date"),
                    message: format!("'{date}' is not a YYYY-MM-DD date: {e}"),
                })?;
            let start: Time = parse_wall_clock("start", start)?;
            let end: Time = parse_wall_clock("end", end)?;
            schedule_from_local(timezone, date, start, end, *break_minutes)
                .map_err(translate_domain_error)
        }
    }
}

fn parse_wall_clock(field: &str, value: &str) -> Result<Time, ApiError> {
    Time::parse(value, format_description!("[hour]:[minute]")).map_err(|e| {
        ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not an HH:MM time: {e}"),
        }
    })
}

fn schedule_info(schedule: &EventSchedule) -> Result<ScheduleInfo, ApiError> {
    Ok(ScheduleInfo {
        start_time: format_timestamp(schedule.start_time())?,
        end_time: format_timestamp(schedule.end_time())?,
        break_minutes: schedule.break_minutes(),
    })
}

fn assignment_info(assignment: &Assignment) -> Result<AssignmentInfo, ApiError> {
    Ok(AssignmentInfo {
        assignment_id: assignment.assignment_id,
        shift_id: assignment.shift_id,
        worker_id: assignment.worker_id,
        assigned_by: assignment.assigned_by.clone(),
        assigned_at: format_timestamp(assignment.assigned_at)?,
        status: assignment.status.to_string(),
        hours_worked: assignment.hours_worked,
        hourly_rate: assignment.hourly_rate,
        notes: assignment.notes.clone(),
    })
}

fn worker_info(worker: &Worker) -> Result<WorkerInfo, ApiError> {
    let worker_id: i64 = worker.worker_id.ok_or_else(|| ApiError::Internal {
        message: format!("Persisted worker '{}' has no id", worker.name),
    })?;
    Ok(WorkerInfo {
        worker_id,
        name: worker.name.clone(),
        email: worker.email.clone(),
        phone: worker.phone.clone(),
        active: worker.active,
        skills: worker.skills.iter().map(ToString::to_string).collect(),
        certification_ids: worker
            .certifications
            .iter()
            .map(|c| c.certification_id)
            .collect(),
    })
}

fn audit_event_info(event: &AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        audit_event_id: event.audit_event_id,
        event_id: event.event_id,
        shift_id: event.shift_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
    }
}

/// Builds the audit event for a reference-data write.
fn reference_audit_event(
    admin: &ActingAdmin,
    cause: Cause,
    name: &str,
    before: String,
    after: String,
    event_id: Option<i64>,
) -> AuditEvent {
    AuditEvent::new(
        admin.to_audit_actor(),
        cause,
        Action::new(name.to_string(), Some(after.clone())),
        StateSnapshot::new(before),
        StateSnapshot::new(after),
        event_id,
    )
}

// ============================================================================
// Reference data
// ============================================================================

/// Adds a skill to the catalog.
///
/// # Errors
///
/// Returns an error if:
/// - The skill name is empty or malformed
/// - The skill already exists
pub fn create_skill(
    persistence: &mut Persistence,
    request: &CreateSkillRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<CreateReferenceResponse, ApiError> {
    let name: SkillName = parse_skill(&request.name)?;
    let audit_event = reference_audit_event(
        admin,
        cause,
        "CreateSkill",
        String::from("none"),
        format!("skill={name}"),
        None,
    );

    let skill_id: i64 = persistence
        .create_skill(&name, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(CreateReferenceResponse {
        id: skill_id,
        name: name.to_string(),
        message: format!("Created skill '{name}'"),
    })
}

/// Adds a certification.
///
/// # Errors
///
/// Returns an error if the name is empty or already taken.
pub fn create_certification(
    persistence: &mut Persistence,
    request: &CreateCertificationRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<CreateReferenceResponse, ApiError> {
    let name: &str = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Certification name cannot be empty"),
        });
    }

    let audit_event = reference_audit_event(
        admin,
        cause,
        "CreateCertification",
        String::from("none"),
        format!("certification={name}"),
        None,
    );
    let certification_id: i64 = persistence
        .create_certification(name, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(CreateReferenceResponse {
        id: certification_id,
        name: name.to_string(),
        message: format!("Created certification '{name}'"),
    })
}

/// Adds a venue. Coordinates are range-checked only.
///
/// # Errors
///
/// Returns an error if the name is empty, a coordinate is out of range, or
/// the timezone is not an IANA zone.
pub fn create_venue(
    persistence: &mut Persistence,
    request: &CreateVenueRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<CreateReferenceResponse, ApiError> {
    let venue = Venue {
        venue_id: None,
        name: request.name.trim().to_string(),
        address: request.address.clone(),
        latitude: request.latitude,
        longitude: request.longitude,
        arrival_instructions: request.arrival_instructions.clone(),
        parking_instructions: request.parking_instructions.clone(),
        timezone: request.timezone.clone(),
    };
    validate_venue(&venue).map_err(translate_domain_error)?;

    let audit_event = reference_audit_event(
        admin,
        cause,
        "CreateVenue",
        String::from("none"),
        format!("venue={},timezone={}", venue.name, venue.timezone),
        None,
    );
    let venue_id: i64 = persistence
        .create_venue(&venue, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(CreateReferenceResponse {
        id: venue_id,
        name: venue.name.clone(),
        message: format!("Created venue '{}'", venue.name),
    })
}

fn require_certification(
    persistence: &mut Persistence,
    certification_id: i64,
) -> Result<(), ApiError> {
    let exists: bool = persistence
        .certification_exists(certification_id)
        .map_err(translate_persistence_error)?;
    if exists {
        Ok(())
    } else {
        Err(translate_domain_error(DomainError::CertificationNotFound(
            certification_id,
        )))
    }
}

/// Creates a worker with their skills and certifications.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The worker's details; skills must be in the catalog
/// * `admin` - The acting admin
/// * `cause` - Why the worker is being added
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - A skill is malformed or not in the catalog
/// - A certification does not exist or its expiry is not RFC 3339
pub fn create_worker(
    persistence: &mut Persistence,
    request: &CreateWorkerRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<CreateReferenceResponse, ApiError> {
    let skills: BTreeSet<SkillName> = request
        .skills
        .iter()
        .map(|s| parse_skill(s))
        .collect::<Result<_, _>>()?;

    let mut worker = Worker::new(request.name.trim().to_string(), skills);
    worker.email.clone_from(&request.email);
    worker.phone.clone_from(&request.phone);

    for held in &request.certifications {
        require_certification(persistence, held.certification_id)?;
        worker.certifications.push(WorkerCertification {
            certification_id: held.certification_id,
            expires_at: parse_timestamp("expires_at", &held.expires_at)?,
        });
    }

    let catalog: SkillCatalog = persistence
        .load_skill_catalog()
        .map_err(translate_persistence_error)?;
    validate_worker_fields(&worker, &catalog).map_err(translate_domain_error)?;

    let audit_event = reference_audit_event(
        admin,
        cause,
        "CreateWorker",
        String::from("none"),
        format!(
            "worker={},skills={},certifications={}",
            worker.name,
            worker.skills.len(),
            worker.certifications.len()
        ),
        None,
    );
    let worker_id: i64 = persistence
        .create_worker(&worker, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(CreateReferenceResponse {
        id: worker_id,
        name: worker.name.clone(),
        message: format!("Created worker '{}'", worker.name),
    })
}

/// Grants a certification to a worker, or renews its expiry.
///
/// # Errors
///
/// Returns an error if the worker or certification does not exist, or the
/// expiry is not RFC 3339.
pub fn grant_certification(
    persistence: &mut Persistence,
    worker_id: i64,
    request: &GrantCertificationRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    let worker: Worker = persistence
        .get_worker(worker_id)
        .map_err(|e| or_not_found(e, DomainError::WorkerNotFound(worker_id)))?;
    require_certification(persistence, request.certification_id)?;
    let expires_at: OffsetDateTime = parse_timestamp("expires_at", &request.expires_at)?;

    let previous: String = worker
        .certifications
        .iter()
        .find(|c| c.certification_id == request.certification_id)
        .map_or_else(
            || String::from("none"),
            |c| format!("expires_at={}", c.expires_at),
        );
    let audit_event = reference_audit_event(
        admin,
        cause,
        "GrantCertification",
        previous,
        format!(
            "worker_id={worker_id},certification_id={},expires_at={expires_at}",
            request.certification_id
        ),
        None,
    );
    persistence
        .grant_certification(
            worker_id,
            request.certification_id,
            expires_at,
            &audit_event,
        )
        .map_err(translate_persistence_error)?;

    Ok(WriteResponse {
        message: format!(
            "Certification {} granted to worker {worker_id}",
            request.certification_id
        ),
    })
}

/// Activates or deactivates a worker. Existing assignments are untouched.
///
/// # Errors
///
/// Returns an error if the worker does not exist.
pub fn set_worker_active(
    persistence: &mut Persistence,
    worker_id: i64,
    request: &SetWorkerActiveRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    let worker: Worker = persistence
        .get_worker(worker_id)
        .map_err(|e| or_not_found(e, DomainError::WorkerNotFound(worker_id)))?;

    let audit_event = reference_audit_event(
        admin,
        cause,
        "SetWorkerActive",
        format!("worker_id={worker_id},active={}", worker.active),
        format!("worker_id={worker_id},active={}", request.active),
        None,
    );
    persistence
        .set_worker_active(worker_id, request.active, &audit_event)
        .map_err(translate_persistence_error)?;

    let state: &str = if request.active {
        "activated"
    } else {
        "deactivated"
    };
    Ok(WriteResponse {
        message: format!("Worker {worker_id} {state}"),
    })
}

/// Lists every worker.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_workers(persistence: &mut Persistence) -> Result<ListWorkersResponse, ApiError> {
    let workers: Vec<Worker> = persistence
        .list_workers()
        .map_err(translate_persistence_error)?;
    Ok(ListWorkersResponse {
        workers: workers
            .iter()
            .map(worker_info)
            .collect::<Result<_, _>>()?,
    })
}

// ============================================================================
// Event setup
// ============================================================================

fn build_requirements(
    persistence: &mut Persistence,
    inputs: &[RequirementInput],
) -> Result<Vec<EventSkillRequirement>, ApiError> {
    let catalog: SkillCatalog = persistence
        .load_skill_catalog()
        .map_err(translate_persistence_error)?;

    let mut requirements: Vec<EventSkillRequirement> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let needed_workers: i32 =
            input
                .needed_workers
                .to_i32()
                .ok_or_else(|| ApiError::InvalidInput {
                    field: String::from("needed_workers"),
                    message: format!("{} is out of range", input.needed_workers),
                })?;

        let mut requirement = EventSkillRequirement::new(parse_skill(&input.skill_name)?, needed_workers);
        requirement.uniform_name.clone_from(&input.uniform_name);
        requirement.required_certification = input.certification_id;
        requirement.pay_rate = input.pay_rate;

        validate_requirement(&requirement, &catalog).map_err(translate_domain_error)?;
        if let Some(certification_id) = input.certification_id {
            require_certification(persistence, certification_id)?;
        }
        requirements.push(requirement);
    }

    Ok(requirements)
}

fn load_venue_of(persistence: &mut Persistence, event: &Event) -> Result<Venue, ApiError> {
    persistence
        .get_venue(event.venue_id)
        .map_err(|e| or_not_found(e, DomainError::VenueNotFound(event.venue_id)))
}

fn load_event(persistence: &mut Persistence, event_id: i64) -> Result<Event, ApiError> {
    persistence
        .get_event(event_id)
        .map_err(|e| or_not_found(e, DomainError::EventNotFound(event_id)))
}

/// Creates a draft event with its optional schedule and its requirements.
///
/// A `local` schedule is interpreted in the venue's timezone.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The event, its schedule and its requirements
/// * `admin` - The acting admin
/// * `cause` - Why the event is being created
///
/// # Errors
///
/// Returns an error if:
/// - The title is empty
/// - The venue, a skill, or a certification does not exist
/// - A requirement count or pay rate is invalid
/// - The schedule is invalid, or a local time is ambiguous under DST
pub fn create_event(
    persistence: &mut Persistence,
    request: &CreateEventRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<CreateEventResponse, ApiError> {
    let mut event = Event::new(request.title.trim().to_string(), request.venue_id);
    event.check_in_instructions.clone_from(&request.check_in_instructions);
    event.supervisor_name.clone_from(&request.supervisor_name);
    event.supervisor_phone.clone_from(&request.supervisor_phone);
    validate_event_fields(&event).map_err(translate_domain_error)?;

    let venue: Venue = load_venue_of(persistence, &event)?;
    let schedule: Option<EventSchedule> = request
        .schedule
        .as_ref()
        .map(|s| resolve_schedule(s, &venue.timezone))
        .transpose()?;
    let requirements: Vec<EventSkillRequirement> =
        build_requirements(persistence, &request.requirements)?;
    let total: u32 = total_workers_needed(&requirements);

    let audit_event = reference_audit_event(
        admin,
        cause,
        "CreateEvent",
        String::from("none"),
        format!(
            "event_status={},requirements={},required={total}",
            event.status,
            requirements.len()
        ),
        None,
    );
    let event_id: i64 = persistence
        .create_event(&event, schedule.as_ref(), &requirements, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(CreateEventResponse {
        event_id,
        title: event.title.clone(),
        total_workers_needed: total,
        message: format!("Created event '{}' needing {total} workers", event.title),
    })
}

/// Replaces every requirement of an event.
///
/// Existing shifts are not touched; regenerate or repair to reconcile them.
///
/// # Errors
///
/// Returns an error if the event, a skill, or a certification does not
/// exist, or a requirement is invalid.
pub fn replace_requirements(
    persistence: &mut Persistence,
    event_id: i64,
    request: &ReplaceRequirementsRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let requirements: Vec<EventSkillRequirement> =
        build_requirements(persistence, &request.requirements)?;

    let audit_event = reference_audit_event(
        admin,
        cause,
        "ReplaceRequirements",
        format!(
            "requirements={},required={}",
            graph.requirements.len(),
            total_workers_needed(&graph.requirements)
        ),
        format!(
            "requirements={},required={}",
            requirements.len(),
            total_workers_needed(&requirements)
        ),
        Some(event_id),
    );
    persistence
        .replace_requirements(event_id, &requirements, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(WriteResponse {
        message: format!(
            "Event {event_id} now has {} requirements",
            requirements.len()
        ),
    })
}

/// Sets or replaces an event's schedule.
///
/// # Errors
///
/// Returns an error if the event does not exist or the schedule is invalid.
pub fn set_schedule(
    persistence: &mut Persistence,
    event_id: i64,
    request: &SetScheduleRequest,
    admin: &ActingAdmin,
    cause: Cause,
) -> Result<ScheduleInfo, ApiError> {
    let event: Event = load_event(persistence, event_id)?;
    let venue: Venue = load_venue_of(persistence, &event)?;
    let schedule: EventSchedule = resolve_schedule(&request.schedule, &venue.timezone)?;
    let info: ScheduleInfo = schedule_info(&schedule)?;

    let audit_event = reference_audit_event(
        admin,
        cause,
        "SetSchedule",
        String::from("schedule"),
        format!("start={},end={}", info.start_time, info.end_time),
        Some(event_id),
    );
    persistence
        .set_schedule(event_id, &schedule, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(info)
}

// ============================================================================
// Staffing commands
// ============================================================================

fn load_graph(persistence: &mut Persistence, event_id: i64) -> Result<EventGraph, ApiError> {
    persistence
        .load_event_graph(event_id)
        .map_err(|e| or_not_found(e, DomainError::EventNotFound(event_id)))
}

fn event_of_shift(persistence: &mut Persistence, shift_id: i64) -> Result<i64, ApiError> {
    persistence
        .find_event_id_for_shift(shift_id)
        .map_err(|e| or_not_found(e, DomainError::ShiftNotFound(shift_id)))
}

fn event_of_assignment(persistence: &mut Persistence, assignment_id: i64) -> Result<i64, ApiError> {
    persistence
        .find_event_id_for_assignment(assignment_id)
        .map_err(|e| or_not_found(e, DomainError::AssignmentNotFound(assignment_id)))
}

fn load_profile(persistence: &mut Persistence, worker_id: i64) -> Result<WorkerProfile, ApiError> {
    persistence
        .load_worker_profile(worker_id)
        .map_err(|e| or_not_found(e, DomainError::WorkerNotFound(worker_id)))
}

/// Applies a command to a loaded graph and persists the result.
fn apply_and_persist(
    persistence: &mut Persistence,
    graph: &EventGraph,
    command: Command,
    worker_id: Option<i64>,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<(TransitionResult, PersistTransitionResult), ApiError> {
    let profile: Option<WorkerProfile> = worker_id
        .map(|id| load_profile(persistence, id))
        .transpose()?;
    let ctx = ApplyContext {
        worker: profile.as_ref(),
        policy,
        now: OffsetDateTime::now_utc(),
    };

    let result: TransitionResult = apply(graph, command, admin.to_audit_actor(), cause, &ctx)
        .map_err(translate_core_error)?;
    let persisted: PersistTransitionResult = persistence
        .persist_transition(&result)
        .map_err(translate_persistence_error)?;

    Ok((result, persisted))
}

fn sync_shifts(
    persistence: &mut Persistence,
    event_id: i64,
    command: Command,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<ShiftSyncResponse, ApiError> {
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let (result, persisted) =
        apply_and_persist(persistence, &graph, command, None, admin, cause, policy)?;

    let Mutation::SyncShifts(plan) = result.mutation else {
        return Err(ApiError::Internal {
            message: String::from("Shift sync produced an unexpected mutation"),
        });
    };

    Ok(ShiftSyncResponse {
        event_id,
        audit_event_id: persisted.audit_event_id,
        created: persisted.shifts_created,
        deleted_shift_ids: plan.delete_shift_ids,
        retained_shift_ids: plan.retained_shift_ids,
        flagged_shift_ids: plan.flagged_shift_ids,
        anomalies: plan.anomalies,
        warnings: result.warnings.iter().map(ToString::to_string).collect(),
    })
}

/// Regenerates an event's shifts from its requirements.
///
/// Unassigned shifts are deleted and recreated; shifts holding an active
/// assignment are kept and count toward their role.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The event has no schedule or no requirements
/// - The event is completed or deleted
/// - A shift gained an assignment while the regeneration was planned
pub fn generate_shifts(
    persistence: &mut Persistence,
    event_id: i64,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<ShiftSyncResponse, ApiError> {
    sync_shifts(
        persistence,
        event_id,
        Command::GenerateShifts,
        admin,
        cause,
        policy,
    )
}

/// Repairs shifts missing their role or capacity.
///
/// Damaged shifts holding an active assignment are flagged, not touched.
///
/// # Errors
///
/// Fails for the same reasons as [`generate_shifts`].
pub fn repair_shifts(
    persistence: &mut Persistence,
    event_id: i64,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<ShiftSyncResponse, ApiError> {
    sync_shifts(
        persistence,
        event_id,
        Command::RepairShifts,
        admin,
        cause,
        policy,
    )
}

fn new_assignment_response(
    result: &TransitionResult,
    persisted: PersistTransitionResult,
) -> Result<AssignmentResponse, ApiError> {
    let (Mutation::CreateAssignment(new_assignment), Some(assignment_id)) =
        (&result.mutation, persisted.assignment_id)
    else {
        return Err(ApiError::Internal {
            message: String::from("Assignment produced an unexpected mutation"),
        });
    };

    Ok(AssignmentResponse {
        assignment: AssignmentInfo {
            assignment_id,
            shift_id: new_assignment.shift_id,
            worker_id: new_assignment.worker_id,
            assigned_by: new_assignment.assigned_by.clone(),
            assigned_at: format_timestamp(new_assignment.assigned_at)?,
            status: new_assignment.status.to_string(),
            hours_worked: None,
            hourly_rate: new_assignment.hourly_rate,
            notes: None,
        },
        audit_event_id: persisted.audit_event_id,
        warnings: result.warnings.iter().map(ToString::to_string).collect(),
    })
}

/// Assigns a worker to a shift.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The shift, the worker, and an optional explicit rate
/// * `admin` - The acting admin, recorded as `assigned_by`
/// * `cause` - Why the assignment is made
/// * `policy` - Eligibility and pay rules
///
/// # Errors
///
/// Returns an error if:
/// - The shift or worker does not exist
/// - The worker fails eligibility (every failed rule is listed)
/// - The shift is already fully staffed, including by a concurrent write
/// - The explicit rate is negative or not finite
pub fn assign_worker(
    persistence: &mut Persistence,
    request: &AssignWorkerRequest,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<AssignmentResponse, ApiError> {
    let event_id: i64 = event_of_shift(persistence, request.shift_id)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let command = Command::Assign {
        worker_id: request.worker_id,
        shift_id: request.shift_id,
        hourly_rate: request.hourly_rate,
    };

    let (result, persisted) = apply_and_persist(
        persistence,
        &graph,
        command,
        Some(request.worker_id),
        admin,
        cause,
        policy,
    )?;
    new_assignment_response(&result, persisted)
}

/// One independent attempt of a bulk assignment.
fn assign_one(
    persistence: &mut Persistence,
    shift_id: i64,
    worker_id: i64,
    resolver: Option<&dyn PayRateResolver>,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<i64, ApiError> {
    let event_id: i64 = event_of_shift(persistence, shift_id)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let hourly_rate: Option<f64> = match resolver {
        Some(resolver) => resolver.resolve(graph.shift(shift_id).map_err(translate_domain_error)?),
        None => None,
    };

    let command = Command::Assign {
        worker_id,
        shift_id,
        hourly_rate,
    };
    let (_, persisted) = apply_and_persist(
        persistence,
        &graph,
        command,
        Some(worker_id),
        admin,
        cause,
        policy,
    )?;

    persisted.assignment_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Assignment was persisted without an id"),
    })
}

/// Returns why a shift cannot take a bulk-assigned worker, if it cannot.
fn bulk_precheck(persistence: &mut Persistence, shift_id: i64) -> Option<ApiError> {
    let progress: Result<ShiftStaffingProgress, ApiError> = event_of_shift(persistence, shift_id)
        .and_then(|event_id| load_graph(persistence, event_id))
        .and_then(|graph| graph.shift_progress(shift_id).map_err(translate_domain_error));

    match progress {
        Ok(p) if p.required > 0 && p.assigned >= p.required => Some(ApiError::Conflict {
            message: format!("Shift {shift_id} is already fully staffed"),
        }),
        Ok(_) => None,
        Err(err) => Some(err),
    }
}

/// Assigns workers round-robin across shifts.
///
/// Shifts that are already full are reported as failed conflicts. The
/// remaining shifts, in request order, take workers `i mod n`. Every
/// attempt runs in its own transaction, so one failure never aborts the
/// rest. The response has one entry per requested shift, in order.
///
/// When `request.hourly_rate` is set, every shift gets that rate;
/// otherwise each shift's rate resolves from its event's requirements.
///
/// # Errors
///
/// Returns an error only if `worker_ids` or `shift_ids` is empty.
/// Per-shift failures are reported in the response.
pub fn bulk_assign(
    persistence: &mut Persistence,
    request: &BulkAssignRequest,
    admin: &ActingAdmin,
    cause: &Cause,
    policy: &StaffingPolicy,
) -> Result<BulkAssignResponse, ApiError> {
    if request.worker_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("worker_ids"),
            message: String::from("At least one worker is required"),
        });
    }
    if request.shift_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("shift_ids"),
            message: String::from("At least one shift is required"),
        });
    }
    if let Some(rate) = request.hourly_rate {
        crewcall_domain::validate_hourly_rate(rate).map_err(translate_domain_error)?;
    }

    let fixed: Option<FixedPayRate> = request.hourly_rate.map(FixedPayRate);
    let resolver: Option<&dyn PayRateResolver> =
        fixed.as_ref().map(|r| r as &dyn PayRateResolver);

    let mut results: Vec<Option<BulkAssignItem>> = vec![None; request.shift_ids.len()];
    let mut open: Vec<(usize, i64)> = Vec::new();
    for (position, shift_id) in request.shift_ids.iter().copied().enumerate() {
        match bulk_precheck(persistence, shift_id) {
            Some(err) => {
                results[position] = Some(BulkAssignItem {
                    shift_id,
                    worker_id: None,
                    success: false,
                    assignment_id: None,
                    error: Some(err.to_string()),
                });
            }
            None => open.push((position, shift_id)),
        }
    }

    let open_ids: Vec<i64> = open.iter().map(|(_, id)| *id).collect();
    let pairs: Vec<(i64, i64)> = plan_round_robin(&request.worker_ids, &open_ids);
    for ((position, _), (shift_id, worker_id)) in open.iter().zip(pairs) {
        let attempt = assign_one(
            persistence,
            shift_id,
            worker_id,
            resolver,
            admin,
            cause.clone(),
            policy,
        );
        let item = match attempt {
            Ok(assignment_id) => BulkAssignItem {
                shift_id,
                worker_id: Some(worker_id),
                success: true,
                assignment_id: Some(assignment_id),
                error: None,
            },
            Err(err) => {
                warn!(shift_id, worker_id, error = %err, "Bulk assignment item failed");
                BulkAssignItem {
                    shift_id,
                    worker_id: Some(worker_id),
                    success: false,
                    assignment_id: None,
                    error: Some(err.to_string()),
                }
            }
        };
        results[*position] = Some(item);
    }

    let results: Vec<BulkAssignItem> = results.into_iter().flatten().collect();
    let succeeded: usize = results.iter().filter(|r| r.success).count();
    let failed: usize = results.len() - succeeded;
    info!(succeeded, failed, "Bulk assignment finished");

    Ok(BulkAssignResponse {
        results,
        succeeded,
        failed,
    })
}

fn assignment_command(
    persistence: &mut Persistence,
    assignment_id: i64,
    command: Command,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<AssignmentResponse, ApiError> {
    let event_id: i64 = event_of_assignment(persistence, assignment_id)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let (result, persisted) =
        apply_and_persist(persistence, &graph, command, None, admin, cause, policy)?;

    let Mutation::UpdateAssignment {
        assignment: updated,
        ..
    } = &result.mutation
    else {
        return Err(ApiError::Internal {
            message: String::from("Assignment command produced an unexpected mutation"),
        });
    };

    Ok(AssignmentResponse {
        assignment: assignment_info(updated)?,
        audit_event_id: persisted.audit_event_id,
        warnings: result.warnings.iter().map(ToString::to_string).collect(),
    })
}

/// Cancels an assignment, freeing its slot. The reason is kept in `notes`.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or is already
/// cancelled, a no-show, or completed.
pub fn unassign(
    persistence: &mut Persistence,
    assignment_id: i64,
    request: &UnassignRequest,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<AssignmentResponse, ApiError> {
    assignment_command(
        persistence,
        assignment_id,
        Command::Unassign {
            assignment_id,
            reason: request.reason.clone(),
        },
        admin,
        cause,
        policy,
    )
}

/// Records that the worker did not show up, freeing the slot.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or cannot move to
/// `no_show`.
pub fn mark_no_show(
    persistence: &mut Persistence,
    assignment_id: i64,
    request: &MarkNoShowRequest,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<AssignmentResponse, ApiError> {
    assignment_command(
        persistence,
        assignment_id,
        Command::MarkNoShow {
            assignment_id,
            notes: request.notes.clone(),
        },
        admin,
        cause,
        policy,
    )
}

/// Records that the worker acknowledged the shift.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or is not `assigned`.
pub fn confirm_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<AssignmentResponse, ApiError> {
    assignment_command(
        persistence,
        assignment_id,
        Command::ConfirmAssignment { assignment_id },
        admin,
        cause,
        policy,
    )
}

/// Records hours worked and completes the assignment.
///
/// Recording again on a completed assignment corrects the hours. Hours
/// above the scheduled shift length are accepted with a warning.
///
/// # Errors
///
/// Returns an error if:
/// - The assignment does not exist
/// - The assignment is cancelled or a no-show
/// - The hours are negative, not finite, or above the configured cap
pub fn record_completion(
    persistence: &mut Persistence,
    assignment_id: i64,
    request: &RecordCompletionRequest,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<AssignmentResponse, ApiError> {
    assignment_command(
        persistence,
        assignment_id,
        Command::RecordCompletion {
            assignment_id,
            hours_worked: request.hours_worked,
        },
        admin,
        cause,
        policy,
    )
}

/// Moves a shift to a new status.
///
/// # Errors
///
/// Returns an error if:
/// - The shift does not exist or the status is unknown
/// - The transition is not in the shift workflow
/// - The shift is moving to `assigned` without being fully staffed
pub fn transition_shift_status(
    persistence: &mut Persistence,
    shift_id: i64,
    request: &TransitionStatusRequest,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<TransitionStatusResponse, ApiError> {
    let target: ShiftStatus = request.status.parse().map_err(translate_domain_error)?;
    let event_id: i64 = event_of_shift(persistence, shift_id)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let from: ShiftStatus = graph.shift(shift_id).map_err(translate_domain_error)?.status;

    let (_, persisted) = apply_and_persist(
        persistence,
        &graph,
        Command::TransitionShiftStatus { shift_id, target },
        None,
        admin,
        cause,
        policy,
    )?;

    Ok(TransitionStatusResponse {
        from: from.to_string(),
        to: target.to_string(),
        audit_event_id: persisted.audit_event_id,
        message: format!("Shift {shift_id} moved from {from} to {target}"),
    })
}

/// Moves an event to a new status. Publishing also publishes its draft shifts.
///
/// # Errors
///
/// Returns an error if the event does not exist, the status is unknown, or
/// the transition is not allowed.
pub fn transition_event_status(
    persistence: &mut Persistence,
    event_id: i64,
    request: &TransitionStatusRequest,
    admin: &ActingAdmin,
    cause: Cause,
    policy: &StaffingPolicy,
) -> Result<TransitionStatusResponse, ApiError> {
    let target: EventStatus = request.status.parse().map_err(translate_domain_error)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let from: EventStatus = graph.event.status;

    let (_, persisted) = apply_and_persist(
        persistence,
        &graph,
        Command::TransitionEventStatus { target },
        None,
        admin,
        cause,
        policy,
    )?;

    Ok(TransitionStatusResponse {
        from: from.to_string(),
        to: target.to_string(),
        audit_event_id: persisted.audit_event_id,
        message: format!("Event {event_id} moved from {from} to {target}"),
    })
}

// ============================================================================
// Read views
// ============================================================================

/// Returns an event's staffing overview: the event-level progress, the
/// per-role breakdown, and every shift with its own progress.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn get_event_staffing(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<EventStaffingResponse, ApiError> {
    let graph: EventGraph = load_graph(persistence, event_id)?;

    let mut shifts: Vec<ShiftInfo> = Vec::with_capacity(graph.shifts.len());
    for shift in &graph.shifts {
        shifts.push(ShiftInfo {
            shift_id: shift.shift_id,
            event_id: shift.event_id,
            role_needed: shift.role_needed.as_ref().map(ToString::to_string),
            capacity: shift.capacity.map(crewcall_domain::Capacity::value),
            start_time: format_timestamp(shift.start_time)?,
            end_time: format_timestamp(shift.end_time)?,
            status: shift.status.to_string(),
            required_certification: shift.required_certification,
            progress: graph
                .shift_progress(shift.shift_id)
                .map_err(translate_domain_error)?,
        });
    }

    Ok(EventStaffingResponse {
        event_id,
        title: graph.event.title.clone(),
        status: graph.event.status.to_string(),
        schedule: graph.schedule.as_ref().map(schedule_info).transpose()?,
        progress: graph.staffing_progress(),
        shifts,
    })
}

/// Returns one shift's staffing progress.
///
/// # Errors
///
/// Returns an error if the shift does not exist.
pub fn get_shift_staffing(
    persistence: &mut Persistence,
    shift_id: i64,
) -> Result<ShiftStaffingProgress, ApiError> {
    let event_id: i64 = event_of_shift(persistence, shift_id)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    graph
        .shift_progress(shift_id)
        .map_err(translate_domain_error)
}

/// Returns one role's staffing progress within an event.
///
/// # Errors
///
/// Returns an error if the event does not exist or the role is malformed.
pub fn get_role_staffing(
    persistence: &mut Persistence,
    event_id: i64,
    role: &str,
) -> Result<RoleGroupProgress, ApiError> {
    let role: SkillName = parse_skill(role)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    Ok(role_group_progress(
        &graph.requirements,
        &graph.shifts,
        &graph.assignments,
        &role,
    ))
}

/// Lists every eligibility rule a worker fails for a shift, without writing.
///
/// # Errors
///
/// Returns an error if the shift or worker does not exist.
pub fn preview_eligibility(
    persistence: &mut Persistence,
    shift_id: i64,
    worker_id: i64,
    policy: &StaffingPolicy,
) -> Result<EligibilityResponse, ApiError> {
    let event_id: i64 = event_of_shift(persistence, shift_id)?;
    let graph: EventGraph = load_graph(persistence, event_id)?;
    let shift = graph.shift(shift_id).map_err(translate_domain_error)?;
    let profile: WorkerProfile = load_profile(persistence, worker_id)?;

    let reasons: Vec<String> = eligibility_reasons(
        &profile.worker,
        shift,
        &profile.bookings,
        &policy.eligibility,
    )
    .iter()
    .map(|r| r.as_str().to_string())
    .collect();

    Ok(EligibilityResponse {
        shift_id,
        worker_id,
        eligible: reasons.is_empty(),
        reasons,
    })
}

/// Lists an event's audit trail, oldest first.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn list_audit_events(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<Vec<AuditEventInfo>, ApiError> {
    load_event(persistence, event_id)?;
    let events: Vec<AuditEvent> = persistence
        .list_audit_events(event_id)
        .map_err(translate_persistence_error)?;
    Ok(events.iter().map(audit_event_info).collect())
}
