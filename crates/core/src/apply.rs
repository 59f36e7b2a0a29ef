// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::pay_rate::{PayRateResolver, RequirementPayRates};
use crate::state::{
    ApplyContext, EventGraph, Mutation, TransitionResult, TransitionWarning, assignment_snapshot,
    shift_snapshot,
};
use crewcall_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use crewcall_domain::{
    Assignment, AssignmentStatus, DomainError, EventStatus, HoursCheck, NewAssignment,
    ShiftStatus, ShiftSyncMode, ShiftSyncPlan, WorkerBooking, check_eligibility,
    plan_shift_sync, shift_staffing_progress, validate_hourly_rate, validate_hours_worked,
};
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Applies a command to an event graph.
///
/// This is a pure function: it decides what must change and produces the
/// matching audit event, but writes nothing. The caller persists the
/// returned mutation and audit event in a single transaction.
///
/// # Arguments
///
/// * `graph` - The eagerly loaded event
/// * `command` - The write to perform
/// * `actor` - The acting admin; recorded as `assigned_by` and as the audit actor
/// * `cause` - Why the write happened
/// * `ctx` - The worker profile for assignments, the staffing policy, and the clock
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` for any rule the command breaks.
pub fn apply(
    graph: &EventGraph,
    command: Command,
    actor: Actor,
    cause: Cause,
    ctx: &ApplyContext<'_>,
) -> Result<TransitionResult, CoreError> {
    let event_id = graph.event_id()?;
    debug!(event_id, command = command.name(), "Applying command");

    match command {
        Command::GenerateShifts => sync_shifts(graph, ShiftSyncMode::Regenerate, actor, cause),
        Command::RepairShifts => sync_shifts(graph, ShiftSyncMode::Repair, actor, cause),
        Command::Assign {
            worker_id,
            shift_id,
            hourly_rate,
        } => assign(graph, worker_id, shift_id, hourly_rate, actor, cause, ctx),
        Command::ConfirmAssignment { assignment_id } => transition_assignment(
            graph,
            assignment_id,
            AssignmentStatus::Confirmed,
            None,
            actor,
            cause,
            ctx.now,
        ),
        Command::Unassign {
            assignment_id,
            reason,
        } => transition_assignment(
            graph,
            assignment_id,
            AssignmentStatus::Cancelled,
            reason,
            actor,
            cause,
            ctx.now,
        ),
        Command::MarkNoShow {
            assignment_id,
            notes,
        } => transition_assignment(
            graph,
            assignment_id,
            AssignmentStatus::NoShow,
            notes,
            actor,
            cause,
            ctx.now,
        ),
        Command::RecordCompletion {
            assignment_id,
            hours_worked,
        } => record_completion(graph, assignment_id, hours_worked, actor, cause, ctx),
        Command::TransitionShiftStatus { shift_id, target } => {
            transition_shift(graph, shift_id, target, actor, cause)
        }
        Command::TransitionEventStatus { target } => {
            transition_event(graph, event_id, target, actor, cause)
        }
    }
}

fn sync_shifts(
    graph: &EventGraph,
    mode: ShiftSyncMode,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let event_id = graph.event_id()?;
    let plan: ShiftSyncPlan = plan_shift_sync(
        &graph.event,
        graph.schedule.as_ref(),
        &graph.requirements,
        &graph.shifts,
        &graph.assignments,
        mode,
    )?;

    let mut warnings: Vec<TransitionWarning> = Vec::new();
    if !plan.flagged_shift_ids.is_empty() {
        warn!(
            event_id,
            flagged = ?plan.flagged_shift_ids,
            "Damaged shifts hold active assignments and need operator attention"
        );
        warnings.push(TransitionWarning::FlaggedShifts {
            shift_ids: plan.flagged_shift_ids.clone(),
        });
    }

    let (name, details) = match mode {
        ShiftSyncMode::Regenerate => (
            "GenerateShifts",
            format!(
                "Deleted {} unassigned shifts, kept {} assigned, created {}",
                plan.delete_shift_ids.len(),
                plan.retained_shift_ids.len(),
                plan.create.len()
            ),
        ),
        ShiftSyncMode::Repair => (
            "RepairShifts",
            format!(
                "Detected {} anomalies, deleted {}, flagged {}, created {}",
                plan.anomalies.len(),
                plan.delete_shift_ids.len(),
                plan.flagged_shift_ids.len(),
                plan.create.len()
            ),
        ),
    };

    let remaining = graph.shifts.len() - plan.delete_shift_ids.len() + plan.create.len();
    let before: StateSnapshot = graph.to_snapshot();
    let after: StateSnapshot = StateSnapshot::new(format!(
        "event_status={},shifts={remaining}",
        graph.event.status
    ));

    let audit_event = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(name), Some(details)),
        before,
        after,
        Some(event_id),
    );

    Ok(TransitionResult {
        mutation: Mutation::SyncShifts(plan),
        audit_event,
        warnings,
    })
}

fn assign(
    graph: &EventGraph,
    worker_id: i64,
    shift_id: i64,
    hourly_rate: Option<f64>,
    actor: Actor,
    cause: Cause,
    ctx: &ApplyContext<'_>,
) -> Result<TransitionResult, CoreError> {
    let event_id = graph.event_id()?;
    if !graph.event.status.allows_shift_generation() {
        return Err(CoreError::DomainViolation(DomainError::EventNotSchedulable {
            event_id,
            status: graph.event.status,
        }));
    }
    let shift = graph.shift(shift_id)?;
    if !shift.status.accepts_assignments() {
        return Err(CoreError::DomainViolation(DomainError::ShiftNotAssignable {
            shift_id,
            status: shift.status,
        }));
    }
    let profile = ctx
        .worker
        .filter(|p| p.worker.worker_id == Some(worker_id))
        .ok_or(DomainError::WorkerNotFound(worker_id))?;

    // The profile's bookings span every event; make sure this event's own
    // active assignments for the worker are present even if it is stale.
    let mut bookings: Vec<WorkerBooking> = profile.bookings.clone();
    for existing in graph
        .assignments
        .iter()
        .filter(|a| a.worker_id == worker_id && a.is_active())
    {
        if bookings
            .iter()
            .any(|b| b.assignment_id == existing.assignment_id)
        {
            continue;
        }
        if let Ok(booked_shift) = graph.shift(existing.shift_id) {
            bookings.push(WorkerBooking {
                assignment_id: existing.assignment_id,
                shift_id: existing.shift_id,
                start_time: booked_shift.start_time,
                end_time: booked_shift.end_time,
            });
        }
    }

    check_eligibility(&profile.worker, shift, &bookings, &ctx.policy.eligibility)?;

    let active = graph.active_assignments_on(shift_id).count();
    let capacity = shift.required_slots();
    if u32::try_from(active).unwrap_or(u32::MAX) >= capacity {
        return Err(CoreError::DomainViolation(DomainError::ShiftAtCapacity {
            shift_id,
            capacity,
        }));
    }

    let hourly_rate = match hourly_rate {
        Some(rate) => {
            validate_hourly_rate(rate)?;
            Some(rate)
        }
        None => RequirementPayRates::new(&graph.requirements, ctx.policy.default_hourly_rate)
            .resolve(shift),
    };

    let new_assignment = NewAssignment {
        shift_id,
        worker_id,
        assigned_by: actor.id.clone(),
        assigned_at: ctx.now,
        status: AssignmentStatus::Assigned,
        hourly_rate,
    };

    let audit_event = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("Assign"),
            Some(format!(
                "Assigned worker {worker_id} to shift {shift_id} at rate {}",
                hourly_rate.map_or_else(|| String::from("unset"), |r| format!("{r:.2}"))
            )),
        ),
        shift_snapshot(shift, active, shift.status),
        shift_snapshot(shift, active + 1, shift.status),
        Some(event_id),
    )
    .with_shift(shift_id);

    Ok(TransitionResult {
        mutation: Mutation::CreateAssignment(new_assignment),
        audit_event,
        warnings: Vec::new(),
    })
}

fn updated_assignment(
    existing: &Assignment,
    target: AssignmentStatus,
    notes: Option<String>,
    now: OffsetDateTime,
) -> Assignment {
    let mut updated = existing.clone();
    updated.status = target;
    if notes.is_some() {
        updated.notes = notes;
    }
    updated.updated_at = now;
    updated
}

fn assignment_audit_event(
    graph: &EventGraph,
    before: &Assignment,
    after: &Assignment,
    name: &str,
    details: String,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    Ok(AuditEvent::new(
        actor,
        cause,
        Action::new(name.to_string(), Some(details)),
        assignment_snapshot(before),
        assignment_snapshot(after),
        Some(graph.event_id()?),
    )
    .with_shift(before.shift_id))
}

fn transition_assignment(
    graph: &EventGraph,
    assignment_id: i64,
    target: AssignmentStatus,
    notes: Option<String>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let existing = graph.assignment(assignment_id)?;
    existing.status.validate_transition(target)?;

    let updated = updated_assignment(existing, target, notes, now);
    let name = match target {
        AssignmentStatus::Confirmed => "ConfirmAssignment",
        AssignmentStatus::NoShow => "MarkNoShow",
        AssignmentStatus::Cancelled => "Unassign",
        AssignmentStatus::Assigned | AssignmentStatus::Completed => "TransitionAssignment",
    };
    let details = format!(
        "Assignment {assignment_id} moved from {} to {target}",
        existing.status
    );
    let audit_event =
        assignment_audit_event(graph, existing, &updated, name, details, actor, cause)?;

    Ok(TransitionResult {
        mutation: Mutation::UpdateAssignment {
            from: existing.status,
            assignment: updated,
        },
        audit_event,
        warnings: Vec::new(),
    })
}

fn record_completion(
    graph: &EventGraph,
    assignment_id: i64,
    hours_worked: f64,
    actor: Actor,
    cause: Cause,
    ctx: &ApplyContext<'_>,
) -> Result<TransitionResult, CoreError> {
    let existing = graph.assignment(assignment_id)?;
    existing
        .status
        .validate_transition(AssignmentStatus::Completed)?;
    let shift = graph.shift(existing.shift_id)?;

    let check = validate_hours_worked(hours_worked, shift, &ctx.policy.hours)?;

    let mut updated = updated_assignment(existing, AssignmentStatus::Completed, None, ctx.now);
    updated.hours_worked = Some(hours_worked);

    let mut warnings: Vec<TransitionWarning> = Vec::new();
    if let HoursCheck::ExceedsSchedule { scheduled_hours } = check {
        warn!(
            assignment_id,
            hours_worked, scheduled_hours, "Recorded hours exceed the scheduled shift length"
        );
        warnings.push(TransitionWarning::HoursExceedSchedule {
            assignment_id,
            hours_worked,
            scheduled_hours,
        });
    }

    let details = if existing.status == AssignmentStatus::Completed {
        format!(
            "Corrected hours on assignment {assignment_id} from {} to {hours_worked}",
            existing.hours_worked.unwrap_or(0.0)
        )
    } else {
        format!("Recorded {hours_worked} hours on assignment {assignment_id}")
    };
    let audit_event = assignment_audit_event(
        graph,
        existing,
        &updated,
        "RecordCompletion",
        details,
        actor,
        cause,
    )?;

    Ok(TransitionResult {
        mutation: Mutation::UpdateAssignment {
            from: existing.status,
            assignment: updated,
        },
        audit_event,
        warnings,
    })
}

fn transition_shift(
    graph: &EventGraph,
    shift_id: i64,
    target: ShiftStatus,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let event_id = graph.event_id()?;
    let shift = graph.shift(shift_id)?;
    let progress = shift_staffing_progress(shift, &graph.assignments);

    shift.status.validate_transition(target, &progress)?;

    let active = usize::try_from(progress.assigned).unwrap_or(usize::MAX);
    let audit_event = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("TransitionShiftStatus"),
            Some(format!(
                "Shift {shift_id} moved from {} to {target}",
                shift.status
            )),
        ),
        shift_snapshot(shift, active, shift.status),
        shift_snapshot(shift, active, target),
        Some(event_id),
    )
    .with_shift(shift_id);

    Ok(TransitionResult {
        mutation: Mutation::UpdateShiftStatus {
            shift_id,
            status: target,
        },
        audit_event,
        warnings: Vec::new(),
    })
}

fn transition_event(
    graph: &EventGraph,
    event_id: i64,
    target: EventStatus,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    graph.event.status.validate_transition(target)?;

    let published_shift_ids: Vec<i64> = if target == EventStatus::Published {
        graph
            .shifts
            .iter()
            .filter(|s| s.status == ShiftStatus::Draft)
            .map(|s| s.shift_id)
            .collect()
    } else {
        Vec::new()
    };

    let audit_event = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("TransitionEventStatus"),
            Some(format!(
                "Event {event_id} moved from {} to {target}; {} draft shifts published",
                graph.event.status,
                published_shift_ids.len()
            )),
        ),
        StateSnapshot::new(format!("event_status={}", graph.event.status)),
        StateSnapshot::new(format!("event_status={target}")),
        Some(event_id),
    );

    Ok(TransitionResult {
        mutation: Mutation::UpdateEventStatus {
            event_id,
            status: target,
            published_shift_ids,
        },
        audit_event,
        warnings: Vec::new(),
    })
}
