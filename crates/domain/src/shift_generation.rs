// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift generation, regeneration, and repair.
//!
//! Generation expands each skill requirement into `needed_workers` shifts
//! of capacity one spanning the event schedule. Regeneration and repair are
//! expressed as a [`ShiftSyncPlan`]: the set of shifts to delete, keep, and
//! create. Executing the plan is left to the persistence layer, which runs
//! it in a single transaction.
//!
//! ## Invariants
//!
//! - A shift holding an active assignment is never deleted
//! - Generated shifts always have capacity one
//! - Breaks are not subtracted from shift windows

use crate::assignment::Assignment;
use crate::error::DomainError;
use crate::event::{Event, EventSchedule, EventSkillRequirement, EventStatus};
use crate::shift::{NewShift, Shift, ShiftAnomaly, detect_shift_anomalies};
use crate::shift_status::ShiftStatus;
use crate::types::{Capacity, SkillName};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How an existing shift set is reconciled with the requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSyncMode {
    /// Drop every unassigned shift and regenerate the deficit.
    Regenerate,
    /// Drop only unassigned damaged shifts and regenerate the deficit.
    Repair,
}

/// The changes needed to reconcile an event's shifts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftSyncPlan {
    /// Shifts to delete. None of them holds an active assignment.
    pub delete_shift_ids: Vec<i64>,
    /// Shifts kept because they hold an active assignment.
    pub retained_shift_ids: Vec<i64>,
    /// Damaged shifts left alone because they hold an active assignment.
    pub flagged_shift_ids: Vec<i64>,
    /// Damaged shifts detected. Empty for regeneration.
    pub anomalies: Vec<ShiftAnomaly>,
    /// Shifts to insert.
    pub create: Vec<NewShift>,
}

fn check_generation_preconditions<'a>(
    event: &Event,
    schedule: Option<&'a EventSchedule>,
    requirements: &[EventSkillRequirement],
) -> Result<(i64, &'a EventSchedule), DomainError> {
    let event_id = event.event_id.ok_or_else(|| {
        DomainError::InvalidEvent(String::from(
            "Shifts can only be generated for a persisted event",
        ))
    })?;

    if !event.status.allows_shift_generation() {
        return Err(DomainError::EventNotSchedulable {
            event_id,
            status: event.status,
        });
    }

    let schedule = schedule.ok_or(DomainError::MissingSchedule { event_id })?;

    if requirements.is_empty() {
        return Err(DomainError::NoSkillRequirements { event_id });
    }

    Ok((event_id, schedule))
}

const fn initial_shift_status(event_status: EventStatus) -> ShiftStatus {
    match event_status {
        EventStatus::Published => ShiftStatus::Published,
        EventStatus::Draft | EventStatus::Completed | EventStatus::Deleted => ShiftStatus::Draft,
    }
}

/// A role together with the certification its shifts require.
type ShiftKind = (SkillName, Option<i64>);

/// Counts a kept shift toward the requirement it fills. Cancelled shifts and
/// damaged rows fill nothing.
fn credit_shift(credit: &mut HashMap<ShiftKind, u32>, shift: &Shift) {
    if shift.status == ShiftStatus::Cancelled {
        return;
    }
    if let Some(role) = &shift.role_needed {
        *credit
            .entry((role.clone(), shift.required_certification))
            .or_insert(0) += 1;
    }
}

/// Builds the shifts for requirements, skipping the shifts already credited
/// to the same role and certification.
fn build_shifts(
    event_id: i64,
    status: ShiftStatus,
    schedule: &EventSchedule,
    requirements: &[EventSkillRequirement],
    mut credit: HashMap<ShiftKind, u32>,
) -> Vec<NewShift> {
    let mut shifts: Vec<NewShift> = Vec::new();

    for requirement in requirements {
        let mut count = requirement.effective_count();
        let kind = (
            requirement.skill_name.clone(),
            requirement.required_certification,
        );
        if let Some(available) = credit.get_mut(&kind) {
            let used = (*available).min(count);
            *available -= used;
            count -= used;
        }

        for _ in 0..count {
            shifts.push(NewShift {
                event_id,
                role_needed: requirement.skill_name.clone(),
                capacity: Capacity::SINGLE,
                start_time: schedule.start_time(),
                end_time: schedule.end_time(),
                status,
                required_certification: requirement.required_certification,
            });
        }
    }

    shifts
}

/// Expands an event's requirements into new shifts.
///
/// # Errors
///
/// - `DomainError::InvalidEvent` if the event has not been persisted
/// - `DomainError::EventNotSchedulable` if the event is completed or deleted
/// - `DomainError::MissingSchedule` if there is no schedule
/// - `DomainError::NoSkillRequirements` if there are no requirements
pub fn generate_shifts(
    event: &Event,
    schedule: Option<&EventSchedule>,
    requirements: &[EventSkillRequirement],
) -> Result<Vec<NewShift>, DomainError> {
    let (event_id, schedule) = check_generation_preconditions(event, schedule, requirements)?;
    Ok(build_shifts(
        event_id,
        initial_shift_status(event.status),
        schedule,
        requirements,
        HashMap::new(),
    ))
}

/// Plans how to reconcile an event's existing shifts with its requirements.
///
/// `assignments` may include inactive assignments; only active ones protect
/// a shift.
///
/// # Errors
///
/// Fails with the same preconditions as [`generate_shifts`].
pub fn plan_shift_sync(
    event: &Event,
    schedule: Option<&EventSchedule>,
    requirements: &[EventSkillRequirement],
    shifts: &[Shift],
    assignments: &[Assignment],
    mode: ShiftSyncMode,
) -> Result<ShiftSyncPlan, DomainError> {
    let (event_id, schedule) = check_generation_preconditions(event, schedule, requirements)?;

    let occupied: HashSet<i64> = assignments
        .iter()
        .filter(|a| a.is_active())
        .map(|a| a.shift_id)
        .collect();

    let mut plan = ShiftSyncPlan::default();
    let mut credit: HashMap<ShiftKind, u32> = HashMap::new();

    match mode {
        ShiftSyncMode::Regenerate => {
            for shift in shifts {
                if occupied.contains(&shift.shift_id) {
                    plan.retained_shift_ids.push(shift.shift_id);
                    credit_shift(&mut credit, shift);
                } else {
                    plan.delete_shift_ids.push(shift.shift_id);
                }
            }
        }
        ShiftSyncMode::Repair => {
            plan.anomalies = detect_shift_anomalies(shifts);
            for shift in shifts {
                if shift.is_intact() {
                    credit_shift(&mut credit, shift);
                } else if occupied.contains(&shift.shift_id) {
                    plan.flagged_shift_ids.push(shift.shift_id);
                } else {
                    plan.delete_shift_ids.push(shift.shift_id);
                }
            }
        }
    }

    plan.create = build_shifts(
        event_id,
        initial_shift_status(event.status),
        schedule,
        requirements,
        credit,
    );

    Ok(plan)
}
