// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staffing progress at the shift, role, and event level.
//!
//! All views are derived on demand from an eagerly loaded set of
//! requirements, shifts, and assignments. Nothing here performs I/O or is
//! ever stored.
//!
//! ## Invariants
//!
//! - Event `required` is the sum of requirement counts, never the shift count
//! - A shift with no capacity requires zero workers
//! - A shift with no role is counted in `unknown_role_shifts` and never fails
//!   aggregation
//! - Percentages round half up and are zero when nothing is required

use crate::assignment::Assignment;
use crate::event::EventSkillRequirement;
use crate::shift::Shift;
use crate::types::SkillName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// `round(assigned / required * 100)`, rounding half up, zero when
/// `required` is zero. Integer math; no float rounding drift.
#[must_use]
pub fn staffing_percentage(assigned: u32, required: u32) -> u32 {
    if required == 0 {
        return 0;
    }
    let assigned = u64::from(assigned);
    let required = u64::from(required);
    let pct = (assigned * 200 + required) / (required * 2);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

/// Progress of a single shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftStaffingProgress {
    pub shift_id: i64,
    pub assigned: u32,
    pub required: u32,
    pub percentage: u32,
}

/// Progress of one role across an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGroupProgress {
    pub role: String,
    pub total_shifts: u32,
    /// Shifts in the role at 100%.
    pub filled_shifts: u32,
    /// Active assignments across the role's shifts.
    pub assigned_workers: u32,
    /// Sum of the role's requirement counts.
    pub needed_workers: u32,
    pub percentage: u32,
}

/// Progress of a whole event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStaffingProgress {
    /// Shifts holding at least one active assignment.
    pub assigned: u32,
    /// Sum of requirement counts.
    pub required: u32,
    pub percentage: u32,
    /// Keyed by role; covers every role in the requirements or the shifts.
    pub by_role: BTreeMap<String, RoleGroupProgress>,
    /// Shifts whose role is missing.
    pub unknown_role_shifts: u32,
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Active assignment counts keyed by shift.
fn active_counts(assignments: &[Assignment]) -> HashMap<i64, u32> {
    let mut counts: HashMap<i64, u32> = HashMap::new();
    for assignment in assignments.iter().filter(|a| a.is_active()) {
        *counts.entry(assignment.shift_id).or_insert(0) += 1;
    }
    counts
}

fn progress_from_counts(shift: &Shift, counts: &HashMap<i64, u32>) -> ShiftStaffingProgress {
    let assigned = counts.get(&shift.shift_id).copied().unwrap_or(0);
    let required = shift.required_slots();
    ShiftStaffingProgress {
        shift_id: shift.shift_id,
        assigned,
        required,
        percentage: staffing_percentage(assigned, required),
    }
}

/// Staffing progress for one shift.
///
/// Only assignments on this shift are counted; the slice may hold the
/// whole event's assignments.
#[must_use]
pub fn shift_staffing_progress(shift: &Shift, assignments: &[Assignment]) -> ShiftStaffingProgress {
    let assigned = count_u32(
        assignments
            .iter()
            .filter(|a| a.shift_id == shift.shift_id && a.is_active())
            .count(),
    );
    let required = shift.required_slots();
    ShiftStaffingProgress {
        shift_id: shift.shift_id,
        assigned,
        required,
        percentage: staffing_percentage(assigned, required),
    }
}

fn role_progress_with_counts(
    requirements: &[EventSkillRequirement],
    shifts: &[Shift],
    counts: &HashMap<i64, u32>,
    role: &SkillName,
) -> RoleGroupProgress {
    let needed_workers: u32 = requirements
        .iter()
        .filter(|r| &r.skill_name == role)
        .map(EventSkillRequirement::effective_count)
        .sum();

    let mut total_shifts: u32 = 0;
    let mut filled_shifts: u32 = 0;
    let mut assigned_workers: u32 = 0;

    for shift in shifts.iter().filter(|s| s.role_needed.as_ref() == Some(role)) {
        let progress = progress_from_counts(shift, counts);
        total_shifts += 1;
        assigned_workers += progress.assigned;
        if progress.percentage == 100 {
            filled_shifts += 1;
        }
    }

    RoleGroupProgress {
        role: role.value().to_string(),
        total_shifts,
        filled_shifts,
        assigned_workers,
        needed_workers,
        percentage: staffing_percentage(assigned_workers, needed_workers),
    }
}

/// Staffing progress for one role.
#[must_use]
pub fn role_group_progress(
    requirements: &[EventSkillRequirement],
    shifts: &[Shift],
    assignments: &[Assignment],
    role: &SkillName,
) -> RoleGroupProgress {
    role_progress_with_counts(requirements, shifts, &active_counts(assignments), role)
}

/// Staffing progress for a whole event.
#[must_use]
pub fn event_staffing_progress(
    requirements: &[EventSkillRequirement],
    shifts: &[Shift],
    assignments: &[Assignment],
) -> EventStaffingProgress {
    let counts = active_counts(assignments);

    let required: u32 = crate::event::total_workers_needed(requirements);
    let assigned = count_u32(
        shifts
            .iter()
            .filter(|s| counts.get(&s.shift_id).copied().unwrap_or(0) > 0)
            .count(),
    );
    let unknown_role_shifts = count_u32(shifts.iter().filter(|s| s.role_needed.is_none()).count());

    let mut roles: Vec<&SkillName> = requirements
        .iter()
        .map(|r| &r.skill_name)
        .chain(shifts.iter().filter_map(|s| s.role_needed.as_ref()))
        .collect();
    roles.sort();
    roles.dedup();

    let by_role = roles
        .into_iter()
        .map(|role| {
            (
                role.value().to_string(),
                role_progress_with_counts(requirements, shifts, &counts, role),
            )
        })
        .collect();

    EventStaffingProgress {
        assigned,
        required,
        percentage: staffing_percentage(assigned, required),
        by_role,
        unknown_role_shifts,
    }
}
