// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod assignment;
mod eligibility;
mod error;
mod event;
mod hours;
mod schedule_local;
mod shift;
mod shift_generation;
mod shift_status;
mod staffing;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use assignment::{Assignment, AssignmentStatus, NewAssignment};
pub use eligibility::{
    EligibilityPolicy, IneligibilityReason, WorkerBooking, can_assign, check_eligibility,
    eligibility_reasons,
};
pub use error::DomainError;
pub use event::{Event, EventSchedule, EventSkillRequirement, EventStatus, total_workers_needed};
pub use hours::{HoursCheck, HoursPolicy, validate_hours_worked};
pub use schedule_local::schedule_from_local;
pub use shift::{NewShift, Shift, ShiftAnomaly, detect_shift_anomalies};
pub use shift_generation::{ShiftSyncMode, ShiftSyncPlan, generate_shifts, plan_shift_sync};
pub use shift_status::ShiftStatus;
pub use staffing::{
    EventStaffingProgress, RoleGroupProgress, ShiftStaffingProgress, event_staffing_progress,
    role_group_progress, shift_staffing_progress, staffing_percentage,
};
pub use types::{
    Capacity, Certification, SkillCatalog, SkillName, Venue, Worker, WorkerCertification,
};
pub use validation::{
    MAX_NEEDED_WORKERS, validate_event_fields, validate_hourly_rate, validate_requirement,
    validate_venue, validate_worker_fields,
};
