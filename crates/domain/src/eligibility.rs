// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker eligibility for a shift.
//!
//! The checker is a pure predicate over a worker, a shift, and the worker's
//! active bookings. It reports every failing rule, not just the first, so a
//! scheduler UI can explain the whole picture at once.

use crate::error::DomainError;
use crate::shift::Shift;
use crate::types::Worker;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One reason a worker cannot take a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IneligibilityReason {
    /// The worker is not active.
    Inactive,
    /// The worker lacks the shift's role, or the shift has no role.
    MissingSkill,
    /// The shift's certification is not held or lapses before the shift ends.
    MissingOrExpiredCertification,
    /// The worker already holds an active assignment on this shift.
    AlreadyAssigned,
    /// The worker holds an active assignment on an overlapping shift.
    OverlappingAssignment,
}

impl IneligibilityReason {
    /// Stable reason code used in API responses and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::MissingSkill => "missing-skill",
            Self::MissingOrExpiredCertification => "missing-or-expired-certification",
            Self::AlreadyAssigned => "already-assigned",
            Self::OverlappingAssignment => "overlapping-assignment",
        }
    }
}

impl std::fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active assignment held by a worker, with its shift's time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerBooking {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}

/// Tunable eligibility rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    /// Reject workers already booked on an overlapping shift.
    pub enforce_overlap: bool,
}

/// Returns every rule the worker fails for the shift, in a stable order.
///
/// An empty vector means the worker is eligible.
#[must_use]
pub fn eligibility_reasons(
    worker: &Worker,
    shift: &Shift,
    bookings: &[WorkerBooking],
    policy: &EligibilityPolicy,
) -> Vec<IneligibilityReason> {
    let mut reasons: Vec<IneligibilityReason> = Vec::new();

    if !worker.active {
        reasons.push(IneligibilityReason::Inactive);
    }

    let has_role = shift
        .role_needed
        .as_ref()
        .is_some_and(|role| worker.has_skill(role));
    if !has_role {
        reasons.push(IneligibilityReason::MissingSkill);
    }

    if let Some(certification_id) = shift.required_certification
        && !worker.holds_certification_through(certification_id, shift.end_time)
    {
        reasons.push(IneligibilityReason::MissingOrExpiredCertification);
    }

    if bookings.iter().any(|b| b.shift_id == shift.shift_id) {
        reasons.push(IneligibilityReason::AlreadyAssigned);
    }

    if policy.enforce_overlap
        && bookings
            .iter()
            .filter(|b| b.shift_id != shift.shift_id)
            .any(|b| shift.overlaps(b.start_time, b.end_time))
    {
        reasons.push(IneligibilityReason::OverlappingAssignment);
    }

    reasons
}

/// Returns true if the worker passes every eligibility rule.
#[must_use]
pub fn can_assign(
    worker: &Worker,
    shift: &Shift,
    bookings: &[WorkerBooking],
    policy: &EligibilityPolicy,
) -> bool {
    eligibility_reasons(worker, shift, bookings, policy).is_empty()
}

/// Checks eligibility, failing with every reason.
///
/// # Errors
///
/// Returns `DomainError::IneligibleWorker` if any rule fails.
pub fn check_eligibility(
    worker: &Worker,
    shift: &Shift,
    bookings: &[WorkerBooking],
    policy: &EligibilityPolicy,
) -> Result<(), DomainError> {
    let reasons = eligibility_reasons(worker, shift, bookings, policy);
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(DomainError::IneligibleWorker {
            worker_id: worker.worker_id,
            shift_id: shift.shift_id,
            reasons,
        })
    }
}
