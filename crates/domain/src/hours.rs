// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::shift::Shift;
use serde::{Deserialize, Serialize};

/// Bounds applied when recording hours worked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoursPolicy {
    /// Hard cap; anything above is rejected.
    pub max_hours_per_shift: f64,
}

impl HoursPolicy {
    pub const DEFAULT_MAX_HOURS_PER_SHIFT: f64 = 24.0;
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            max_hours_per_shift: Self::DEFAULT_MAX_HOURS_PER_SHIFT,
        }
    }
}

/// Outcome of a successful hours check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HoursCheck {
    WithinSchedule,
    /// Accepted, but more than the shift's scheduled length.
    ExceedsSchedule { scheduled_hours: f64 },
}

/// Validates hours worked on a shift.
///
/// # Errors
///
/// Returns `DomainError::InvalidHoursWorked` if `hours` is not finite, is
/// negative, or exceeds the policy cap.
pub fn validate_hours_worked(
    hours: f64,
    shift: &Shift,
    policy: &HoursPolicy,
) -> Result<HoursCheck, DomainError> {
    if !hours.is_finite() {
        return Err(DomainError::InvalidHoursWorked {
            reason: String::from("hours worked must be a finite number"),
        });
    }

    if hours < 0.0 {
        return Err(DomainError::InvalidHoursWorked {
            reason: format!("hours worked must not be negative (got {hours})"),
        });
    }

    if hours > policy.max_hours_per_shift {
        return Err(DomainError::InvalidHoursWorked {
            reason: format!(
                "hours worked {hours} exceeds the maximum of {} per shift",
                policy.max_hours_per_shift
            ),
        });
    }

    let scheduled_hours = (shift.end_time - shift.start_time).as_seconds_f64() / 3600.0;
    if hours > scheduled_hours {
        Ok(HoursCheck::ExceedsSchedule { scheduled_hours })
    } else {
        Ok(HoursCheck::WithinSchedule)
    }
}
