// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker-to-shift assignments and their lifecycle.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Status of an assignment.
///
/// `NoShow` and `Cancelled` free the shift's slot; every other status
/// occupies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Assigned by an admin.
    Assigned,
    /// The worker acknowledged the shift.
    Confirmed,
    /// The shift was worked; hours are recorded.
    Completed,
    /// The worker did not show up.
    NoShow,
    /// The assignment was withdrawn.
    Cancelled,
}

impl AssignmentStatus {
    /// Every status.
    pub const ALL: [Self; 5] = [
        Self::Assigned,
        Self::Confirmed,
        Self::Completed,
        Self::NoShow,
        Self::Cancelled,
    ];

    /// Statuses that occupy a shift slot, as stored strings.
    pub const ACTIVE_STRS: [&'static str; 3] = ["assigned", "confirmed", "completed"];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "no_show" => Ok(Self::NoShow),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidAssignmentStatus(s.to_string())),
        }
    }

    /// Returns true if the assignment occupies its shift's slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::NoShow | Self::Cancelled)
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::NoShow | Self::Cancelled)
    }

    /// Returns true if the transition is permitted.
    ///
    /// `completed -> completed` is allowed so hours can be corrected.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Assigned,
                Self::Confirmed | Self::Completed | Self::NoShow | Self::Cancelled
            ) | (
                Self::Confirmed,
                Self::Completed | Self::NoShow | Self::Cancelled
            ) | (Self::Completed, Self::Completed)
        )
    }

    /// Validates a transition to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAssignmentTransition` if not permitted.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidAssignmentTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted assignment of a worker to a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub worker_id: i64,
    /// The acting admin who made the assignment.
    pub assigned_by: String,
    pub assigned_at: OffsetDateTime,
    pub status: AssignmentStatus,
    pub hours_worked: Option<f64>,
    pub hourly_rate: Option<f64>,
    /// Cancellation reason, no-show notes, and similar.
    pub notes: Option<String>,
    pub updated_at: OffsetDateTime,
}

impl Assignment {
    /// Returns true if the assignment occupies its shift's slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// An assignment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub shift_id: i64,
    pub worker_id: i64,
    pub assigned_by: String,
    pub assigned_at: OffsetDateTime,
    pub status: AssignmentStatus,
    pub hourly_rate: Option<f64>,
}
