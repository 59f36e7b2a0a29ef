// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift status workflow.
//!
//! | from      | allowed to                                |
//! |-----------|-------------------------------------------|
//! | draft     | published, archived, cancelled            |
//! | published | assigned, completed, archived, cancelled  |
//! | assigned  | completed, archived, cancelled            |
//! | completed | archived                                  |
//! | archived  | (terminal)                                |
//! | cancelled | (terminal)                                |
//!
//! `published -> assigned` is additionally guarded: the shift must be fully
//! staffed. The table is checked first, so an unlisted pair always reports
//! an invalid transition rather than a failed guard.

use crate::error::DomainError;
use crate::staffing::ShiftStaffingProgress;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a single shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Draft,
    Published,
    Assigned,
    Completed,
    Archived,
    Cancelled,
}

impl ShiftStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::Published,
        Self::Assigned,
        Self::Completed,
        Self::Archived,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status. `filled` is accepted as a legacy alias for `assigned`.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "assigned" | "filled" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidShiftStatus(s.to_string())),
        }
    }

    /// Returns true if a shift in this status may take a new assignment.
    #[must_use]
    pub const fn accepts_assignments(&self) -> bool {
        matches!(self, Self::Draft | Self::Published | Self::Assigned)
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived | Self::Cancelled)
    }

    /// Returns true if the pair is in the transition table.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Draft,
                Self::Published | Self::Archived | Self::Cancelled
            ) | (
                Self::Published,
                Self::Assigned | Self::Completed | Self::Archived | Self::Cancelled
            ) | (
                Self::Assigned,
                Self::Completed | Self::Archived | Self::Cancelled
            ) | (Self::Completed, Self::Archived)
        )
    }

    /// Validates a transition against the table and the staffing guard.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidShiftTransition` if the pair is not in the table.
    /// - `DomainError::ShiftNotFullyStaffed` if moving `published -> assigned`
    ///   while the shift's staffing percentage is below 100.
    pub const fn validate_transition(
        &self,
        target: Self,
        progress: &ShiftStaffingProgress,
    ) -> Result<(), DomainError> {
        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidShiftTransition {
                from: *self,
                to: target,
            });
        }

        if matches!((self, target), (Self::Published, Self::Assigned)) && progress.percentage < 100
        {
            return Err(DomainError::ShiftNotFullyStaffed {
                shift_id: progress.shift_id,
                percentage: progress.percentage,
            });
        }

        Ok(())
    }
}

impl FromStr for ShiftStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
