// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::shift_status::ShiftStatus;
use crate::types::{Capacity, SkillName};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A persisted, time-bounded slot for one role at an event.
///
/// `role_needed` and `capacity` are optional because stored rows may be
/// damaged. Such rows are integrity anomalies: they never match a worker,
/// count as zero capacity, and are fixed by shift repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub shift_id: i64,
    pub event_id: i64,
    pub role_needed: Option<SkillName>,
    pub capacity: Option<Capacity>,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: ShiftStatus,
    pub required_certification: Option<i64>,
}

impl Shift {
    /// Returns true if the row carries both a role and a capacity.
    #[must_use]
    pub const fn is_intact(&self) -> bool {
        self.role_needed.is_some() && self.capacity.is_some()
    }

    /// Capacity in slots; zero for a damaged row.
    #[must_use]
    pub fn required_slots(&self) -> u32 {
        self.capacity.map_or(0, Capacity::value)
    }

    /// Half-open interval overlap: a shift ending at 18:00 does not overlap
    /// one starting at 18:00.
    #[must_use]
    pub fn overlaps(&self, start: OffsetDateTime, end: OffsetDateTime) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// A shift that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShift {
    pub event_id: i64,
    pub role_needed: SkillName,
    pub capacity: Capacity,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub status: ShiftStatus,
    pub required_certification: Option<i64>,
}

/// A stored shift missing its role, its capacity, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAnomaly {
    pub shift_id: i64,
    pub missing_role: bool,
    pub missing_capacity: bool,
}

/// Finds the damaged rows among an event's shifts.
#[must_use]
pub fn detect_shift_anomalies(shifts: &[Shift]) -> Vec<ShiftAnomaly> {
    shifts
        .iter()
        .filter(|s| !s.is_intact())
        .map(|s| ShiftAnomaly {
            shift_id: s.shift_id,
            missing_role: s.role_needed.is_none(),
            missing_capacity: s.capacity.is_none(),
        })
        .collect()
}
