// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catering events, their schedule, and their skill requirements.
//!
//! An event owns exactly one schedule and any number of skill requirements.
//! The requirements are the source of truth for how many workers an event
//! needs; the shift count is derived from them, never the other way round.

use crate::error::DomainError;
use crate::types::SkillName;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Lifecycle status of a catering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Being planned; shifts are generated as drafts.
    Draft,
    /// Visible to staff; generated shifts are published.
    Published,
    /// The event has happened.
    Completed,
    /// Soft-deleted. The row and its history are kept.
    Deleted,
}

impl EventStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(DomainError::InvalidEventStatus(s.to_string())),
        }
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Deleted)
    }

    /// Returns true if shifts may be generated, repaired, or staffed for the event.
    #[must_use]
    pub const fn allows_shift_generation(&self) -> bool {
        matches!(self, Self::Draft | Self::Published)
    }

    /// Returns true if the transition is in the event lifecycle table.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published | Self::Deleted)
                | (Self::Published, Self::Completed | Self::Deleted)
        )
    }

    /// Validates a transition to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEventTransition` if the pair is not permitted.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidEventTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catering event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The canonical identifier; `None` until persisted.
    pub event_id: Option<i64>,
    /// Event title shown to staff.
    pub title: String,
    /// Lifecycle status.
    pub status: EventStatus,
    /// The venue hosting the event.
    pub venue_id: i64,
    /// Where and how staff check in on arrival.
    pub check_in_instructions: Option<String>,
    /// On-site supervisor.
    pub supervisor_name: Option<String>,
    /// On-site supervisor phone.
    pub supervisor_phone: Option<String>,
}

impl Event {
    /// Creates a new draft event.
    #[must_use]
    pub const fn new(title: String, venue_id: i64) -> Self {
        Self {
            event_id: None,
            title,
            status: EventStatus::Draft,
            venue_id,
            check_in_instructions: None,
            supervisor_name: None,
            supervisor_phone: None,
        }
    }
}

/// The time window of an event, in UTC.
///
/// Break minutes are informational. Shifts span the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    start_time: OffsetDateTime,
    end_time: OffsetDateTime,
    break_minutes: u32,
}

impl EventSchedule {
    /// Creates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSchedule` if the end is not after the
    /// start, or the break is at least as long as the event.
    pub fn new(
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        break_minutes: u32,
    ) -> Result<Self, DomainError> {
        if end_time <= start_time {
            return Err(DomainError::InvalidSchedule {
                reason: format!("end time {end_time} must be after start time {start_time}"),
            });
        }

        if Duration::minutes(i64::from(break_minutes)) >= end_time - start_time {
            return Err(DomainError::InvalidSchedule {
                reason: format!(
                    "break of {break_minutes} minutes does not fit in the scheduled window"
                ),
            });
        }

        Ok(Self {
            start_time,
            end_time,
            break_minutes,
        })
    }

    /// Event start, UTC.
    #[must_use]
    pub const fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }

    /// Event end, UTC.
    #[must_use]
    pub const fn end_time(&self) -> OffsetDateTime {
        self.end_time
    }

    /// Break length in minutes.
    #[must_use]
    pub const fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Length of the scheduled window, breaks included.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// How many workers of one skill an event needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSkillRequirement {
    /// The canonical identifier; `None` until persisted.
    pub requirement_id: Option<i64>,
    /// The role to staff.
    pub skill_name: SkillName,
    /// Number of workers needed. Stored rows may carry zero or negative
    /// counts; those contribute nothing.
    pub needed_workers: i32,
    /// Uniform the role wears.
    pub uniform_name: Option<String>,
    /// Certification every shift for the role requires.
    pub required_certification: Option<i64>,
    /// Hourly pay rate for the role.
    pub pay_rate: Option<f64>,
}

impl EventSkillRequirement {
    /// Creates a requirement without uniform, certification or pay rate.
    #[must_use]
    pub const fn new(skill_name: SkillName, needed_workers: i32) -> Self {
        Self {
            requirement_id: None,
            skill_name,
            needed_workers,
            uniform_name: None,
            required_certification: None,
            pay_rate: None,
        }
    }

    /// The number of workers this requirement contributes, clamped at zero.
    #[must_use]
    pub fn effective_count(&self) -> u32 {
        u32::try_from(self.needed_workers).unwrap_or(0)
    }
}

/// Total workers needed across an event's requirements.
#[must_use]
pub fn total_workers_needed(requirements: &[EventSkillRequirement]) -> u32 {
    requirements
        .iter()
        .map(EventSkillRequirement::effective_count)
        .sum()
}
