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
    clippy::all
)]

#[cfg(test)]
mod tests;

/// Actor type recorded for admin-initiated writes.
pub const ADMIN_ACTOR_TYPE: &str = "admin";

/// Actor type recorded for writes the system performs on its own.
pub const SYSTEM_ACTOR_TYPE: &str = "system";

/// Who performed a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Identifier of the admin or process.
    pub id: String,
    /// `admin` or `system`.
    pub actor_type: String,
}

impl Actor {
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// An admin actor. This is the acting admin threaded through every write.
    #[must_use]
    pub fn admin(id: &str) -> Self {
        Self::new(id.to_string(), String::from(ADMIN_ACTOR_TYPE))
    }

    /// A system actor, used by seeding and maintenance tooling.
    #[must_use]
    pub fn system(id: &str) -> Self {
        Self::new(id.to_string(), String::from(SYSTEM_ACTOR_TYPE))
    }
}

/// Why a write happened: a request id and a human description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    pub id: String,
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What was done, e.g. `Assign` or `RegenerateShifts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    /// Free-form detail such as counts or the reason given.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact `key=value` rendering of the state a write touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable record of one successful write.
///
/// Every write produces exactly one audit event, persisted in the same
/// transaction as the write itself. The event is scoped to the catering
/// event it touched and, where relevant, to a single shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Row identifier; `None` until persisted.
    pub audit_event_id: Option<i64>,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    /// The catering event the write belongs to.
    pub event_id: Option<i64>,
    /// The shift the write touched, for shift- and assignment-level writes.
    pub shift_id: Option<i64>,
}

impl AuditEvent {
    /// Creates an unpersisted audit event scoped to a catering event.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        event_id: Option<i64>,
    ) -> Self {
        Self {
            audit_event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            event_id,
            shift_id: None,
        }
    }

    /// Narrows the scope to a single shift.
    #[must_use]
    pub const fn with_shift(mut self, shift_id: i64) -> Self {
        self.shift_id = Some(shift_id);
        self
    }
}
