// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplyContext, EventGraph, StaffingPolicy, WorkerProfile};
use crewcall_audit::{Actor, Cause};
use crewcall_domain::{
    Assignment, AssignmentStatus, Capacity, Event, EventSchedule, EventSkillRequirement,
    EventStatus, Shift, ShiftStatus, SkillName, Worker,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;
use time::macros::datetime;

pub const EVENT_ID: i64 = 1;

pub fn create_test_actor() -> Actor {
    Actor::admin("admin-123")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub const fn now() -> OffsetDateTime {
    datetime!(2026-05-31 12:00 UTC)
}

pub fn skill(name: &str) -> SkillName {
    SkillName::parse(name).unwrap()
}

pub fn create_test_shift(id: i64, role: &str) -> Shift {
    Shift {
        shift_id: id,
        event_id: EVENT_ID,
        role_needed: Some(skill(role)),
        capacity: Some(Capacity::SINGLE),
        start_time: datetime!(2026-06-01 18:00 UTC),
        end_time: datetime!(2026-06-01 23:00 UTC),
        status: ShiftStatus::Published,
        required_certification: None,
    }
}

/// A published event needing two bartenders at 25.0, with two open shifts.
pub fn create_test_graph() -> EventGraph {
    let mut event = Event::new(String::from("Gala Dinner"), 1);
    event.event_id = Some(EVENT_ID);
    event.status = EventStatus::Published;

    let mut requirement = EventSkillRequirement::new(skill("Bartender"), 2);
    requirement.pay_rate = Some(25.0);

    EventGraph {
        event,
        schedule: Some(
            EventSchedule::new(
                datetime!(2026-06-01 18:00 UTC),
                datetime!(2026-06-01 23:00 UTC),
                30,
            )
            .unwrap(),
        ),
        requirements: vec![requirement],
        shifts: vec![
            create_test_shift(10, "Bartender"),
            create_test_shift(11, "Bartender"),
        ],
        assignments: Vec::new(),
    }
}

pub fn create_test_assignment(
    id: i64,
    shift_id: i64,
    worker_id: i64,
    status: AssignmentStatus,
) -> Assignment {
    Assignment {
        assignment_id: id,
        shift_id,
        worker_id,
        assigned_by: String::from("admin-123"),
        assigned_at: now(),
        status,
        hours_worked: None,
        hourly_rate: Some(25.0),
        notes: None,
        updated_at: now(),
    }
}

pub fn create_test_profile(worker_id: i64, skills: &[&str]) -> WorkerProfile {
    let skills: BTreeSet<SkillName> = skills.iter().map(|s| skill(s)).collect();
    let mut worker = Worker::new(format!("Worker {worker_id}"), skills);
    worker.worker_id = Some(worker_id);
    WorkerProfile {
        worker,
        bookings: Vec::new(),
    }
}

pub const fn context<'a>(
    worker: Option<&'a WorkerProfile>,
    policy: &'a StaffingPolicy,
) -> ApplyContext<'a> {
    ApplyContext {
        worker,
        policy,
        now: now(),
    }
}
