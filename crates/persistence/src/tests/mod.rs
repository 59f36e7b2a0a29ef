// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]


use std::collections::BTreeSet;

use crewcall::{
    ApplyContext, Command, EventGraph, StaffingPolicy, TransitionResult, WorkerProfile, apply,
};
use crewcall_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use crewcall_domain::{
    Event, EventSchedule, EventSkillRequirement, EventStatus, SkillName, Venue, Worker,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

pub const SHIFT_START: OffsetDateTime = datetime!(2026-06-01 18:00 UTC);
pub const SHIFT_END: OffsetDateTime = datetime!(2026-06-01 23:00 UTC);

pub const fn now() -> OffsetDateTime {
    datetime!(2026-05-31 12:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::admin("admin-1")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_audit(name: &str) -> AuditEvent {
    AuditEvent::new(
        create_test_actor(),
        create_test_cause(),
        Action::new(String::from(name), None),
        StateSnapshot::new(String::from("none")),
        StateSnapshot::new(String::from("created")),
        None,
    )
}

pub fn skill(name: &str) -> SkillName {
    SkillName::parse(name).unwrap()
}

pub fn create_test_skills(persistence: &mut Persistence, names: &[&str]) {
    for name in names {
        persistence
            .create_skill(&skill(name), &create_test_audit("CreateSkill"))
            .unwrap();
    }
}

pub fn create_test_venue(persistence: &mut Persistence) -> i64 {
    let venue = Venue {
        venue_id: None,
        name: String::from("Harbor Hall"),
        address: String::from("1 Pier Road"),
        latitude: 40.7,
        longitude: -74.0,
        arrival_instructions: Some(String::from("Use the loading dock")),
        parking_instructions: None,
        timezone: String::from("America/New_York"),
    };
    persistence
        .create_venue(&venue, &create_test_audit("CreateVenue"))
        .unwrap()
}

pub fn create_test_worker(persistence: &mut Persistence, name: &str, skills: &[&str]) -> i64 {
    let skills: BTreeSet<SkillName> = skills.iter().map(|s| skill(s)).collect();
    let worker = Worker::new(String::from(name), skills);
    persistence
        .create_worker(&worker, &create_test_audit("CreateWorker"))
        .unwrap()
}

/// A published event at a fresh venue needing `Bartender x 2` at 25.0,
/// scheduled 18:00-23:00 UTC. No shifts yet.
pub fn create_test_event(persistence: &mut Persistence) -> i64 {
    create_test_skills(persistence, &["Bartender", "Server"]);
    let venue_id = create_test_venue(persistence);

    let mut event = Event::new(String::from("Gala Dinner"), venue_id);
    event.status = EventStatus::Published;
    let schedule = EventSchedule::new(SHIFT_START, SHIFT_END, 30).unwrap();
    let mut requirement = EventSkillRequirement::new(skill("Bartender"), 2);
    requirement.pay_rate = Some(25.0);

    persistence
        .create_event(
            &event,
            Some(&schedule),
            &[requirement],
            &create_test_audit("CreateEvent"),
        )
        .unwrap()
}

/// Loads the graph and the named worker, then applies the command.
pub fn apply_command(
    persistence: &mut Persistence,
    event_id: i64,
    command: Command,
    worker_id: Option<i64>,
) -> TransitionResult {
    let graph: EventGraph = persistence.load_event_graph(event_id).unwrap();
    let profile: Option<WorkerProfile> =
        worker_id.map(|id| persistence.load_worker_profile(id).unwrap());
    let policy = StaffingPolicy::default();
    let ctx = ApplyContext {
        worker: profile.as_ref(),
        policy: &policy,
        now: now(),
    };
    apply(&graph, command, create_test_actor(), create_test_cause(), &ctx).unwrap()
}

/// Generates shifts for the event and returns their ids.
pub fn generate_test_shifts(persistence: &mut Persistence, event_id: i64) -> Vec<i64> {
    let result = apply_command(persistence, event_id, Command::GenerateShifts, None);
    persistence.persist_transition(&result).unwrap();
    persistence
        .load_event_graph(event_id)
        .unwrap()
        .shifts
        .iter()
        .map(|s| s.shift_id)
        .collect()
}

/// Assigns a worker and returns the new assignment id.
pub fn assign_test_worker(
    persistence: &mut Persistence,
    event_id: i64,
    worker_id: i64,
    shift_id: i64,
) -> i64 {
    let result = apply_command(
        persistence,
        event_id,
        Command::Assign {
            worker_id,
            shift_id,
            hourly_rate: None,
        },
        Some(worker_id),
    );
    persistence
        .persist_transition(&result)
        .unwrap()
        .assignment_id
        .unwrap()
}
