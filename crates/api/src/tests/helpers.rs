// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crewcall::StaffingPolicy;
use crewcall_audit::Cause;
use crewcall_persistence::Persistence;

use crate::{
    ActingAdmin, CreateCertificationRequest, CreateEventRequest, CreateSkillRequest,
    CreateVenueRequest, CreateWorkerRequest, HeldCertification, RequirementInput, ScheduleInput,
    create_certification, create_event, create_skill, create_venue, create_worker,
    generate_shifts,
};

pub const SHIFT_START: &str = "2026-06-01T18:00:00Z";
pub const SHIFT_END: &str = "2026-06-01T23:00:00Z";

pub fn create_test_admin() -> ActingAdmin {
    ActingAdmin::new(String::from("admin-1"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-1"), String::from("API request"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_skills(persistence: &mut Persistence, names: &[&str]) {
    for name in names {
        create_skill(
            persistence,
            &CreateSkillRequest {
                name: (*name).to_string(),
            },
            &create_test_admin(),
            create_test_cause(),
        )
        .unwrap();
    }
}

pub fn create_test_certification(persistence: &mut Persistence, name: &str) -> i64 {
    create_certification(
        persistence,
        &CreateCertificationRequest {
            name: name.to_string(),
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .id
}

pub fn venue_request() -> CreateVenueRequest {
    CreateVenueRequest {
        name: String::from("Harbor Hall"),
        address: String::from("1 Pier Road"),
        latitude: 40.7,
        longitude: -74.0,
        arrival_instructions: None,
        parking_instructions: Some(String::from("Lot B")),
        timezone: String::from("America/New_York"),
    }
}

pub fn create_test_venue(persistence: &mut Persistence) -> i64 {
    create_venue(
        persistence,
        &venue_request(),
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .id
}

pub fn worker_request(name: &str, skills: &[&str]) -> CreateWorkerRequest {
    CreateWorkerRequest {
        name: name.to_string(),
        email: None,
        phone: None,
        skills: skills.iter().map(|s| (*s).to_string()).collect(),
        certifications: Vec::new(),
    }
}

pub fn create_test_worker(persistence: &mut Persistence, name: &str, skills: &[&str]) -> i64 {
    create_worker(
        persistence,
        &worker_request(name, skills),
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .id
}

pub fn create_certified_worker(
    persistence: &mut Persistence,
    name: &str,
    skills: &[&str],
    certification_id: i64,
    expires_at: &str,
) -> i64 {
    let mut request = worker_request(name, skills);
    request.certifications.push(HeldCertification {
        certification_id,
        expires_at: expires_at.to_string(),
    });
    create_worker(
        persistence,
        &request,
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .id
}

pub fn utc_schedule() -> ScheduleInput {
    ScheduleInput::Utc {
        start_time: String::from(SHIFT_START),
        end_time: String::from(SHIFT_END),
        break_minutes: 30,
    }
}

pub fn requirement(skill_name: &str, needed_workers: u32, pay_rate: Option<f64>) -> RequirementInput {
    RequirementInput {
        skill_name: skill_name.to_string(),
        needed_workers,
        uniform_name: None,
        certification_id: None,
        pay_rate,
    }
}

pub fn event_request(venue_id: i64, requirements: Vec<RequirementInput>) -> CreateEventRequest {
    CreateEventRequest {
        title: String::from("Spring Gala"),
        venue_id,
        check_in_instructions: None,
        supervisor_name: Some(String::from("Dana")),
        supervisor_phone: None,
        schedule: Some(utc_schedule()),
        requirements,
    }
}

/// A draft event needing two bartenders at 25.00, with its shifts generated.
pub struct StaffedEvent {
    pub event_id: i64,
    pub shift_ids: Vec<i64>,
}

pub fn create_bartender_event(persistence: &mut Persistence) -> StaffedEvent {
    let venue_id: i64 = create_test_venue(persistence);
    let event_id: i64 = create_event(
        persistence,
        &event_request(venue_id, vec![requirement("Bartender", 2, Some(25.0))]),
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .event_id;

    generate_shifts(
        persistence,
        event_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    let shift_ids: Vec<i64> = persistence
        .load_event_graph(event_id)
        .unwrap()
        .shifts
        .iter()
        .map(|s| s.shift_id)
        .collect();

    StaffedEvent {
        event_id,
        shift_ids,
    }
}

/// Skills, a venue and a bartender event with generated shifts.
pub fn setup_bartender_event(persistence: &mut Persistence) -> StaffedEvent {
    create_test_skills(persistence, &["Bartender", "Server"]);
    create_bartender_event(persistence)
}
