// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall::StaffingPolicy;
use crewcall_domain::{EventStatus, ShiftStatus};
use crewcall_persistence::Persistence;
use time::macros::datetime;

use crate::{
    ApiError, ReplaceRequirementsRequest, ScheduleInput, SetScheduleRequest,
    TransitionStatusRequest, create_event, generate_shifts, repair_shifts, replace_requirements,
    set_schedule, transition_event_status,
};

use super::helpers::{
    create_bartender_event, create_test_admin, create_test_cause, create_test_certification,
    create_test_persistence, create_test_skills, create_test_venue, event_request, requirement,
    setup_bartender_event,
};

fn local_schedule(date: &str, start: &str, end: &str) -> ScheduleInput {
    ScheduleInput::Local {
        date: date.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        break_minutes: 0,
    }
}

#[test]
fn test_create_event_is_draft_and_totals_requirements() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender", "Server"]);
    let venue_id: i64 = create_test_venue(&mut persistence);

    let response = create_event(
        &mut persistence,
        &event_request(
            venue_id,
            vec![
                requirement("Bartender", 2, Some(25.0)),
                requirement("Server", 3, None),
            ],
        ),
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.total_workers_needed, 5);
    let event = persistence.get_event(response.event_id).unwrap();
    assert_eq!(event.status, EventStatus::Draft);
    assert_eq!(event.supervisor_name.as_deref(), Some("Dana"));
}

#[test]
fn test_create_event_for_missing_venue_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);

    let result = create_event(
        &mut persistence,
        &event_request(404, vec![requirement("Bartender", 1, None)]),
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Venue"
    ));
}

#[test]
fn test_create_event_rejects_zero_workers() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);
    let venue_id: i64 = create_test_venue(&mut persistence);

    let result = create_event(
        &mut persistence,
        &event_request(venue_id, vec![requirement("Bartender", 0, None)]),
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "requirements"
    ));
    assert!(persistence.list_event_ids().unwrap().is_empty());
}

#[test]
fn test_create_event_rejects_unknown_certification() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);
    let venue_id: i64 = create_test_venue(&mut persistence);
    let mut bartender = requirement("Bartender", 1, None);
    bartender.certification_id = Some(7);

    let result = create_event(
        &mut persistence,
        &event_request(venue_id, vec![bartender]),
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Certification"
    ));
}

#[test]
fn test_local_schedule_resolves_in_venue_timezone() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);
    let venue_id: i64 = create_test_venue(&mut persistence);
    let mut request = event_request(venue_id, vec![requirement("Bartender", 1, None)]);
    request.schedule = Some(local_schedule("2026-07-04", "18:00", "23:30"));

    let event_id: i64 = create_event(
        &mut persistence,
        &request,
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .event_id;

    let graph = persistence.load_event_graph(event_id).unwrap();
    let schedule = graph.schedule.unwrap();
    assert_eq!(schedule.start_time(), datetime!(2026-07-04 22:00 UTC));
    assert_eq!(schedule.end_time(), datetime!(2026-07-05 03:30 UTC));
}

#[test]
fn test_local_schedule_rejects_malformed_time() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);
    let venue_id: i64 = create_test_venue(&mut persistence);
    let mut request = event_request(venue_id, vec![requirement("Bartender", 1, None)]);
    request.schedule = Some(local_schedule("2026-07-04", "6pm", "23:30"));

    let result = create_event(
        &mut persistence,
        &request,
        &create_test_admin(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "start"
    ));
}

#[test]
fn test_set_schedule_replaces_window() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    let info = set_schedule(
        &mut persistence,
        staffed.event_id,
        &SetScheduleRequest {
            schedule: ScheduleInput::Utc {
                start_time: String::from("2026-06-02T16:00:00+02:00"),
                end_time: String::from("2026-06-02T20:00:00+02:00"),
                break_minutes: 15,
            },
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(info.start_time, "2026-06-02T14:00:00Z");
    assert_eq!(info.break_minutes, 15);
}

#[test]
fn test_generate_without_schedule_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);
    let venue_id: i64 = create_test_venue(&mut persistence);
    let mut request = event_request(venue_id, vec![requirement("Bartender", 1, None)]);
    request.schedule = None;
    let event_id: i64 = create_event(
        &mut persistence,
        &request,
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .event_id;

    let result = generate_shifts(
        &mut persistence,
        event_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "event"
    ));
    assert_eq!(persistence.count_shifts(event_id).unwrap(), 0);
}

#[test]
fn test_generate_for_missing_event_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let result = generate_shifts(
        &mut persistence,
        12,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Event"
    ));
}

#[test]
fn test_draft_event_generates_draft_shifts_and_publish_promotes_them() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    let graph = persistence.load_event_graph(staffed.event_id).unwrap();
    assert_eq!(graph.shifts.len(), 2);
    assert!(graph.shifts.iter().all(|s| s.status == ShiftStatus::Draft));

    let response = transition_event_status(
        &mut persistence,
        staffed.event_id,
        &TransitionStatusRequest {
            status: String::from("published"),
        },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert_eq!(response.from, "draft");
    assert_eq!(response.to, "published");
    let graph = persistence.load_event_graph(staffed.event_id).unwrap();
    assert_eq!(graph.event.status, EventStatus::Published);
    assert!(
        graph
            .shifts
            .iter()
            .all(|s| s.status == ShiftStatus::Published)
    );
}

#[test]
fn test_event_cannot_return_to_draft() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let publish = TransitionStatusRequest {
        status: String::from("published"),
    };
    transition_event_status(
        &mut persistence,
        staffed.event_id,
        &publish,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    let result = transition_event_status(
        &mut persistence,
        staffed.event_id,
        &TransitionStatusRequest {
            status: String::from("draft"),
        },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidTransition { ref entity, .. }) if entity == "event"
    ));
}

#[test]
fn test_regeneration_follows_replaced_requirements() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    replace_requirements(
        &mut persistence,
        staffed.event_id,
        &ReplaceRequirementsRequest {
            requirements: vec![
                requirement("Bartender", 1, Some(25.0)),
                requirement("Server", 2, Some(18.0)),
            ],
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(persistence.count_shifts(staffed.event_id).unwrap(), 2);

    let response = generate_shifts(
        &mut persistence,
        staffed.event_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert_eq!(response.deleted_shift_ids, staffed.shift_ids);
    assert_eq!(response.created, 3);
    assert_eq!(persistence.count_shifts(staffed.event_id).unwrap(), 3);
}

#[test]
fn test_repair_on_intact_event_changes_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    let response = repair_shifts(
        &mut persistence,
        staffed.event_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert!(response.anomalies.is_empty());
    assert!(response.deleted_shift_ids.is_empty());
    assert_eq!(response.created, 0);
    assert_eq!(persistence.count_shifts(staffed.event_id).unwrap(), 2);
}

#[test]
fn test_certification_requirement_reaches_generated_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_skills(&mut persistence, &["Bartender"]);
    let cert_id: i64 = create_test_certification(&mut persistence, "Alcohol Service");
    let mut bartender = requirement("Bartender", 1, None);
    bartender.certification_id = Some(cert_id);
    let venue_id: i64 = create_test_venue(&mut persistence);
    let event_id: i64 = create_event(
        &mut persistence,
        &event_request(venue_id, vec![bartender]),
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .event_id;

    generate_shifts(
        &mut persistence,
        event_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    let graph = persistence.load_event_graph(event_id).unwrap();
    assert_eq!(graph.shifts[0].required_certification, Some(cert_id));
}

#[test]
fn test_second_event_keeps_its_own_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    let first = setup_bartender_event(&mut persistence);
    let second = create_bartender_event(&mut persistence);

    assert_ne!(first.event_id, second.event_id);
    assert_eq!(persistence.count_shifts(first.event_id).unwrap(), 2);
    assert_eq!(persistence.count_shifts(second.event_id).unwrap(), 2);
}
