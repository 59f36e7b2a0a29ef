// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall::StaffingPolicy;
use crewcall_persistence::Persistence;

use crate::{
    ApiError, AssignWorkerRequest, AuditEventInfo, EligibilityResponse, TransitionStatusRequest,
    assign_worker, get_event_staffing, get_role_staffing, list_audit_events, preview_eligibility,
    transition_event_status, transition_shift_status,
};

use super::helpers::{
    create_certified_worker, create_test_admin, create_test_cause, create_test_certification,
    create_test_persistence, create_test_worker, setup_bartender_event,
};

fn to_status(status: &str) -> TransitionStatusRequest {
    TransitionStatusRequest {
        status: status.to_string(),
    }
}

fn publish(persistence: &mut Persistence, event_id: i64) {
    transition_event_status(
        persistence,
        event_id,
        &to_status("published"),
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();
}

fn assign(persistence: &mut Persistence, shift_id: i64, worker_id: i64) {
    assign_worker(
        persistence,
        &AssignWorkerRequest {
            shift_id,
            worker_id,
            hourly_rate: None,
        },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();
}

#[test]
fn test_unstaffed_shift_cannot_move_to_assigned() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    publish(&mut persistence, staffed.event_id);

    let result = transition_shift_status(
        &mut persistence,
        staffed.shift_ids[0],
        &to_status("assigned"),
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(result, Err(ApiError::PreconditionFailed { .. })));
}

#[test]
fn test_staffed_shift_moves_to_assigned() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    publish(&mut persistence, staffed.event_id);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    assign(&mut persistence, staffed.shift_ids[0], ada);

    let response = transition_shift_status(
        &mut persistence,
        staffed.shift_ids[0],
        &to_status("filled"),
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert_eq!(response.from, "published");
    assert_eq!(response.to, "assigned");
}

#[test]
fn test_draft_shift_cannot_skip_publication() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    let result = transition_shift_status(
        &mut persistence,
        staffed.shift_ids[0],
        &to_status("completed"),
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidTransition { ref entity, ref from, .. })
            if entity == "shift" && from == "draft"
    ));
}

#[test]
fn test_unknown_shift_status_is_invalid_input() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    let result = transition_shift_status(
        &mut persistence,
        staffed.shift_ids[0],
        &to_status("on-fire"),
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_event_staffing_lists_every_shift() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    assign(&mut persistence, staffed.shift_ids[1], ada);

    let response = get_event_staffing(&mut persistence, staffed.event_id).unwrap();

    assert_eq!(response.status, "draft");
    assert_eq!(response.shifts.len(), 2);
    assert_eq!(response.shifts[0].progress.percentage, 0);
    assert_eq!(response.shifts[1].progress.percentage, 100);
    assert_eq!(response.shifts[1].role_needed.as_deref(), Some("Bartender"));
    assert_eq!(response.shifts[1].capacity, Some(1));
    let schedule = response.schedule.unwrap();
    assert_eq!(schedule.start_time, "2026-06-01T18:00:00Z");
    assert_eq!(schedule.break_minutes, 30);
    assert_eq!(response.progress.by_role["Bartender"].filled_shifts, 1);
}

#[test]
fn test_role_staffing_for_one_role() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    assign(&mut persistence, staffed.shift_ids[0], ada);

    let bartenders = get_role_staffing(&mut persistence, staffed.event_id, "Bartender").unwrap();
    let servers = get_role_staffing(&mut persistence, staffed.event_id, "Server").unwrap();

    assert_eq!(
        (
            bartenders.assigned_workers,
            bartenders.needed_workers,
            bartenders.percentage
        ),
        (1, 2, 50)
    );
    assert_eq!(servers.total_shifts, 0);
    assert_eq!(servers.percentage, 0);
}

#[test]
fn test_preview_eligibility_reports_without_writing() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let sam: i64 = create_test_worker(&mut persistence, "Sam", &["Server"]);

    let eligible: EligibilityResponse = preview_eligibility(
        &mut persistence,
        staffed.shift_ids[0],
        ada,
        &StaffingPolicy::default(),
    )
    .unwrap();
    let ineligible: EligibilityResponse = preview_eligibility(
        &mut persistence,
        staffed.shift_ids[0],
        sam,
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert!(eligible.eligible);
    assert!(eligible.reasons.is_empty());
    assert!(!ineligible.eligible);
    assert_eq!(ineligible.reasons, vec!["missing-skill"]);
    assert_eq!(
        persistence
            .count_active_assignments(staffed.shift_ids[0])
            .unwrap(),
        0
    );
}

#[test]
fn test_preview_flags_expired_certification() {
    let mut persistence: Persistence = create_test_persistence();
    let cert_id: i64 = create_test_certification(&mut persistence, "Alcohol Service");
    let staffed = setup_bartender_event(&mut persistence);
    let lapsed: i64 = create_certified_worker(
        &mut persistence,
        "Ada",
        &["Bartender"],
        cert_id,
        "2026-06-01T20:00:00Z",
    );

    // Certification requirements are copied onto shifts at generation time.
    let mut bartender = super::helpers::requirement("Bartender", 1, None);
    bartender.certification_id = Some(cert_id);
    crate::replace_requirements(
        &mut persistence,
        staffed.event_id,
        &crate::ReplaceRequirementsRequest {
            requirements: vec![bartender],
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();
    crate::generate_shifts(
        &mut persistence,
        staffed.event_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();
    let shift_id: i64 = persistence
        .load_event_graph(staffed.event_id)
        .unwrap()
        .shifts[0]
        .shift_id;

    let response = preview_eligibility(
        &mut persistence,
        shift_id,
        lapsed,
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert_eq!(response.reasons, vec!["missing-or-expired-certification"]);
}

#[test]
fn test_audit_trail_is_event_scoped_and_ordered() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    assign(&mut persistence, staffed.shift_ids[0], ada);

    let trail: Vec<AuditEventInfo> = list_audit_events(&mut persistence, staffed.event_id).unwrap();

    let names: Vec<&str> = trail.iter().map(|e| e.action_name.as_str()).collect();
    assert_eq!(names, vec!["CreateEvent", "GenerateShifts", "Assign"]);
    let assign_event = &trail[2];
    assert_eq!(assign_event.actor_id, "admin-1");
    assert_eq!(assign_event.actor_type, "admin");
    assert_eq!(assign_event.cause_id, "api-req-1");
    assert_eq!(assign_event.shift_id, Some(staffed.shift_ids[0]));
}

#[test]
fn test_audit_trail_for_missing_event_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let result = list_audit_events(&mut persistence, 5);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Event"
    ));
}
