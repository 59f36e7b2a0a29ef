// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall::StaffingPolicy;
use crewcall_domain::{EligibilityPolicy, HoursPolicy};
use crewcall_persistence::Persistence;

use crate::{
    ApiError, AssignWorkerRequest, AssignmentResponse, BulkAssignRequest, BulkAssignResponse,
    MarkNoShowRequest, RecordCompletionRequest, SetWorkerActiveRequest, UnassignRequest,
    assign_worker, bulk_assign, confirm_assignment, get_event_staffing, get_shift_staffing,
    mark_no_show, record_completion, set_worker_active, unassign,
};

use super::helpers::{
    create_bartender_event, create_test_admin, create_test_cause, create_test_persistence,
    create_test_worker, setup_bartender_event,
};

fn assign(
    persistence: &mut Persistence,
    shift_id: i64,
    worker_id: i64,
    hourly_rate: Option<f64>,
) -> Result<AssignmentResponse, ApiError> {
    assign_worker(
        persistence,
        &AssignWorkerRequest {
            shift_id,
            worker_id,
            hourly_rate,
        },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
}

fn complete(
    persistence: &mut Persistence,
    assignment_id: i64,
    hours_worked: f64,
) -> Result<AssignmentResponse, ApiError> {
    record_completion(
        persistence,
        assignment_id,
        &RecordCompletionRequest { hours_worked },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
}

fn bulk(
    persistence: &mut Persistence,
    worker_ids: Vec<i64>,
    shift_ids: Vec<i64>,
    hourly_rate: Option<f64>,
) -> Result<BulkAssignResponse, ApiError> {
    bulk_assign(
        persistence,
        &BulkAssignRequest {
            worker_ids,
            shift_ids,
            hourly_rate,
        },
        &create_test_admin(),
        &create_test_cause(),
        &StaffingPolicy::default(),
    )
}

#[test]
fn test_assigning_one_of_two_bartenders() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let worker_id: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let shift_id: i64 = staffed.shift_ids[0];

    let response = assign(&mut persistence, shift_id, worker_id, Some(25.0)).unwrap();

    assert_eq!(response.assignment.status, "assigned");
    assert_eq!(response.assignment.assigned_by, "admin-1");
    assert_eq!(response.assignment.hourly_rate, Some(25.0));

    let shift = get_shift_staffing(&mut persistence, shift_id).unwrap();
    assert_eq!(
        (shift.assigned, shift.required, shift.percentage),
        (1, 1, 100)
    );

    let event = get_event_staffing(&mut persistence, staffed.event_id).unwrap();
    assert_eq!(
        (event.progress.assigned, event.progress.required, event.progress.percentage),
        (1, 2, 50)
    );
}

#[test]
fn test_rate_resolves_from_requirement() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let worker_id: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);

    let response = assign(&mut persistence, staffed.shift_ids[0], worker_id, None).unwrap();

    assert_eq!(response.assignment.hourly_rate, Some(25.0));
}

#[test]
fn test_negative_rate_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let worker_id: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);

    let result = assign(&mut persistence, staffed.shift_ids[0], worker_id, Some(-1.0));

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "hourly_rate"
    ));
}

#[test]
fn test_second_worker_on_full_shift_is_conflict() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let grace: i64 = create_test_worker(&mut persistence, "Grace", &["Bartender"]);
    let shift_id: i64 = staffed.shift_ids[0];
    assign(&mut persistence, shift_id, ada, None).unwrap();

    let result = assign(&mut persistence, shift_id, grace, None);

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
    assert_eq!(persistence.count_active_assignments(shift_id).unwrap(), 1);
}

#[test]
fn test_ineligible_worker_lists_every_reason() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let worker_id: i64 = create_test_worker(&mut persistence, "Ada", &["Server"]);
    set_worker_active(
        &mut persistence,
        worker_id,
        &SetWorkerActiveRequest { active: false },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();

    let result = assign(&mut persistence, staffed.shift_ids[0], worker_id, None);

    let Err(ApiError::IneligibleWorker { reasons, .. }) = result else {
        panic!("expected an eligibility failure, got {result:?}");
    };
    assert_eq!(reasons, vec!["inactive", "missing-skill"]);
}

#[test]
fn test_assign_to_missing_shift_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    setup_bartender_event(&mut persistence);
    let worker_id: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);

    let result = assign(&mut persistence, 999, worker_id, None);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Shift"
    ));
}

#[test]
fn test_assign_missing_worker_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);

    let result = assign(&mut persistence, staffed.shift_ids[0], 999, None);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Worker"
    ));
}

#[test]
fn test_overlap_is_enforced_only_when_configured() {
    let mut persistence: Persistence = create_test_persistence();
    let first = setup_bartender_event(&mut persistence);
    let second = create_bartender_event(&mut persistence);
    let worker_id: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    assign(&mut persistence, first.shift_ids[0], worker_id, None).unwrap();

    let strict = StaffingPolicy {
        eligibility: EligibilityPolicy {
            enforce_overlap: true,
        },
        ..StaffingPolicy::default()
    };
    let result = assign_worker(
        &mut persistence,
        &AssignWorkerRequest {
            shift_id: second.shift_ids[0],
            worker_id,
            hourly_rate: None,
        },
        &create_test_admin(),
        create_test_cause(),
        &strict,
    );
    let Err(ApiError::IneligibleWorker { reasons, .. }) = result else {
        panic!("expected an overlap failure, got {result:?}");
    };
    assert_eq!(reasons, vec!["overlapping-assignment"]);

    assign(&mut persistence, second.shift_ids[0], worker_id, None).unwrap();
}

#[test]
fn test_unassign_frees_the_slot() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let grace: i64 = create_test_worker(&mut persistence, "Grace", &["Bartender"]);
    let shift_id: i64 = staffed.shift_ids[0];
    let assignment_id: i64 = assign(&mut persistence, shift_id, ada, None)
        .unwrap()
        .assignment
        .assignment_id;

    let response = unassign(
        &mut persistence,
        assignment_id,
        &UnassignRequest {
            reason: Some(String::from("Called in sick")),
        },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert_eq!(response.assignment.status, "cancelled");
    assert_eq!(response.assignment.notes.as_deref(), Some("Called in sick"));
    assign(&mut persistence, shift_id, grace, None).unwrap();
}

#[test]
fn test_cancelled_assignment_cannot_be_confirmed() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let assignment_id: i64 = assign(&mut persistence, staffed.shift_ids[0], ada, None)
        .unwrap()
        .assignment
        .assignment_id;
    unassign(
        &mut persistence,
        assignment_id,
        &UnassignRequest::default(),
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    let result = confirm_assignment(
        &mut persistence,
        assignment_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidTransition { ref entity, ref from, ref to })
            if entity == "assignment" && from == "cancelled" && to == "confirmed"
    ));
}

#[test]
fn test_no_show_keeps_notes_and_frees_the_slot() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let shift_id: i64 = staffed.shift_ids[0];
    let assignment_id: i64 = assign(&mut persistence, shift_id, ada, None)
        .unwrap()
        .assignment
        .assignment_id;

    let response = mark_no_show(
        &mut persistence,
        assignment_id,
        &MarkNoShowRequest {
            notes: Some(String::from("No call")),
        },
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();

    assert_eq!(response.assignment.status, "no_show");
    assert_eq!(persistence.count_active_assignments(shift_id).unwrap(), 0);
    let shift = get_shift_staffing(&mut persistence, shift_id).unwrap();
    assert_eq!(shift.percentage, 0);
}

#[test]
fn test_confirm_then_complete() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let assignment_id: i64 = assign(&mut persistence, staffed.shift_ids[0], ada, None)
        .unwrap()
        .assignment
        .assignment_id;

    let confirmed = confirm_assignment(
        &mut persistence,
        assignment_id,
        &create_test_admin(),
        create_test_cause(),
        &StaffingPolicy::default(),
    )
    .unwrap();
    assert_eq!(confirmed.assignment.status, "confirmed");

    let completed = complete(&mut persistence, assignment_id, 4.5).unwrap();
    assert_eq!(completed.assignment.status, "completed");
    assert_eq!(completed.assignment.hours_worked, Some(4.5));
    assert!(completed.warnings.is_empty());
}

#[test]
fn test_hours_above_schedule_warn_but_persist() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let assignment_id: i64 = assign(&mut persistence, staffed.shift_ids[0], ada, None)
        .unwrap()
        .assignment
        .assignment_id;

    let response = complete(&mut persistence, assignment_id, 6.0).unwrap();

    assert_eq!(response.assignment.hours_worked, Some(6.0));
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("5.00 scheduled"));
}

#[test]
fn test_hours_above_cap_are_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let assignment_id: i64 = assign(&mut persistence, staffed.shift_ids[0], ada, None)
        .unwrap()
        .assignment
        .assignment_id;
    let capped = StaffingPolicy {
        hours: HoursPolicy {
            max_hours_per_shift: 8.0,
        },
        ..StaffingPolicy::default()
    };

    let result = record_completion(
        &mut persistence,
        assignment_id,
        &RecordCompletionRequest { hours_worked: 9.0 },
        &create_test_admin(),
        create_test_cause(),
        &capped,
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "hours_worked"
    ));
}

#[test]
fn test_recording_again_corrects_hours() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let assignment_id: i64 = assign(&mut persistence, staffed.shift_ids[0], ada, None)
        .unwrap()
        .assignment
        .assignment_id;
    complete(&mut persistence, assignment_id, 4.0).unwrap();

    let response = complete(&mut persistence, assignment_id, 3.5).unwrap();

    assert_eq!(response.assignment.hours_worked, Some(3.5));
}

#[test]
fn test_bulk_assign_round_robin() {
    let mut persistence: Persistence = create_test_persistence();
    let first = setup_bartender_event(&mut persistence);
    let second = create_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let grace: i64 = create_test_worker(&mut persistence, "Grace", &["Bartender"]);
    let shift_ids: Vec<i64> = vec![first.shift_ids[0], second.shift_ids[0]];

    let response = bulk(&mut persistence, vec![ada, grace], shift_ids.clone(), None).unwrap();

    assert_eq!((response.succeeded, response.failed), (2, 0));
    assert_eq!(response.results[0].worker_id, Some(ada));
    assert_eq!(response.results[1].worker_id, Some(grace));
    assert!(response.results.iter().all(|r| r.assignment_id.is_some()));
}

#[test]
fn test_bulk_assign_reports_full_shifts_and_continues() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let grace: i64 = create_test_worker(&mut persistence, "Grace", &["Bartender"]);
    assign(&mut persistence, staffed.shift_ids[0], ada, None).unwrap();

    let response = bulk(
        &mut persistence,
        vec![grace],
        vec![staffed.shift_ids[0], staffed.shift_ids[1], 999],
        Some(30.0),
    )
    .unwrap();

    assert_eq!((response.succeeded, response.failed), (1, 2));
    let full = &response.results[0];
    assert!(!full.success);
    assert_eq!(full.worker_id, None);
    assert!(full.error.as_deref().unwrap().contains("fully staffed"));

    let open = &response.results[1];
    assert!(open.success);
    assert_eq!(open.worker_id, Some(grace));
    assert_eq!(open.shift_id, staffed.shift_ids[1]);

    let missing = &response.results[2];
    assert!(!missing.success);
    assert_eq!(missing.shift_id, 999);

    let graph = persistence.load_event_graph(staffed.event_id).unwrap();
    let bulk_assigned = graph
        .assignments
        .iter()
        .find(|a| a.worker_id == grace)
        .unwrap();
    assert_eq!(bulk_assigned.hourly_rate, Some(30.0));
}

#[test]
fn test_bulk_assign_isolates_ineligible_items() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);
    let sam: i64 = create_test_worker(&mut persistence, "Sam", &["Server"]);

    let response = bulk(
        &mut persistence,
        vec![ada, sam],
        staffed.shift_ids.clone(),
        None,
    )
    .unwrap();

    assert_eq!((response.succeeded, response.failed), (1, 1));
    assert!(response.results[0].success);
    assert!(
        response.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("missing-skill")
    );
}

#[test]
fn test_bulk_assign_requires_workers_and_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    let staffed = setup_bartender_event(&mut persistence);
    let ada: i64 = create_test_worker(&mut persistence, "Ada", &["Bartender"]);

    let no_workers = bulk(&mut persistence, Vec::new(), staffed.shift_ids.clone(), None);
    let no_shifts = bulk(&mut persistence, vec![ada], Vec::new(), None);

    assert!(matches!(
        no_workers,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "worker_ids"
    ));
    assert!(matches!(
        no_shifts,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "shift_ids"
    ));
}
