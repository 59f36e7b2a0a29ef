// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    EVENT_ID, context, create_test_actor, create_test_assignment, create_test_cause,
    create_test_graph, create_test_profile, now,
};
use crate::{Command, CoreError, Mutation, StaffingPolicy, TransitionResult, apply};
use crewcall_domain::{
    AssignmentStatus, DomainError, EventStatus, IneligibilityReason, ShiftStatus, WorkerBooking,
};
use time::Duration;

fn assign(worker_id: i64, shift_id: i64, hourly_rate: Option<f64>) -> Command {
    Command::Assign {
        worker_id,
        shift_id,
        hourly_rate,
    }
}

#[test]
fn test_assign_creates_assigned_assignment() {
    let graph = create_test_graph();
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result: TransitionResult = apply(
        &graph,
        assign(7, 10, Some(25.0)),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    )
    .unwrap();

    let Mutation::CreateAssignment(new_assignment) = result.mutation else {
        panic!("expected CreateAssignment");
    };
    assert_eq!(new_assignment.shift_id, 10);
    assert_eq!(new_assignment.worker_id, 7);
    assert_eq!(new_assignment.status, AssignmentStatus::Assigned);
    assert_eq!(new_assignment.assigned_by, "admin-123");
    assert_eq!(new_assignment.assigned_at, now());
    assert_eq!(new_assignment.hourly_rate, Some(25.0));
}

#[test]
fn test_assign_emits_shift_scoped_audit_event() {
    let graph = create_test_graph();
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    )
    .unwrap();

    assert_eq!(result.audit_event.action.name, "Assign");
    assert_eq!(result.audit_event.actor.id, "admin-123");
    assert_eq!(result.audit_event.event_id, Some(EVENT_ID));
    assert_eq!(result.audit_event.shift_id, Some(10));
    assert!(result.audit_event.before.data.contains("active_assignments=0"));
    assert!(result.audit_event.after.data.contains("active_assignments=1"));
}

#[test]
fn test_assign_reports_every_ineligibility_reason() {
    let graph = create_test_graph();
    let mut profile = create_test_profile(7, &["Server"]);
    profile.worker.active = false;
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::IneligibleWorker {
            worker_id: Some(7),
            shift_id: 10,
            reasons: vec![
                IneligibilityReason::Inactive,
                IneligibilityReason::MissingSkill,
            ],
        }))
    );
}

#[test]
fn test_assign_to_occupied_shift_is_a_conflict() {
    let mut graph = create_test_graph();
    graph
        .assignments
        .push(create_test_assignment(100, 10, 8, AssignmentStatus::Confirmed));
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ShiftAtCapacity {
            shift_id: 10,
            capacity: 1,
        }))
    );
}

#[test]
fn test_cancelled_assignment_frees_the_slot() {
    let mut graph = create_test_graph();
    graph
        .assignments
        .push(create_test_assignment(100, 10, 8, AssignmentStatus::Cancelled));
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );

    assert!(result.is_ok());
}

#[test]
fn test_reassigning_same_worker_is_already_assigned() {
    let mut graph = create_test_graph();
    graph
        .assignments
        .push(create_test_assignment(100, 10, 7, AssignmentStatus::Assigned));
    // The profile's bookings were loaded before the assignment existed.
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::IneligibleWorker { reasons, .. }))
            if reasons == vec![IneligibilityReason::AlreadyAssigned]
    ));
}

#[test]
fn test_overlap_policy_blocks_double_booking() {
    let graph = create_test_graph();
    let mut profile = create_test_profile(7, &["Bartender"]);
    profile.bookings.push(WorkerBooking {
        assignment_id: 500,
        shift_id: 900,
        start_time: graph.shifts[0].start_time + Duration::hours(2),
        end_time: graph.shifts[0].end_time + Duration::hours(2),
    });

    let lenient = StaffingPolicy::default();
    assert!(
        apply(
            &graph,
            assign(7, 10, None),
            create_test_actor(),
            create_test_cause(),
            &context(Some(&profile), &lenient),
        )
        .is_ok()
    );

    let mut strict = StaffingPolicy::default();
    strict.eligibility.enforce_overlap = true;
    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &strict),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::IneligibleWorker { reasons, .. }))
            if reasons == vec![IneligibilityReason::OverlappingAssignment]
    ));
}

#[test]
fn test_missing_worker_profile_is_not_found() {
    let graph = create_test_graph();
    let other = create_test_profile(8, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&other), &policy),
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::WorkerNotFound(7)))
    );
}

#[test]
fn test_unknown_shift_is_not_found() {
    let graph = create_test_graph();
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 99, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ShiftNotFound(99)))
    );
}

#[test]
fn test_rate_falls_back_to_policy_default() {
    let mut graph = create_test_graph();
    graph.requirements[0].pay_rate = None;
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy {
        default_hourly_rate: Some(18.5),
        ..StaffingPolicy::default()
    };

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    )
    .unwrap();

    let Mutation::CreateAssignment(new_assignment) = result.mutation else {
        panic!("expected CreateAssignment");
    };
    assert_eq!(new_assignment.hourly_rate, Some(18.5));
}

#[test]
fn test_rate_left_unset_without_any_source() {
    let mut graph = create_test_graph();
    graph.requirements[0].pay_rate = None;
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    )
    .unwrap();

    let Mutation::CreateAssignment(new_assignment) = result.mutation else {
        panic!("expected CreateAssignment");
    };
    assert_eq!(new_assignment.hourly_rate, None);
}

#[test]
fn test_negative_explicit_rate_is_rejected() {
    let graph = create_test_graph();
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, Some(-5.0)),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidHourlyRate(_)))
    ));
}

#[test]
fn test_closed_shifts_do_not_take_assignments() {
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    for status in [
        ShiftStatus::Completed,
        ShiftStatus::Archived,
        ShiftStatus::Cancelled,
    ] {
        let mut graph = create_test_graph();
        graph.shifts[0].status = status;

        let result = apply(
            &graph,
            assign(7, 10, None),
            create_test_actor(),
            create_test_cause(),
            &context(Some(&profile), &policy),
        );
        assert_eq!(
            result,
            Err(CoreError::DomainViolation(DomainError::ShiftNotAssignable {
                shift_id: 10,
                status,
            }))
        );
    }
}

#[test]
fn test_draft_shift_takes_assignments() {
    let mut graph = create_test_graph();
    graph.event.status = EventStatus::Draft;
    graph.shifts[0].status = ShiftStatus::Draft;
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn test_deleted_event_does_not_take_assignments() {
    let mut graph = create_test_graph();
    graph.event.status = EventStatus::Deleted;
    let profile = create_test_profile(7, &["Bartender"]);
    let policy = StaffingPolicy::default();

    let result = apply(
        &graph,
        assign(7, 10, None),
        create_test_actor(),
        create_test_cause(),
        &context(Some(&profile), &policy),
    );
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::EventNotSchedulable {
            event_id: EVENT_ID,
            status: EventStatus::Deleted,
        }))
    );
}
