// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    context, create_test_actor, create_test_assignment, create_test_cause, create_test_graph,
    now,
};
use crate::{
    Command, CoreError, EventGraph, Mutation, StaffingPolicy, TransitionResult,
    TransitionWarning, apply,
};
use crewcall_domain::{Assignment, AssignmentStatus, DomainError};

fn graph_with(status: AssignmentStatus) -> EventGraph {
    let mut graph = create_test_graph();
    graph
        .assignments
        .push(create_test_assignment(100, 10, 7, status));
    graph
}

fn run(graph: &EventGraph, command: Command) -> Result<TransitionResult, CoreError> {
    let policy = StaffingPolicy::default();
    apply(
        graph,
        command,
        create_test_actor(),
        create_test_cause(),
        &context(None, &policy),
    )
}

fn updated(result: TransitionResult) -> Assignment {
    match result.mutation {
        Mutation::UpdateAssignment { assignment, .. } => assignment,
        other => panic!("expected UpdateAssignment, got {other:?}"),
    }
}

#[test]
fn test_confirm_assignment() {
    let graph = graph_with(AssignmentStatus::Assigned);
    let result = run(&graph, Command::ConfirmAssignment { assignment_id: 100 }).unwrap();

    assert_eq!(result.audit_event.action.name, "ConfirmAssignment");
    assert_eq!(updated(result).status, AssignmentStatus::Confirmed);
}

#[test]
fn test_unassign_cancels_and_stores_reason() {
    let graph = graph_with(AssignmentStatus::Confirmed);
    let result = run(
        &graph,
        Command::Unassign {
            assignment_id: 100,
            reason: Some(String::from("Client reduced headcount")),
        },
    )
    .unwrap();

    assert_eq!(result.audit_event.action.name, "Unassign");
    assert_eq!(result.audit_event.shift_id, Some(10));
    let assignment = updated(result);
    assert_eq!(assignment.status, AssignmentStatus::Cancelled);
    assert_eq!(
        assignment.notes.as_deref(),
        Some("Client reduced headcount")
    );
    assert_eq!(assignment.updated_at, now());
}

#[test]
fn test_mark_no_show() {
    let graph = graph_with(AssignmentStatus::Assigned);
    let result = run(
        &graph,
        Command::MarkNoShow {
            assignment_id: 100,
            notes: Some(String::from("No call")),
        },
    )
    .unwrap();

    let assignment = updated(result);
    assert_eq!(assignment.status, AssignmentStatus::NoShow);
    assert!(!assignment.is_active());
}

#[test]
fn test_terminal_assignments_cannot_move() {
    let graph = graph_with(AssignmentStatus::Cancelled);
    let result = run(&graph, Command::ConfirmAssignment { assignment_id: 100 });

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidAssignmentTransition {
                from: AssignmentStatus::Cancelled,
                to: AssignmentStatus::Confirmed,
            }
        ))
    );
}

#[test]
fn test_unknown_assignment_is_not_found() {
    let graph = create_test_graph();
    let result = run(&graph, Command::ConfirmAssignment { assignment_id: 5 });
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::AssignmentNotFound(
            5
        )))
    );
}

#[test]
fn test_record_completion_within_schedule() {
    let graph = graph_with(AssignmentStatus::Confirmed);
    let result = run(
        &graph,
        Command::RecordCompletion {
            assignment_id: 100,
            hours_worked: 4.5,
        },
    )
    .unwrap();

    assert!(result.warnings.is_empty());
    let assignment = updated(result);
    assert_eq!(assignment.status, AssignmentStatus::Completed);
    assert_eq!(assignment.hours_worked, Some(4.5));
}

#[test]
fn test_record_completion_over_schedule_warns() {
    let graph = graph_with(AssignmentStatus::Assigned);
    let result = run(
        &graph,
        Command::RecordCompletion {
            assignment_id: 100,
            hours_worked: 6.0,
        },
    )
    .unwrap();

    assert_eq!(
        result.warnings,
        vec![TransitionWarning::HoursExceedSchedule {
            assignment_id: 100,
            hours_worked: 6.0,
            scheduled_hours: 5.0,
        }]
    );
}

#[test]
fn test_record_completion_rejects_hours_over_cap() {
    let graph = graph_with(AssignmentStatus::Assigned);
    let result = run(
        &graph,
        Command::RecordCompletion {
            assignment_id: 100,
            hours_worked: 25.0,
        },
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidHoursWorked { .. }
        ))
    ));
}

#[test]
fn test_record_completion_rejects_negative_and_nan() {
    let graph = graph_with(AssignmentStatus::Assigned);
    for hours_worked in [-1.0, f64::NAN, f64::INFINITY] {
        let result = run(
            &graph,
            Command::RecordCompletion {
                assignment_id: 100,
                hours_worked,
            },
        );
        assert!(result.is_err(), "{hours_worked} should be rejected");
    }
}

#[test]
fn test_record_completion_again_corrects_hours() {
    let mut graph = graph_with(AssignmentStatus::Completed);
    graph.assignments[0].hours_worked = Some(3.0);

    let result = run(
        &graph,
        Command::RecordCompletion {
            assignment_id: 100,
            hours_worked: 4.0,
        },
    )
    .unwrap();

    assert!(
        result
            .audit_event
            .action
            .details
            .as_deref()
            .unwrap()
            .starts_with("Corrected hours")
    );
    assert_eq!(updated(result).hours_worked, Some(4.0));
}

#[test]
fn test_no_show_cannot_be_completed() {
    let graph = graph_with(AssignmentStatus::NoShow);
    let result = run(
        &graph,
        Command::RecordCompletion {
            assignment_id: 100,
            hours_worked: 4.0,
        },
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidAssignmentTransition { .. }
        ))
    ));
}
