// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall::CoreError;
use crewcall_domain::{DomainError, IneligibilityReason, ShiftStatus};
use crewcall_persistence::PersistenceError;

use crate::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};

#[test]
fn test_ineligible_worker_keeps_reason_codes() {
    let err = translate_domain_error(DomainError::IneligibleWorker {
        worker_id: Some(3),
        shift_id: 9,
        reasons: vec![
            IneligibilityReason::Inactive,
            IneligibilityReason::AlreadyAssigned,
        ],
    });

    assert_eq!(
        err,
        ApiError::IneligibleWorker {
            worker_id: Some(3),
            shift_id: 9,
            reasons: vec![String::from("inactive"), String::from("already-assigned")],
        }
    );
    assert_eq!(
        err.to_string(),
        "Worker 3 is not eligible for shift 9: inactive, already-assigned"
    );
}

#[test]
fn test_capacity_is_conflict_and_guard_is_precondition() {
    assert!(matches!(
        translate_domain_error(DomainError::ShiftAtCapacity {
            shift_id: 1,
            capacity: 1
        }),
        ApiError::Conflict { .. }
    ));
    assert!(matches!(
        translate_domain_error(DomainError::ShiftNotFullyStaffed {
            shift_id: 1,
            percentage: 50
        }),
        ApiError::PreconditionFailed { .. }
    ));
    assert!(matches!(
        translate_domain_error(DomainError::ShiftNotAssignable {
            shift_id: 1,
            status: ShiftStatus::Archived
        }),
        ApiError::PreconditionFailed { .. }
    ));
}

#[test]
fn test_shift_transition_names_entity_and_statuses() {
    let err = translate_core_error(CoreError::DomainViolation(
        DomainError::InvalidShiftTransition {
            from: ShiftStatus::Archived,
            to: ShiftStatus::Published,
        },
    ));

    assert_eq!(
        err,
        ApiError::InvalidTransition {
            entity: String::from("shift"),
            from: String::from("archived"),
            to: String::from("published"),
        }
    );
}

#[test]
fn test_concurrent_assignment_is_conflict() {
    let err = translate_persistence_error(PersistenceError::ActiveAssignmentConflict {
        shift_id: 4,
    });

    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_missing_row_is_not_found() {
    let err = translate_persistence_error(PersistenceError::NotFound(String::from("Shift 8")));

    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: String::from("Shift 8"),
        }
    );
}

#[test]
fn test_core_internal_error_is_internal() {
    let err = translate_core_error(CoreError::Internal(String::from("boom")));

    assert!(matches!(err, ApiError::Internal { .. }));
}
