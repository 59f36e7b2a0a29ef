// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Demo data for local development.
//!
//! Seeds one venue, a small crew and a published event through the same API
//! functions the server calls, then checks the generated shifts against the
//! event's requirements.

use std::path::Path;

use color_eyre::{eyre::eyre, Result};
use crewcall::StaffingPolicy;
use crewcall_api::{
    ActingAdmin, BulkAssignRequest, CreateCertificationRequest, CreateEventRequest,
    CreateSkillRequest, CreateVenueRequest, CreateWorkerRequest, EventStaffingResponse,
    HeldCertification, RequirementInput, ScheduleInput, StaffingConfig, TransitionStatusRequest,
};
use crewcall_audit::Cause;
use crewcall_persistence::Persistence;

const SEED_ADMIN: &str = "xtask-seed";
const CERT_EXPIRY: &str = "2027-12-31T00:00:00Z";

fn cause(step: &str) -> Cause {
    Cause::new(format!("seed-{step}"), format!("Demo seed: {step}"))
}

fn requirement(skill: &str, needed: u32, rate: f64, certification_id: Option<i64>) -> RequirementInput {
    RequirementInput {
        skill_name: skill.to_string(),
        needed_workers: needed,
        uniform_name: Some(String::from("Black tie")),
        certification_id,
        pay_rate: Some(rate),
    }
}

/// Seeds the database at `path` and verifies what was written.
#[allow(clippy::too_many_lines)]
pub fn seed(path: &Path) -> Result<()> {
    let mut persistence = Persistence::new_with_file(path)
        .map_err(|e| eyre!("Failed to open {}: {e}", path.display()))?;
    let admin = ActingAdmin::new(SEED_ADMIN.to_string());
    let policy = StaffingPolicy::try_from(StaffingConfig::default())?;

    for name in ["Bartender", "Server", "Chef"] {
        crewcall_api::create_skill(
            &mut persistence,
            &CreateSkillRequest {
                name: name.to_string(),
            },
            &admin,
            cause("skills"),
        )
        .map_err(|e| eyre!("Failed to create skill {name}: {e}"))?;
    }

    let food_handler = crewcall_api::create_certification(
        &mut persistence,
        &CreateCertificationRequest {
            name: String::from("Food Handler"),
        },
        &admin,
        cause("certifications"),
    )
    .map_err(|e| eyre!("Failed to create certification: {e}"))?;

    let venue = crewcall_api::create_venue(
        &mut persistence,
        &CreateVenueRequest {
            name: String::from("Harbor Pavilion"),
            address: String::from("1 Pier Road, Boston, MA"),
            latitude: 42.3601,
            longitude: -71.0589,
            arrival_instructions: Some(String::from("Use the loading dock on the east side")),
            parking_instructions: Some(String::from("Staff lot B")),
            timezone: String::from("America/New_York"),
        },
        &admin,
        cause("venue"),
    )
    .map_err(|e| eyre!("Failed to create venue: {e}"))?;

    let crew: [(&str, &[&str], bool); 6] = [
        ("Ada Lovelace", &["Bartender"], false),
        ("Grace Hopper", &["Bartender", "Server"], false),
        ("Alan Turing", &["Server"], false),
        ("Edsger Dijkstra", &["Server"], false),
        ("Barbara Liskov", &["Server"], false),
        ("Julia Child", &["Chef"], true),
    ];
    let mut bartenders: Vec<i64> = Vec::new();
    for (name, skills, certified) in crew {
        let certifications = if certified {
            vec![HeldCertification {
                certification_id: food_handler.id,
                expires_at: CERT_EXPIRY.to_string(),
            }]
        } else {
            Vec::new()
        };
        let worker = crewcall_api::create_worker(
            &mut persistence,
            &CreateWorkerRequest {
                name: name.to_string(),
                email: None,
                phone: None,
                skills: skills.iter().map(ToString::to_string).collect(),
                certifications,
            },
            &admin,
            cause("workers"),
        )
        .map_err(|e| eyre!("Failed to create worker {name}: {e}"))?;
        if skills.contains(&"Bartender") {
            bartenders.push(worker.id);
        }
    }

    let event = crewcall_api::create_event(
        &mut persistence,
        &CreateEventRequest {
            title: String::from("Harbor Winter Gala"),
            venue_id: venue.id,
            check_in_instructions: Some(String::from("Check in with the captain at 16:30")),
            supervisor_name: Some(String::from("Dana Scully")),
            supervisor_phone: None,
            schedule: Some(ScheduleInput::Local {
                date: String::from("2026-12-12"),
                start: String::from("17:00"),
                end: String::from("23:30"),
                break_minutes: 30,
            }),
            requirements: vec![
                requirement("Bartender", 2, 28.0, None),
                requirement("Server", 3, 22.0, None),
                requirement("Chef", 1, 35.0, Some(food_handler.id)),
            ],
        },
        &admin,
        cause("event"),
    )
    .map_err(|e| eyre!("Failed to create event: {e}"))?;

    crewcall_api::generate_shifts(
        &mut persistence,
        event.event_id,
        &admin,
        cause("generate"),
        &policy,
    )
    .map_err(|e| eyre!("Failed to generate shifts: {e}"))?;
    crewcall_api::transition_event_status(
        &mut persistence,
        event.event_id,
        &TransitionStatusRequest {
            status: String::from("published"),
        },
        &admin,
        cause("publish"),
        &policy,
    )
    .map_err(|e| eyre!("Failed to publish event: {e}"))?;

    let staffing = crewcall_api::get_event_staffing(&mut persistence, event.event_id)
        .map_err(|e| eyre!("Failed to read staffing: {e}"))?;
    let bartender_shifts: Vec<i64> = staffing
        .shifts
        .iter()
        .filter(|s| s.role_needed.as_deref() == Some("Bartender"))
        .map(|s| s.shift_id)
        .collect();
    let bulk = crewcall_api::bulk_assign(
        &mut persistence,
        &BulkAssignRequest {
            worker_ids: bartenders,
            shift_ids: bartender_shifts,
            hourly_rate: None,
        },
        &admin,
        &cause("bulk-assign"),
        &policy,
    )
    .map_err(|e| eyre!("Failed to assign bartenders: {e}"))?;
    tracing::info!(
        event_id = event.event_id,
        succeeded = bulk.succeeded,
        failed = bulk.failed,
        "Seeded demo event"
    );

    let staffing = crewcall_api::get_event_staffing(&mut persistence, event.event_id)
        .map_err(|e| eyre!("Failed to read staffing: {e}"))?;
    verify_event(&staffing, event.total_workers_needed)?;

    tracing::info!("✓ Seed written to {}", path.display());
    Ok(())
}

/// Checks a seeded event: one shift per needed worker, capacity 1
/// everywhere, and every shift either empty or full.
fn verify_event(staffing: &EventStaffingResponse, total_needed: u32) -> Result<()> {
    let shift_count = u32::try_from(staffing.shifts.len())?;
    if shift_count != total_needed {
        return Err(eyre!(
            "❌ Seed check FAILED: {shift_count} shifts for {total_needed} needed workers"
        ));
    }
    if staffing.progress.required != total_needed {
        return Err(eyre!(
            "❌ Seed check FAILED: event requires {} but requirements sum to {total_needed}",
            staffing.progress.required
        ));
    }

    for shift in &staffing.shifts {
        if shift.capacity != Some(1) {
            return Err(eyre!(
                "❌ Seed check FAILED: shift {} has capacity {:?}",
                shift.shift_id,
                shift.capacity
            ));
        }
        if shift.progress.percentage != 0 && shift.progress.percentage != 100 {
            return Err(eyre!(
                "❌ Seed check FAILED: shift {} is {}% staffed",
                shift.shift_id,
                shift.progress.percentage
            ));
        }
        if shift.status != "published" {
            return Err(eyre!(
                "❌ Seed check FAILED: shift {} is {} after publishing",
                shift.shift_id,
                shift.status
            ));
        }
    }

    tracing::info!(
        shifts = shift_count,
        assigned = staffing.progress.assigned,
        percentage = staffing.progress.percentage,
        "Seeded event verified"
    );
    Ok(())
}
