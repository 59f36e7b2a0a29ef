// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::event::{Event, EventSkillRequirement};
use crate::types::{SkillCatalog, Venue, Worker};
use chrono_tz::Tz;

/// Largest `needed_workers` a single requirement may ask for.
pub const MAX_NEEDED_WORKERS: i32 = 500;

/// Validates a worker's fields against the skill catalog.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - Any skill is not in the catalog
pub fn validate_worker_fields(worker: &Worker, catalog: &SkillCatalog) -> Result<(), DomainError> {
    if worker.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Worker name cannot be empty",
        )));
    }

    for skill in &worker.skills {
        catalog.require(skill)?;
    }

    Ok(())
}

/// Validates a venue.
///
/// Coordinates are range-checked only; no geocoding happens.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - Latitude is outside [-90, 90] or longitude outside [-180, 180]
/// - The timezone is not an IANA zone
pub fn validate_venue(venue: &Venue) -> Result<(), DomainError> {
    if venue.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Venue name cannot be empty",
        )));
    }

    if !(-90.0..=90.0).contains(&venue.latitude) {
        return Err(DomainError::InvalidCoordinates(format!(
            "latitude {} is outside [-90, 90]",
            venue.latitude
        )));
    }

    if !(-180.0..=180.0).contains(&venue.longitude) {
        return Err(DomainError::InvalidCoordinates(format!(
            "longitude {} is outside [-180, 180]",
            venue.longitude
        )));
    }

    venue
        .timezone
        .parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(venue.timezone.clone()))?;

    Ok(())
}

/// Validates an event's own fields.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the title is empty.
pub fn validate_event_fields(event: &Event) -> Result<(), DomainError> {
    if event.title.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Event title cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a skill requirement entered through the boundary.
///
/// Stored rows with zero or negative counts are tolerated by generation;
/// new input must ask for at least one worker.
///
/// # Errors
///
/// Returns an error if:
/// - The skill is not in the catalog
/// - `needed_workers` is outside `1..=MAX_NEEDED_WORKERS`
/// - The pay rate is negative or not finite
pub fn validate_requirement(
    requirement: &EventSkillRequirement,
    catalog: &SkillCatalog,
) -> Result<(), DomainError> {
    catalog.require(&requirement.skill_name)?;

    if !(1..=MAX_NEEDED_WORKERS).contains(&requirement.needed_workers) {
        return Err(DomainError::InvalidSkillRequirement {
            reason: format!(
                "needed workers for '{}' must be between 1 and {MAX_NEEDED_WORKERS}, got {}",
                requirement.skill_name, requirement.needed_workers
            ),
        });
    }

    if let Some(rate) = requirement.pay_rate {
        validate_hourly_rate(rate)?;
    }

    Ok(())
}

/// Validates an hourly rate.
///
/// # Errors
///
/// Returns `DomainError::InvalidHourlyRate` if the rate is negative or not finite.
pub fn validate_hourly_rate(rate: f64) -> Result<(), DomainError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(DomainError::InvalidHourlyRate(format!(
            "rate must be a finite, non-negative number, got {rate}"
        )));
    }
    Ok(())
}
