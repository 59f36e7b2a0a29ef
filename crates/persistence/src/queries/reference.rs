// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data queries: skills, certifications, venues.

use crewcall_domain::{Certification, SkillCatalog, SkillName, Venue};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{CertificationRow, VenueRow};
use crate::diesel_schema::{certifications, skills, venues};
use crate::error::PersistenceError;

/// Loads the skill catalog.
///
/// # Errors
///
/// Returns an error if the query fails or a stored name is invalid.
pub fn load_skill_catalog(conn: &mut SqliteConnection) -> Result<SkillCatalog, PersistenceError> {
    let names: Vec<String> = skills::table
        .select(skills::name)
        .order(skills::name.asc())
        .load(conn)?;

    let skills: Vec<SkillName> = names
        .iter()
        .map(|n| {
            SkillName::parse(n).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
        })
        .collect::<Result<_, _>>()?;

    Ok(SkillCatalog::new(skills))
}

/// Loads a venue.
///
/// # Errors
///
/// Returns `NotFound` if the venue does not exist.
pub fn get_venue(conn: &mut SqliteConnection, venue_id: i64) -> Result<Venue, PersistenceError> {
    venues::table
        .filter(venues::venue_id.eq(venue_id))
        .select(VenueRow::as_select())
        .first(conn)
        .optional()?
        .map(Venue::from)
        .ok_or_else(|| PersistenceError::NotFound(format!("Venue {venue_id}")))
}

/// Lists all certifications.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_certifications(
    conn: &mut SqliteConnection,
) -> Result<Vec<Certification>, PersistenceError> {
    Ok(certifications::table
        .order(certifications::certification_id.asc())
        .select(CertificationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Certification::from)
        .collect())
}

/// Returns true if the certification exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn certification_exists(
    conn: &mut SqliteConnection,
    certification_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = certifications::table
        .filter(certifications::certification_id.eq(certification_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
