// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// A validated skill (role) name such as "Bartender" or "Server".
///
/// Skill names are compared exactly. They are trimmed on construction but
/// never case-folded; the skill catalog is what catches typos.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName {
    value: String,
}

impl SkillName {
    /// Longest accepted skill name, in characters.
    pub const MAX_LENGTH: usize = 64;

    /// Parses and validates a skill name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSkillName` if the name is empty after
    /// trimming, longer than [`Self::MAX_LENGTH`], or contains control characters.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidSkillName(String::from(
                "Skill name must not be empty",
            )));
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidSkillName(format!(
                "Skill name must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(DomainError::InvalidSkillName(String::from(
                "Skill name must not contain control characters",
            )));
        }

        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the skill name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for SkillName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for SkillName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SkillName> for String {
    fn from(skill: SkillName) -> Self {
        skill.value
    }
}

/// The set of skill names the business recognizes.
///
/// Worker skills and event skill requirements must name a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    skills: BTreeSet<SkillName>,
}

impl SkillCatalog {
    /// Creates a catalog from known skills.
    pub fn new<I>(skills: I) -> Self
    where
        I: IntoIterator<Item = SkillName>,
    {
        Self {
            skills: skills.into_iter().collect(),
        }
    }

    /// Returns true if the skill is known.
    #[must_use]
    pub fn contains(&self, skill: &SkillName) -> bool {
        self.skills.contains(skill)
    }

    /// Verifies a skill is known.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownSkill` if the skill is not in the catalog.
    pub fn require(&self, skill: &SkillName) -> Result<(), DomainError> {
        if self.contains(skill) {
            Ok(())
        } else {
            Err(DomainError::UnknownSkill(skill.value().to_string()))
        }
    }

    /// Returns all known skills in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillName> {
        self.skills.iter()
    }

    /// Returns the number of known skills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// The number of worker slots a shift represents.
///
/// Generated shifts always have a capacity of one; the staffing math only
/// ever reads it through [`Capacity::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capacity(u32);

impl Capacity {
    /// A single worker slot.
    pub const SINGLE: Self = Self(1);

    /// Creates a capacity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCapacity` if `slots` is zero.
    pub const fn new(slots: u32) -> Result<Self, DomainError> {
        if slots == 0 {
            Err(DomainError::InvalidCapacity(slots))
        } else {
            Ok(Self(slots))
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A place where catering events happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// The canonical identifier; `None` until persisted.
    pub venue_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Street address, stored as given.
    pub address: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// How staff find the service entrance.
    pub arrival_instructions: Option<String>,
    /// Where staff park.
    pub parking_instructions: Option<String>,
    /// IANA timezone used to interpret local schedule times.
    pub timezone: String,
}

/// A certification that a shift may require (food handler, alcohol service...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    /// The canonical identifier; `None` until persisted.
    pub certification_id: Option<i64>,
    /// Display name.
    pub name: String,
}

/// A certification held by a worker, with its own expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCertification {
    /// The certification held.
    pub certification_id: i64,
    /// When the certification lapses.
    pub expires_at: OffsetDateTime,
}

impl WorkerCertification {
    /// Returns true if the certification is still valid strictly after `at`.
    #[must_use]
    pub fn is_valid_through(&self, at: OffsetDateTime) -> bool {
        self.expires_at > at
    }
}

/// A member of the catering staff pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// The canonical identifier; `None` until persisted.
    pub worker_id: Option<i64>,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Inactive workers cannot be assigned.
    pub active: bool,
    /// Skills the worker can staff.
    pub skills: BTreeSet<SkillName>,
    /// Certifications held, each with its own expiry.
    pub certifications: Vec<WorkerCertification>,
}

impl Worker {
    /// Creates a new active worker without certifications.
    #[must_use]
    pub fn new(name: String, skills: BTreeSet<SkillName>) -> Self {
        Self {
            worker_id: None,
            name,
            email: None,
            phone: None,
            active: true,
            skills,
            certifications: Vec::new(),
        }
    }

    /// Returns true if the worker has the given skill.
    #[must_use]
    pub fn has_skill(&self, skill: &SkillName) -> bool {
        self.skills.contains(skill)
    }

    /// Returns true if the worker holds `certification_id` and it is valid
    /// strictly after `at`.
    ///
    /// A worker holding the same certification more than once (renewals)
    /// qualifies if any of the rows is still valid.
    #[must_use]
    pub fn holds_certification_through(&self, certification_id: i64, at: OffsetDateTime) -> bool {
        self.certifications
            .iter()
            .filter(|c| c.certification_id == certification_id)
            .any(|c| c.is_valid_through(at))
    }
}
