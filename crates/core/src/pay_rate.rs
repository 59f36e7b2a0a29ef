// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crewcall_domain::{EventSkillRequirement, Shift};

/// Chooses an hourly rate for an assignment when the caller gives none.
pub trait PayRateResolver {
    /// Returns the rate for `shift`, or `None` to leave it unset.
    fn resolve(&self, shift: &Shift) -> Option<f64>;
}

/// Resolves from the event requirement matching the shift's role, then a
/// configured default.
#[derive(Debug, Clone, Copy)]
pub struct RequirementPayRates<'a> {
    requirements: &'a [EventSkillRequirement],
    default_rate: Option<f64>,
}

impl<'a> RequirementPayRates<'a> {
    #[must_use]
    pub const fn new(requirements: &'a [EventSkillRequirement], default_rate: Option<f64>) -> Self {
        Self {
            requirements,
            default_rate,
        }
    }
}

impl PayRateResolver for RequirementPayRates<'_> {
    fn resolve(&self, shift: &Shift) -> Option<f64> {
        shift
            .role_needed
            .as_ref()
            .and_then(|role| {
                self.requirements
                    .iter()
                    .filter(|r| &r.skill_name == role)
                    .find_map(|r| r.pay_rate)
            })
            .or(self.default_rate)
    }
}

/// Resolves every shift to the same rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPayRate(pub f64);

impl PayRateResolver for FixedPayRate {
    fn resolve(&self, _shift: &Shift) -> Option<f64> {
        Some(self.0)
    }
}
