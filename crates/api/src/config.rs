// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staffing configuration.
//!
//! The server collects these values from the command line and converts them
//! into the core [`StaffingPolicy`] once, at startup.

use crewcall::StaffingPolicy;
use crewcall_domain::{EligibilityPolicy, HoursPolicy};
use thiserror::Error;

/// Staffing configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum StaffingConfigError {
    /// The hours cap is not a positive number.
    #[error("Max hours per shift must be a positive, finite number (got {value})")]
    InvalidMaxHours { value: f64 },

    /// The default rate is negative or not finite.
    #[error("Default hourly rate must be a finite, non-negative number (got {value})")]
    InvalidDefaultRate { value: f64 },
}

/// Staffing rules as configured by the operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffingConfig {
    /// Hard cap on hours recorded for one shift.
    pub max_hours_per_shift: f64,
    /// Reject workers already booked on an overlapping shift.
    pub enforce_overlap: bool,
    /// Rate used when neither the caller nor the requirement gives one.
    pub default_hourly_rate: Option<f64>,
}

impl Default for StaffingConfig {
    fn default() -> Self {
        Self {
            max_hours_per_shift: HoursPolicy::DEFAULT_MAX_HOURS_PER_SHIFT,
            enforce_overlap: false,
            default_hourly_rate: None,
        }
    }
}

impl StaffingConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_hours_per_shift` is not finite or not positive
    /// - `default_hourly_rate` is negative or not finite
    pub fn validate(&self) -> Result<(), StaffingConfigError> {
        if !self.max_hours_per_shift.is_finite() || self.max_hours_per_shift <= 0.0 {
            return Err(StaffingConfigError::InvalidMaxHours {
                value: self.max_hours_per_shift,
            });
        }

        if let Some(rate) = self.default_hourly_rate
            && (!rate.is_finite() || rate < 0.0)
        {
            return Err(StaffingConfigError::InvalidDefaultRate { value: rate });
        }

        Ok(())
    }
}

impl TryFrom<StaffingConfig> for StaffingPolicy {
    type Error = StaffingConfigError;

    fn try_from(config: StaffingConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            eligibility: EligibilityPolicy {
                enforce_overlap: config.enforce_overlap,
            },
            hours: HoursPolicy {
                max_hours_per_shift: config.max_hours_per_shift,
            },
            default_hourly_rate: config.default_hourly_rate,
        })
    }
}
