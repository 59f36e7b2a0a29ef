// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `event_graph`: Eager loading of an event with its schedule, requirements, shifts, and assignments
//! - `workers`: Workers and their active bookings
//! - `reference`: Skills, certifications, and venues
//! - `audit`: Audit trail retrieval
//! - `timesheet`: Completed assignments for payroll export

pub mod audit;
pub mod event_graph;
pub mod reference;
pub mod timesheet;
pub mod workers;
