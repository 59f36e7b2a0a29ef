// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `reference`: Skills, certifications, venues, workers, and event setup
//! - `transition`: Persisting the mutation produced by a staffing command
//!
//! Every write runs in an `IMMEDIATE` transaction and stores its audit
//! event in that same transaction.

pub mod audit;
pub mod reference;
pub mod transition;

pub use transition::PersistTransitionResult;
