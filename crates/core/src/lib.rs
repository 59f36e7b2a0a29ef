// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod bulk;
mod command;
mod error;
mod pay_rate;
mod state;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use bulk::plan_round_robin;
pub use command::Command;
pub use error::CoreError;
pub use pay_rate::{FixedPayRate, PayRateResolver, RequirementPayRates};
pub use state::{
    ApplyContext, EventGraph, Mutation, StaffingPolicy, TransitionResult, TransitionWarning,
    WorkerProfile,
};
