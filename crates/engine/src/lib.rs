// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nbrun engine: run tracking, submission and schedules

pub mod config;
pub mod discovery;
pub mod env;
mod error;
mod fetcher;
mod invoke;
mod runner;
mod runs;
mod schedule;
mod session;
mod submit;
mod tracker;

#[cfg(test)]
mod test_helpers;

pub use config::Config;
pub use discovery::{DiscoveryCursor, NewJobs};
pub use error::EngineError;
pub use fetcher::{Fetcher, DEFAULT_THROTTLE_DELAY};
pub use invoke::InvokeRequest;
pub use runner::{AwsRunner, Runner, RunnerDeps};
pub use runs::{ResultObject, RunFilter};
pub use schedule::ScheduleRequest;
pub use session::Session;
pub use tracker::{RefreshOutcome, RunTracker, DEFAULT_MAX_JOBS};
