// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nbrun-core: domain types for running notebooks as remote batch jobs

pub mod abbrev;
pub mod id;
pub mod naming;
pub mod params;
pub mod record;
pub mod rule;
pub mod run;
pub mod status;
pub mod submission;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use abbrev::{abbreviate_image, abbreviate_role};
pub use id::{JobName, RuleName};
pub use naming::{JobNaming, JOB_PREFIX};
pub use params::{expand_params, param_pairs, parse_param, parse_params, Parameters};
pub use record::{
    CallerIdentity, JobPage, JobRecord, JobSummary, RulePage, RuleRecord, RuleTarget,
};
pub use rule::{ScheduleDescription, Trigger, RULE_PREFIX, TARGET_ID};
pub use run::RunDescription;
pub use status::JobStatus;
pub use submission::{
    apply_overrides, ConfigError, JobSpec, Override, ResolvedTargets, SubmissionOverrides,
    SubmissionRequest, VpcConfig,
};
pub use time_fmt::{format_elapsed, format_elapsed_ms, format_elapsed_opt, format_timestamp};
