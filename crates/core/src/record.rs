// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized records returned by the remote services.
//!
//! Adapters translate each service's wire format into these types so the
//! engine never sees raw JSON.

use crate::id::JobName;
use crate::status::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Environment key holding the container-local input notebook path.
pub const ENV_INPUT: &str = "PAPERMILL_INPUT";
/// Environment key holding the container-local output notebook path.
pub const ENV_OUTPUT: &str = "PAPERMILL_OUTPUT";
/// Environment key holding the JSON-serialized notebook parameters.
pub const ENV_PARAMS: &str = "PAPERMILL_PARAMS";
/// Environment key holding the notebook's display name.
pub const ENV_NOTEBOOK_NAME: &str = "PAPERMILL_NOTEBOOK_NAME";
/// Environment key holding the schedule rule that started the job.
pub const ENV_RULE: &str = "AWS_EVENTBRIDGE_RULE";
/// Environment key forwarding the submitting region to the container.
pub const ENV_REGION: &str = "AWS_DEFAULT_REGION";

/// Full description of one processing job.
///
/// Run metadata (notebook name, rule, parameters) lives in the job's
/// environment rather than in a separate store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub name: JobName,
    pub status: JobStatus,
    pub failure_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Prefix of the first configured output.
    pub output_prefix: Option<String>,
    /// URI of the first configured input.
    pub input_location: String,
    pub image: String,
    pub instance_type: String,
    pub role_arn: String,
}

impl JobRecord {
    pub fn env(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(String::as_str)
    }
}

/// One entry of a job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: JobName,
    pub created_at: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

/// A page of job summaries, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPage {
    pub summaries: Vec<JobSummary>,
    pub next_token: Option<String>,
}

/// A schedule rule as stored by the event service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Remote (prefixed) rule name.
    pub name: String,
    pub arn: Option<String>,
    pub schedule_expression: Option<String>,
    pub event_pattern: Option<String>,
    pub state: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePage {
    pub rules: Vec<RuleRecord>,
    pub next_token: Option<String>,
}

/// Target attached to a rule; `input` is the payload delivered on fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTarget {
    pub id: String,
    pub arn: String,
    pub input: Option<String>,
}

/// Identity of the credentials in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}
