// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule rules: remote triggers that submit notebook runs.

use crate::abbrev::{abbreviate_image, abbreviate_role};
use crate::id::RuleName;
use crate::params::Parameters;
use crate::record::RuleRecord;
use crate::submission::{ConfigError, SubmissionRequest};
use serde::{Deserialize, Serialize};

/// Prefix of every rule created by this tool.
pub const RULE_PREFIX: &str = "RunNotebook-";

/// Id of the single target attached to each rule.
pub const TARGET_ID: &str = "Default";

/// What fires a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// `cron(...)` or `rate(...)` expression.
    Schedule(String),
    /// Event pattern JSON.
    EventPattern(String),
}

impl Trigger {
    /// Exactly one of a schedule expression or an event pattern.
    pub fn from_options(
        schedule: Option<String>,
        event_pattern: Option<String>,
    ) -> Result<Self, ConfigError> {
        match (schedule, event_pattern) {
            (Some(expr), None) => Ok(Trigger::Schedule(expr)),
            (None, Some(pattern)) => Ok(Trigger::EventPattern(pattern)),
            (None, None) => Err(ConfigError::MissingTrigger),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingTrigger),
        }
    }
}

/// A schedule rule joined with the submission bundle stored on its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDescription {
    pub name: RuleName,
    pub notebook: String,
    pub parameters: Parameters,
    pub schedule: Option<String>,
    pub event_pattern: Option<String>,
    pub image: String,
    pub instance_type: String,
    pub role: String,
    pub state: String,
    pub input_path: String,
    pub output_prefix: String,
}

impl ScheduleDescription {
    /// Describe a rule. A rule without a readable target (a half-deleted
    /// rule, say) yields empty submission fields.
    pub fn new(rule: &RuleRecord, bundle: Option<SubmissionRequest>) -> Self {
        let name = RuleName::from_prefixed(&rule.name).unwrap_or_else(|| RuleName::new(&rule.name));
        let bundle = bundle.unwrap_or_default();
        Self {
            name,
            notebook: bundle.notebook,
            parameters: bundle.parameters,
            schedule: rule.schedule_expression.clone(),
            event_pattern: rule.event_pattern.clone(),
            image: abbreviate_image(&bundle.image),
            instance_type: bundle.instance_type,
            role: abbreviate_role(&bundle.role),
            state: rule.state.clone(),
            input_path: bundle.input_path,
            output_prefix: bundle.output_prefix.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
