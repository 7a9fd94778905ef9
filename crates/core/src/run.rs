// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run descriptions: the user-facing view of one notebook job.

use crate::abbrev::{abbreviate_image, abbreviate_role};
use crate::id::JobName;
use crate::naming::basename;
use crate::params::param_pairs;
use crate::record::{JobRecord, ENV_NOTEBOOK_NAME, ENV_OUTPUT, ENV_PARAMS, ENV_RULE};
use crate::status::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one notebook run at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDescription {
    pub job_id: JobName,
    /// Empty when the job did not record a notebook name.
    pub notebook_name: String,
    /// Empty unless the run was started by a schedule rule.
    pub rule_name: String,
    /// Parameters in their serialized (JSON) form.
    pub parameters: String,
    pub status: JobStatus,
    /// Set only when `status` is Failed.
    pub failure_reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<u64>,
    /// Set only when `status` is Completed.
    pub result_location: Option<String>,
    pub input_location: String,
    pub image: String,
    pub instance_type: String,
    pub role: String,
}

impl RunDescription {
    pub fn from_record(record: JobRecord) -> Self {
        let failure_reason = match record.status {
            JobStatus::Failed => record.failure_reason.clone(),
            _ => None,
        };
        let result_location = match record.status {
            JobStatus::Completed => result_location(&record),
            _ => None,
        };
        let elapsed_ms = elapsed_ms(record.started_at, record.ended_at);
        let env = |key: &str| record.env(key).unwrap_or_default().to_string();

        Self {
            notebook_name: env(ENV_NOTEBOOK_NAME),
            rule_name: env(ENV_RULE),
            parameters: env(ENV_PARAMS),
            job_id: record.name,
            status: record.status,
            failure_reason,
            created_at: record.created_at,
            started_at: record.started_at,
            ended_at: record.ended_at,
            elapsed_ms,
            result_location,
            input_location: record.input_location,
            image: abbreviate_image(&record.image),
            instance_type: record.instance_type,
            role: abbreviate_role(&record.role_arn),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Overwrite the fields that change while a job runs.
    ///
    /// Identity fields (job, notebook, rule, parameters, input, image,
    /// instance, role) are fixed at submission and left alone.
    pub fn refresh_from(&mut self, fresh: RunDescription) {
        self.status = fresh.status;
        self.failure_reason = fresh.failure_reason;
        self.started_at = fresh.started_at;
        self.ended_at = fresh.ended_at;
        self.elapsed_ms = fresh.elapsed_ms;
        self.result_location = fresh.result_location;
    }

    /// Parameters as `name=value` strings.
    pub fn parameter_pairs(&self) -> Vec<String> {
        param_pairs(&self.parameters)
    }
}

/// `<output prefix>/<basename of the configured output file>`.
fn result_location(record: &JobRecord) -> Option<String> {
    let prefix = record.output_prefix.as_deref()?;
    let output = record.env(ENV_OUTPUT)?;
    Some(format!("{}/{}", prefix, basename(output)))
}

fn elapsed_ms(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<u64> {
    let (start, end) = (start?, end?);
    u64::try_from((end - start).num_milliseconds()).ok()
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
