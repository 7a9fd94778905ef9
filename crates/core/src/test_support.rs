// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::record::{JobRecord, JobSummary, RuleRecord, ENV_NOTEBOOK_NAME, ENV_OUTPUT, ENV_PARAMS};
use crate::{JobName, JobStatus};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "us-west-2";

/// Fixed base instant; job `n` is created `n` minutes after it.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 10, 21, 20, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn minutes(n: i64) -> DateTime<Utc> {
    epoch() + Duration::minutes(n)
}

/// `papermill-nb<n>`
pub fn job_name(n: usize) -> JobName {
    JobName::new(format!("papermill-nb{n}"))
}

// ── Record factories ────────────────────────────────────────────────────────

/// A job record for notebook job `n` in the given status.
///
/// Terminal records carry start and end times; Failed records carry a
/// generic failure reason.
pub fn job_record(n: usize, status: JobStatus) -> JobRecord {
    let mut environment = BTreeMap::new();
    environment.insert(ENV_NOTEBOOK_NAME.to_string(), format!("nb{n}.ipynb"));
    environment.insert(
        ENV_OUTPUT.to_string(),
        format!("/opt/ml/processing/output/nb{n}-out.ipynb"),
    );
    environment.insert(ENV_PARAMS.to_string(), r#"{"n": 1}"#.to_string());

    let created = minutes(n as i64);
    let (started_at, ended_at) = if status.is_terminal() {
        (Some(created + Duration::seconds(30)), Some(created + Duration::seconds(90)))
    } else {
        (None, None)
    };

    JobRecord {
        name: job_name(n),
        status,
        failure_reason: (status == JobStatus::Failed).then(|| "exit code 1".to_string()),
        created_at: Some(created),
        started_at,
        ended_at,
        environment,
        output_prefix: Some(format!("s3://sagemaker-{REGION}-{ACCOUNT}/papermill_output")),
        input_location: format!(
            "s3://sagemaker-{REGION}-{ACCOUNT}/papermill_input/notebook-{n}.ipynb"
        ),
        image: format!("{ACCOUNT}.dkr.ecr.{REGION}.amazonaws.com/notebook-runner:latest"),
        instance_type: "ml.m5.large".to_string(),
        role_arn: format!("arn:aws:iam::{ACCOUNT}:role/BasicExecuteNotebookRole-{REGION}"),
    }
}

/// A failed record with a specific failure reason.
pub fn failed_record(n: usize, reason: &str) -> JobRecord {
    JobRecord {
        failure_reason: Some(reason.to_string()),
        ..job_record(n, JobStatus::Failed)
    }
}

/// A record for a job this tool did not create.
pub fn foreign_record(name: &str, status: JobStatus) -> JobRecord {
    JobRecord {
        name: JobName::new(name),
        environment: BTreeMap::new(),
        ..job_record(0, status)
    }
}

pub fn summary(record: &JobRecord) -> JobSummary {
    JobSummary {
        name: record.name.clone(),
        created_at: record.created_at,
        status: Some(record.status),
    }
}

pub fn rule_record(name: &str, schedule: Option<&str>) -> RuleRecord {
    RuleRecord {
        name: format!("RunNotebook-{name}"),
        arn: Some(format!(
            "arn:aws:events:{REGION}:{ACCOUNT}:rule/RunNotebook-{name}"
        )),
        schedule_expression: schedule.map(str::to_string),
        event_pattern: None,
        state: "ENABLED".to_string(),
        description: None,
    }
}
