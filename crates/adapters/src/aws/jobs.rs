// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processing jobs via `aws sagemaker`

use super::AwsCli;
use crate::error::RemoteError;
use crate::jobs::{JobService, ListQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nbrun_core::{JobName, JobPage, JobRecord, JobSpec, JobStatus, JobSummary};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Default)]
pub struct AwsJobService {
    cli: AwsCli,
}

impl AwsJobService {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl JobService for AwsJobService {
    async fn submit(&self, spec: &JobSpec) -> Result<JobName, RemoteError> {
        let input = serde_json::to_string(spec)
            .map_err(|e| RemoteError::Decode(format!("job spec: {e}")))?;
        let created: CreateJobResponse = self
            .cli
            .json("sagemaker", "create-processing-job", &["--cli-input-json", &input])
            .await?;
        Ok(job_name_from_arn(&created.processing_job_arn))
    }

    async fn describe(&self, job: &JobName) -> Result<JobRecord, RemoteError> {
        let desc: DescribeJobResponse = self
            .cli
            .json(
                "sagemaker",
                "describe-processing-job",
                &["--processing-job-name", job.as_str()],
            )
            .await?;
        Ok(desc.into_record())
    }

    async fn list(&self, query: &ListQuery) -> Result<JobPage, RemoteError> {
        let mut args = vec![
            "--no-paginate".to_string(),
            "--sort-by".to_string(),
            "CreationTime".to_string(),
            "--sort-order".to_string(),
            "Descending".to_string(),
            "--max-results".to_string(),
            query.max_results.to_string(),
        ];
        if let Some(filter) = &query.name_contains {
            args.extend(["--name-contains".to_string(), filter.clone()]);
        }
        if let Some(token) = &query.page_token {
            args.extend(["--next-token".to_string(), token.clone()]);
        }
        let page: ListJobsResponse = self
            .cli
            .json("sagemaker", "list-processing-jobs", &args)
            .await?;
        Ok(JobPage {
            summaries: page
                .processing_job_summaries
                .into_iter()
                .map(|s| JobSummary {
                    name: JobName::new(s.processing_job_name),
                    created_at: s.creation_time,
                    status: s.processing_job_status,
                })
                .collect(),
            next_token: page.next_token.filter(|t| !t.is_empty()),
        })
    }

    async fn stop(&self, job: &JobName) -> Result<(), RemoteError> {
        self.cli
            .json(
                "sagemaker",
                "stop-processing-job",
                &["--processing-job-name", job.as_str()],
            )
            .await
    }
}

/// The job name is the last path segment of its ARN.
fn job_name_from_arn(arn: &str) -> JobName {
    JobName::new(arn.rsplit('/').next().unwrap_or(arn))
}

// ── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateJobResponse {
    processing_job_arn: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListJobsResponse {
    #[serde(default)]
    processing_job_summaries: Vec<SummaryWire>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SummaryWire {
    processing_job_name: String,
    creation_time: Option<DateTime<Utc>>,
    processing_job_status: Option<JobStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeJobResponse {
    processing_job_name: String,
    processing_job_status: JobStatus,
    failure_reason: Option<String>,
    creation_time: Option<DateTime<Utc>>,
    processing_start_time: Option<DateTime<Utc>>,
    processing_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    environment: BTreeMap<String, String>,
    processing_output_config: Option<OutputConfigWire>,
    #[serde(default)]
    processing_inputs: Vec<InputWire>,
    app_specification: Option<AppSpecWire>,
    processing_resources: Option<ResourcesWire>,
    #[serde(default)]
    role_arn: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OutputConfigWire {
    #[serde(default)]
    outputs: Vec<OutputWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OutputWire {
    s3_output: Option<S3UriWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InputWire {
    s3_input: Option<S3UriWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct S3UriWire {
    s3_uri: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AppSpecWire {
    image_uri: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourcesWire {
    cluster_config: ClusterWire,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ClusterWire {
    instance_type: String,
}

impl DescribeJobResponse {
    fn into_record(self) -> JobRecord {
        let output_prefix = self
            .processing_output_config
            .and_then(|c| c.outputs.into_iter().next())
            .and_then(|o| o.s3_output)
            .map(|s| s.s3_uri);
        let input_location = self
            .processing_inputs
            .into_iter()
            .next()
            .and_then(|i| i.s3_input)
            .map(|s| s.s3_uri)
            .unwrap_or_default();

        JobRecord {
            name: JobName::new(self.processing_job_name),
            status: self.processing_job_status,
            failure_reason: self.failure_reason,
            created_at: self.creation_time,
            started_at: self.processing_start_time,
            ended_at: self.processing_end_time,
            environment: self.environment,
            output_prefix,
            input_location,
            image: self.app_specification.map(|a| a.image_uri).unwrap_or_default(),
            instance_type: self
                .processing_resources
                .map(|r| r.cluster_config.instance_type)
                .unwrap_or_default(),
            role_arn: self.role_arn,
        }
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
