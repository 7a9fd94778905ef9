// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake job service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{JobService, ListQuery};
use crate::error::RemoteError;
use crate::scripted::ScriptedFailures;
use async_trait::async_trait;
use nbrun_core::{JobName, JobPage, JobRecord, JobSpec, JobStatus, JobSummary};
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded job service call
#[derive(Debug, Clone, PartialEq)]
pub enum JobCall {
    Submit { name: JobName },
    Describe { name: JobName },
    List { page_token: Option<String> },
    Stop { name: JobName },
}

#[derive(Default)]
struct FakeJobState {
    /// Oldest first; listings reverse it.
    jobs: Vec<JobRecord>,
    calls: Vec<JobCall>,
    failures: ScriptedFailures,
}

/// In-memory job service.
///
/// Failures can be queued per job (`describe:<name>`) or per operation
/// (`describe`, `list`, `submit`, `stop`); each queued error is returned
/// once before the call succeeds.
#[derive(Clone, Default)]
pub struct FakeJobService {
    inner: Arc<Mutex<FakeJobState>>,
}

impl FakeJobService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job as the newest one.
    pub fn add_job(&self, record: JobRecord) {
        self.inner.lock().jobs.push(record);
    }

    /// Replace the stored record for a job (matched by name).
    pub fn update_job(&self, record: JobRecord) {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.jobs.iter_mut().find(|j| j.name == record.name) {
            *existing = record;
        }
    }

    pub fn set_status(&self, name: &str, status: JobStatus) {
        let mut inner = self.inner.lock();
        if let Some(job) = inner.jobs.iter_mut().find(|j| j.name == name) {
            job.status = status;
        }
    }

    pub fn get_job(&self, name: &str) -> Option<JobRecord> {
        self.inner.lock().jobs.iter().find(|j| j.name == name).cloned()
    }

    /// Queue an error for every describe call.
    pub fn fail_describe(&self, error: RemoteError) {
        self.inner.lock().failures.push("describe", error);
    }

    /// Queue an error for describe calls of one job.
    pub fn fail_describe_of(&self, name: &str, error: RemoteError) {
        self.inner
            .lock()
            .failures
            .push(format!("describe:{name}"), error);
    }

    /// Queue `n` throttling errors for describe calls of one job.
    pub fn throttle_describe_of(&self, name: &str, n: usize) {
        for _ in 0..n {
            self.fail_describe_of(name, RemoteError::Throttled("Rate exceeded".to_string()));
        }
    }

    pub fn fail_list(&self, error: RemoteError) {
        self.inner.lock().failures.push("list", error);
    }

    pub fn fail_submit(&self, error: RemoteError) {
        self.inner.lock().failures.push("submit", error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<JobCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of describe calls made for one job.
    pub fn describe_count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, JobCall::Describe { name: n } if n == name))
            .count()
    }

    pub fn list_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, JobCall::List { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }
}

#[async_trait]
impl JobService for FakeJobService {
    async fn submit(&self, spec: &JobSpec) -> Result<JobName, RemoteError> {
        let mut inner = self.inner.lock();
        let name = spec.processing_job_name.clone();
        inner.calls.push(JobCall::Submit { name: name.clone() });
        if let Some(err) = inner.failures.take("submit") {
            return Err(err);
        }

        let record = JobRecord {
            name: name.clone(),
            status: JobStatus::InProgress,
            failure_reason: None,
            created_at: Some(chrono::Utc::now()),
            started_at: None,
            ended_at: None,
            environment: spec.environment.clone(),
            output_prefix: spec
                .processing_output_config
                .outputs
                .first()
                .map(|o| o.s3_output.s3_uri.clone()),
            input_location: spec
                .processing_inputs
                .first()
                .map(|i| i.s3_input.s3_uri.clone())
                .unwrap_or_default(),
            image: spec.app_specification.image_uri.clone(),
            instance_type: spec.processing_resources.cluster_config.instance_type.clone(),
            role_arn: spec.role_arn.clone(),
        };
        inner.jobs.push(record);
        Ok(name)
    }

    async fn describe(&self, job: &JobName) -> Result<JobRecord, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(JobCall::Describe { name: job.clone() });
        if let Some(err) = inner.failures.take(&format!("describe:{job}")) {
            return Err(err);
        }
        if let Some(err) = inner.failures.take("describe") {
            return Err(err);
        }
        inner
            .jobs
            .iter()
            .find(|j| &j.name == job)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("Could not find job {job}")))
    }

    async fn list(&self, query: &ListQuery) -> Result<JobPage, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(JobCall::List {
            page_token: query.page_token.clone(),
        });
        if let Some(err) = inner.failures.take("list") {
            return Err(err);
        }

        let matching: Vec<JobSummary> = inner
            .jobs
            .iter()
            .rev()
            .filter(|j| {
                query
                    .name_contains
                    .as_deref()
                    .map_or(true, |f| j.name.as_str().contains(f))
            })
            .map(|j| JobSummary {
                name: j.name.clone(),
                created_at: j.created_at,
                status: Some(j.status),
            })
            .collect();

        let start: usize = query
            .page_token
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let size = query.max_results.max(1) as usize;
        let end = (start + size).min(matching.len());
        let summaries = matching.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_token = (end < matching.len()).then(|| end.to_string());
        Ok(JobPage {
            summaries,
            next_token,
        })
    }

    async fn stop(&self, job: &JobName) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(JobCall::Stop { name: job.clone() });
        if let Some(err) = inner.failures.take("stop") {
            return Err(err);
        }
        match inner.jobs.iter_mut().find(|j| &j.name == job) {
            Some(record) => {
                if !record.status.is_terminal() {
                    record.status = JobStatus::Stopping;
                }
                Ok(())
            }
            None => Err(RemoteError::NotFound(format!("Could not find job {job}"))),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
