// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote batch job service

use crate::error::RemoteError;
use async_trait::async_trait;
use nbrun_core::{JobName, JobPage, JobRecord, JobSpec};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeJobService, JobCall};

/// One page request against the job listing, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Only jobs whose name contains this substring.
    pub name_contains: Option<String>,
    pub max_results: u32,
    pub page_token: Option<String>,
}

/// Adapter for the remote processing job service
#[async_trait]
pub trait JobService: Clone + Send + Sync + 'static {
    /// Create a job; returns its name.
    async fn submit(&self, spec: &JobSpec) -> Result<JobName, RemoteError>;

    /// Full description of one job.
    async fn describe(&self, job: &JobName) -> Result<JobRecord, RemoteError>;

    /// One page of job summaries, newest first.
    async fn list(&self, query: &ListQuery) -> Result<JobPage, RemoteError>;

    /// Ask the service to stop a running job.
    async fn stop(&self, job: &JobName) -> Result<(), RemoteError>;
}
