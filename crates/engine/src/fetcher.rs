// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job description fetching with throttle retry

use crate::error::EngineError;
use nbrun_adapters::{JobService, ListQuery, RemoteError};
use nbrun_core::{JobName, JobPage, JobRecord, RunDescription};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_secs(1);

/// Retry `op` for as long as the service answers "throttled", sleeping a
/// fixed delay between attempts. Any other outcome is returned as-is.
pub(crate) async fn retry_throttled<T, F, Fut>(
    delay: Duration,
    what: &str,
    mut op: F,
) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    loop {
        match op().await {
            Err(RemoteError::Throttled(message)) => {
                tracing::debug!(what, %message, "throttled; retrying");
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}

/// Reads job state from the job service.
#[derive(Clone)]
pub struct Fetcher<J> {
    jobs: J,
    throttle_delay: Duration,
}

impl<J: JobService> Fetcher<J> {
    pub fn new(jobs: J) -> Self {
        Self {
            jobs,
            throttle_delay: DEFAULT_THROTTLE_DELAY,
        }
    }

    pub fn with_throttle_delay(mut self, delay: Duration) -> Self {
        self.throttle_delay = delay;
        self
    }

    pub fn jobs(&self) -> &J {
        &self.jobs
    }

    /// Current description of one run.
    pub async fn fetch(&self, job: &JobName) -> Result<RunDescription, EngineError> {
        Ok(RunDescription::from_record(self.record(job).await?))
    }

    /// Raw job record, for callers that need fields the description drops.
    pub async fn record(&self, job: &JobName) -> Result<JobRecord, EngineError> {
        let record = retry_throttled(self.throttle_delay, job.as_str(), || {
            self.jobs.describe(job)
        })
        .await?;
        Ok(record)
    }

    /// One listing page.
    pub async fn list(&self, query: &ListQuery) -> Result<JobPage, EngineError> {
        let page = retry_throttled(self.throttle_delay, "list", || self.jobs.list(query)).await?;
        Ok(page)
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
