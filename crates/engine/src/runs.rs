// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-off run queries and result transfer.

use crate::discovery::PAGE_SIZE;
use crate::error::EngineError;
use crate::runner::Runner;
use chrono::Utc;
use nbrun_adapters::{
    parse_s3_uri, s3_uri, EventService, FunctionService, IdentityService, JobService, ListQuery,
    ObjectStore,
};
use nbrun_core::naming::{basename, upload_key};
use nbrun_core::record::ENV_OUTPUT;
use nbrun_core::{JobName, JobStatus, RunDescription, JOB_PREFIX};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which runs `describe_runs` returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    /// Stop after this many matches; 0 means no limit.
    pub max: usize,
    /// Only runs of this notebook (basename).
    pub notebook: Option<String>,
    /// Only runs started by this schedule rule.
    pub rule: Option<String>,
}

impl RunFilter {
    fn matches(&self, run: &RunDescription) -> bool {
        self.notebook.as_ref().map_or(true, |n| *n == run.notebook_name)
            && self.rule.as_ref().map_or(true, |r| *r == run.rule_name)
    }
}

/// Where a job's result notebook is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultObject {
    pub bucket: String,
    pub key: String,
    pub file_name: String,
}

impl<J, E, F, S, I> Runner<J, E, F, S, I>
where
    J: JobService,
    E: EventService,
    F: FunctionService,
    S: ObjectStore,
    I: IdentityService,
{
    pub async fn describe_run(&self, job: &JobName) -> Result<RunDescription, EngineError> {
        self.fetcher.fetch(job).await
    }

    /// Describe runs newest first without tracking them.
    pub async fn describe_runs(&self, filter: &RunFilter) -> Result<Vec<RunDescription>, EngineError> {
        let mut runs = Vec::new();
        let mut query = ListQuery {
            name_contains: Some(JOB_PREFIX.to_string()),
            max_results: PAGE_SIZE,
            page_token: None,
        };
        loop {
            let page = self.fetcher.list(&query).await?;
            for summary in page.summaries {
                if !summary.name.is_notebook_job() {
                    continue;
                }
                let run = self.fetcher.fetch(&summary.name).await?;
                if !filter.matches(&run) {
                    continue;
                }
                runs.push(run);
                if filter.max > 0 && runs.len() == filter.max {
                    return Ok(runs);
                }
            }
            match page.next_token {
                Some(token) => query.page_token = Some(token),
                None => return Ok(runs),
            }
        }
    }

    /// Poll a job until it leaves InProgress.
    ///
    /// `on_poll` sees every description fetched, including the last.
    pub async fn wait_for_complete(
        &self,
        job: &JobName,
        interval: Duration,
        mut on_poll: impl FnMut(&RunDescription) + Send,
    ) -> Result<RunDescription, EngineError> {
        loop {
            let run = self.fetcher.fetch(job).await?;
            on_poll(&run);
            if run.status != JobStatus::InProgress {
                tracing::debug!(%job, status = %run.status, "job left InProgress");
                return Ok(run);
            }
            tokio::time::sleep(interval).await;
        }
    }

    pub async fn stop_run(&self, job: &JobName) -> Result<(), EngineError> {
        self.fetcher.jobs().stop(job).await?;
        tracing::info!(%job, "stop requested");
        Ok(())
    }

    /// Storage location of a job's executed notebook.
    pub async fn result_object(&self, job: &JobName) -> Result<ResultObject, EngineError> {
        let record = self.fetcher.record(job).await?;
        let prefix = record
            .output_prefix
            .as_deref()
            .ok_or_else(|| EngineError::NotFound(format!("job {job} has no output location")))?;
        let output = record
            .env(ENV_OUTPUT)
            .ok_or_else(|| EngineError::NotFound(format!("job {job} has no output notebook")))?;
        let file_name = basename(output).to_string();
        let location = format!("{}/{}", prefix.trim_end_matches('/'), file_name);
        let (bucket, key) = parse_s3_uri(&location).ok_or_else(|| {
            EngineError::configuration(format!("output location is not an s3 uri: {location}"))
        })?;
        Ok(ResultObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            file_name,
        })
    }

    /// Contents of a job's executed notebook.
    pub async fn fetch_output(&self, job: &JobName) -> Result<Vec<u8>, EngineError> {
        let object = self.result_object(job).await?;
        Ok(self.session.store().download(&object.bucket, &object.key).await?)
    }

    /// Save a job's executed notebook into `dir`, creating it if needed.
    pub async fn download_notebook(&self, job: &JobName, dir: &Path) -> Result<PathBuf, EngineError> {
        let object = self.result_object(job).await?;
        let bytes = self.session.store().download(&object.bucket, &object.key).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&object.file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(%job, path = %path.display(), "downloaded result notebook");
        Ok(path)
    }

    /// Store a notebook in the default bucket; returns its `s3://` URI.
    pub async fn upload_notebook(&self, bytes: Vec<u8>) -> Result<String, EngineError> {
        let bucket = self.session.default_bucket().await?;
        let key = upload_key(Utc::now());
        self.session.store().upload(bytes, bucket, &key).await?;
        let uri = s3_uri(bucket, &key);
        tracing::info!(%uri, "uploaded notebook");
        Ok(uri)
    }
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
