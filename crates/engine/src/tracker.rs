// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracked window of recent runs, refreshed incrementally.
//!
//! Only jobs that can still change (non-terminal ones) are re-described
//! on each refresh; new jobs are discovered newest-first down to the
//! boundary left by the last refresh whose discovery ran to completion.

use crate::discovery::{DiscoveryCursor, NewJobs};
use crate::error::EngineError;
use crate::fetcher::Fetcher;
use nbrun_adapters::JobService;
use nbrun_core::{JobName, JobSummary, RunDescription};
use std::collections::HashSet;
use tokio::task::JoinSet;

pub const DEFAULT_MAX_JOBS: usize = 20;

/// What one refresh changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub discovered: usize,
    pub evicted: usize,
    /// In-flight runs re-described.
    pub refreshed: usize,
    /// Runs that reached a terminal status during this refresh.
    pub finished: usize,
}

/// Window of the most recent notebook runs.
pub struct RunTracker<J> {
    fetcher: Fetcher<J>,
    max_jobs: usize,
    max_new_per_refresh: usize,
    /// Oldest first.
    window: Vec<RunDescription>,
    /// Exactly the window entries that are not terminal.
    in_progress: HashSet<JobName>,
    cursor: DiscoveryCursor,
}

impl<J: JobService> RunTracker<J> {
    pub fn new(fetcher: Fetcher<J>, max_jobs: usize) -> Self {
        Self {
            fetcher,
            max_jobs,
            max_new_per_refresh: max_jobs,
            window: Vec::new(),
            in_progress: HashSet::new(),
            cursor: DiscoveryCursor::default(),
        }
    }

    /// Cap on new descriptions fetched per refresh (default: `max_jobs`).
    ///
    /// Jobs past the cap are picked up by the following refreshes, since
    /// the discovery boundary only moves once a pass reaches it.
    pub fn with_max_new_per_refresh(mut self, limit: usize) -> Self {
        self.max_new_per_refresh = limit;
        self
    }

    /// Discover new runs, evict the oldest beyond capacity, then
    /// re-describe every run still in flight.
    ///
    /// On error the refresh stops; whatever it already applied stays.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, EngineError> {
        let mut outcome = RefreshOutcome::default();

        let mut batch = Vec::new();
        let discovered = self.discover(&mut batch).await;
        outcome.discovered = batch.len();
        self.append(batch);
        outcome.evicted = self.evict();
        discovered?;

        self.refresh_in_flight(&mut outcome).await?;
        tracing::debug!(
            discovered = outcome.discovered,
            evicted = outcome.evicted,
            refreshed = outcome.refreshed,
            finished = outcome.finished,
            tracked = self.window.len(),
            "refreshed runs"
        );
        Ok(outcome)
    }

    /// Fill `batch` (newest first) with descriptions of untracked notebook
    /// jobs.
    ///
    /// Jobs already in the window are passed over, so a pass that resumes
    /// below an earlier cut-short one only describes what it missed. Once
    /// the window would be full, anything older than its oldest run would be
    /// evicted straight away, so the pass ends there.
    async fn discover(&mut self, batch: &mut Vec<RunDescription>) -> Result<(), EngineError> {
        let mut stream = NewJobs::new(&self.fetcher, &mut self.cursor);
        while let Some(summary) = stream.next().await? {
            let tracked = self.window.iter().any(|r| r.job_id == summary.name);
            if tracked || !summary.name.is_notebook_job() {
                continue;
            }
            if self.window.len() + batch.len() >= self.max_jobs
                && older_than_all(&summary, &self.window, batch.as_slice())
            {
                break;
            }
            if batch.len() >= self.max_new_per_refresh {
                tracing::debug!(job = %summary.name, "new run cap reached");
                return Ok(());
            }
            tracing::debug!(job = %summary.name, "describing new job");
            batch.push(self.fetcher.fetch(&summary.name).await?);
        }
        stream.complete();
        Ok(())
    }

    /// Insert by creation time, keeping the window oldest first.
    fn append(&mut self, batch: Vec<RunDescription>) {
        for run in batch.into_iter().rev() {
            if !run.is_terminal() {
                self.in_progress.insert(run.job_id.clone());
            }
            let at = self.window.partition_point(|r| r.created_at <= run.created_at);
            self.window.insert(at, run);
        }
    }

    fn evict(&mut self) -> usize {
        let surplus = self.window.len().saturating_sub(self.max_jobs);
        for run in self.window.drain(..surplus) {
            self.in_progress.remove(&run.job_id);
        }
        surplus
    }

    async fn refresh_in_flight(&mut self, outcome: &mut RefreshOutcome) -> Result<(), EngineError> {
        let mut tasks = JoinSet::new();
        for job in self.in_progress.iter().cloned() {
            let fetcher = self.fetcher.clone();
            tasks.spawn(async move {
                tracing::debug!(%job, "describing in-progress job");
                let result = fetcher.fetch(&job).await;
                (job, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (job, result) = joined.map_err(|e| EngineError::Task(e.to_string()))?;
            let fresh = result?;
            outcome.refreshed += 1;
            if self.apply(&job, fresh) {
                outcome.finished += 1;
            }
        }
        Ok(())
    }

    /// Update a tracked run in place; true when it just became terminal.
    ///
    /// The window holds at most `max_jobs` runs, so a scan finds the entry.
    fn apply(&mut self, job: &JobName, fresh: RunDescription) -> bool {
        let terminal = fresh.is_terminal();
        if let Some(run) = self.window.iter_mut().find(|r| &r.job_id == job) {
            run.refresh_from(fresh);
        }
        terminal && self.in_progress.remove(job)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Run at `index`, newest first.
    pub fn get(&self, index: usize) -> Result<&RunDescription, EngineError> {
        let len = self.window.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        Ok(&self.window[len - 1 - index])
    }

    /// Tracked runs, newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RunDescription> + ExactSizeIterator {
        self.window.iter().rev()
    }

    pub fn in_progress_count(&self) -> usize {
        self.in_progress.len()
    }

    pub fn is_in_progress(&self, job: &JobName) -> bool {
        self.in_progress.contains(job)
    }

    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }
}

/// True when `summary` is older than every run in `window` and `batch`.
fn older_than_all(
    summary: &JobSummary,
    window: &[RunDescription],
    batch: &[RunDescription],
) -> bool {
    let Some(created) = summary.created_at else {
        return false;
    };
    window
        .iter()
        .chain(batch)
        .all(|r| r.created_at.is_some_and(|at| created < at))
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
