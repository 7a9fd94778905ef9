// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newest-first discovery of jobs created since the previous pass

use crate::error::EngineError;
use crate::fetcher::Fetcher;
use nbrun_adapters::{JobService, ListQuery};
use nbrun_core::{JobName, JobSummary};
use std::collections::VecDeque;

/// Summaries requested per listing page.
pub const PAGE_SIZE: u32 = 30;

/// Boundary between passes.
///
/// Only a pass that runs to its end moves the boundary, to the newest job
/// that pass saw. A pass abandoned early (on an error, or at a fetch limit)
/// leaves it where it was, so the jobs it never reached are listed again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryCursor {
    boundary: Option<JobName>,
}

impl DiscoveryCursor {
    /// Newest job of the last completed pass; discovery stops here.
    pub fn boundary(&self) -> Option<&JobName> {
        self.boundary.as_ref()
    }
}

/// One discovery pass: a lazy, finite stream of summaries, newest first.
///
/// Pages are only requested when the previous one is used up. Call
/// [`NewJobs::complete`] once the pass is known to have covered every new
/// job; dropping the stream instead keeps the old boundary.
pub struct NewJobs<'a, J> {
    fetcher: &'a Fetcher<J>,
    cursor: &'a mut DiscoveryCursor,
    first_seen: Option<JobName>,
    buffered: VecDeque<JobSummary>,
    next_token: Option<String>,
    started: bool,
    done: bool,
}

impl<'a, J: JobService> NewJobs<'a, J> {
    pub fn new(fetcher: &'a Fetcher<J>, cursor: &'a mut DiscoveryCursor) -> Self {
        Self {
            fetcher,
            cursor,
            first_seen: None,
            buffered: VecDeque::new(),
            next_token: None,
            started: false,
            done: false,
        }
    }

    /// Next unseen summary, or `None` once the boundary or the end of the
    /// listing is reached.
    pub async fn next(&mut self) -> Result<Option<JobSummary>, EngineError> {
        loop {
            if self.done {
                return Ok(None);
            }
            if let Some(summary) = self.buffered.pop_front() {
                if self.first_seen.is_none() {
                    self.first_seen = Some(summary.name.clone());
                }
                if self.cursor.boundary() == Some(&summary.name) {
                    self.done = true;
                    return Ok(None);
                }
                return Ok(Some(summary));
            }
            if self.started && self.next_token.is_none() {
                self.done = true;
                continue;
            }

            let page = self
                .fetcher
                .list(&ListQuery {
                    name_contains: None,
                    max_results: PAGE_SIZE,
                    page_token: self.next_token.take(),
                })
                .await?;
            self.started = true;
            self.next_token = page.next_token;
            self.buffered = page.summaries.into();
        }
    }

    /// End the pass, moving the boundary to the newest job it saw.
    pub fn complete(self) {
        if let Some(newest) = self.first_seen {
            self.cursor.boundary = Some(newest);
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
