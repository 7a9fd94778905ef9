// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point for notebook run operations.
//!
//! The operations themselves live in `runs`, `invoke`, `submit` and
//! `schedule`, each adding an `impl` block to [`Runner`].

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::session::Session;
use crate::tracker::RunTracker;
use nbrun_adapters::{
    AwsEventService, AwsFunctionService, AwsIdentityService, AwsJobService, AwsObjectStore,
    EventService, FunctionService, IdentityService, JobService, ObjectStore, TracedEventService,
    TracedFunctionService, TracedJobService,
};

/// Remote service dependencies
pub struct RunnerDeps<J, E, F, S, I> {
    pub jobs: J,
    pub events: E,
    pub functions: F,
    pub store: S,
    pub identity: I,
}

/// Runs, submits and schedules notebooks against one set of services.
pub struct Runner<J, E, F, S, I> {
    pub(crate) fetcher: Fetcher<J>,
    pub(crate) events: E,
    pub(crate) functions: F,
    pub(crate) session: Session<I, S>,
    pub(crate) config: Config,
}

/// Runner wired to the AWS CLI, with remote calls traced.
pub type AwsRunner = Runner<
    TracedJobService<AwsJobService>,
    TracedEventService<AwsEventService>,
    TracedFunctionService<AwsFunctionService>,
    AwsObjectStore,
    AwsIdentityService,
>;

impl<J, E, F, S, I> Runner<J, E, F, S, I>
where
    J: JobService,
    E: EventService,
    F: FunctionService,
    S: ObjectStore,
    I: IdentityService,
{
    pub fn new(deps: RunnerDeps<J, E, F, S, I>, config: Config) -> Self {
        let fetcher = Fetcher::new(deps.jobs).with_throttle_delay(config.throttle_delay());
        let session = Session::new(deps.identity, deps.store)
            .with_region(config.region.clone())
            .with_bucket(config.bucket.clone());
        Self {
            fetcher,
            events: deps.events,
            functions: deps.functions,
            session,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session<I, S> {
        &self.session
    }

    pub fn fetcher(&self) -> &Fetcher<J> {
        &self.fetcher
    }

    /// A fresh tracker sized from the configuration.
    pub fn tracker(&self) -> RunTracker<J> {
        RunTracker::new(self.fetcher.clone(), self.config.max_jobs)
            .with_max_new_per_refresh(self.config.new_per_refresh())
    }
}

impl AwsRunner {
    pub fn from_config(config: Config) -> Self {
        let cli = config.aws_cli();
        let deps = RunnerDeps {
            jobs: TracedJobService::new(AwsJobService::new(cli.clone())),
            events: TracedEventService::new(AwsEventService::new(cli.clone())),
            functions: TracedFunctionService::new(AwsFunctionService::new(cli.clone())),
            store: AwsObjectStore::new(cli.clone()),
            identity: AwsIdentityService::new(cli),
        };
        Runner::new(deps, config)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
