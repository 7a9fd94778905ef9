// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::config::Config;
use crate::runner::{Runner, RunnerDeps};
use nbrun_adapters::{
    FakeEventService, FakeFunctionService, FakeIdentityService, FakeJobService, FakeObjectStore,
};

/// Convenience alias for the fully-faked runner.
pub(crate) type TestRunner = Runner<
    FakeJobService,
    FakeEventService,
    FakeFunctionService,
    FakeObjectStore,
    FakeIdentityService,
>;

/// Test context holding the runner and handles to every fake behind it.
pub(crate) struct TestContext {
    pub runner: TestRunner,
    pub jobs: FakeJobService,
    pub events: FakeEventService,
    pub functions: FakeFunctionService,
    pub store: FakeObjectStore,
    pub identity: FakeIdentityService,
}

/// Defaults with short delays.
pub(crate) fn test_config() -> Config {
    Config {
        throttle_delay_ms: 10,
        poll_interval_ms: 10,
        ..Config::default()
    }
}

pub(crate) fn setup() -> TestContext {
    setup_with_config(test_config())
}

pub(crate) fn setup_with_config(config: Config) -> TestContext {
    let jobs = FakeJobService::new();
    let events = FakeEventService::new();
    let functions = FakeFunctionService::new();
    let store = FakeObjectStore::new();
    let identity = FakeIdentityService::new();
    let runner = Runner::new(
        RunnerDeps {
            jobs: jobs.clone(),
            events: events.clone(),
            functions: functions.clone(),
            store: store.clone(),
            identity: identity.clone(),
        },
        config,
    );
    TestContext {
        runner,
        jobs,
        events,
        functions,
        store,
        identity,
    }
}

/// Default bucket of the fake account.
pub(crate) const BUCKET: &str = "sagemaker-us-west-2-123456789012";
