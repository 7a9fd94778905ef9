// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared server state.

use std::sync::Arc;

use nbrun_adapters::{
    AwsEventService, AwsFunctionService, AwsIdentityService, AwsJobService, AwsObjectStore,
    EventService, FunctionService, IdentityService, JobService, ObjectStore, TracedEventService,
    TracedFunctionService, TracedJobService,
};
use nbrun_engine::{Runner, RunTracker};
use tokio::sync::Mutex;

/// The set of remote services a server runs against.
pub trait Services: Send + Sync + 'static {
    type Jobs: JobService;
    type Events: EventService;
    type Functions: FunctionService;
    type Store: ObjectStore;
    type Identity: IdentityService;
}

pub type ServiceRunner<B> = Runner<
    <B as Services>::Jobs,
    <B as Services>::Events,
    <B as Services>::Functions,
    <B as Services>::Store,
    <B as Services>::Identity,
>;

/// Services reached through the AWS CLI.
pub struct AwsServices;

impl Services for AwsServices {
    type Jobs = TracedJobService<AwsJobService>;
    type Events = TracedEventService<AwsEventService>;
    type Functions = TracedFunctionService<AwsFunctionService>;
    type Store = AwsObjectStore;
    type Identity = AwsIdentityService;
}

/// Runner plus the one tracker every `GET runs` refreshes.
pub struct AppState<B: Services> {
    pub runner: Arc<ServiceRunner<B>>,
    pub tracker: Arc<Mutex<RunTracker<B::Jobs>>>,
}

impl<B: Services> AppState<B> {
    pub fn new(runner: ServiceRunner<B>) -> Self {
        let tracker = runner.tracker();
        Self {
            runner: Arc::new(runner),
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}

impl<B: Services> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            tracker: Arc::clone(&self.tracker),
        }
    }
}
