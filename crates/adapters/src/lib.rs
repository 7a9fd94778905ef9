// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the remote job, event, function, storage and identity services

pub mod aws;
mod env;
pub mod error;
pub mod events;
pub mod functions;
pub mod identity;
pub mod jobs;
#[cfg(any(test, feature = "test-support"))]
mod scripted;
pub mod storage;
pub mod subprocess;
pub mod traced;

pub use aws::{
    AwsCli, AwsEventService, AwsFunctionService, AwsIdentityService, AwsJobService,
    AwsObjectStore,
};
pub use error::{classify_cli_error, RemoteError};
pub use events::EventService;
pub use functions::{FunctionService, PermissionGrant};
pub use identity::IdentityService;
pub use jobs::{JobService, ListQuery};
pub use storage::{parse_s3_uri, s3_uri, ObjectStore};
pub use traced::{TracedEventService, TracedFunctionService, TracedJobService};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use events::{EventCall, FakeEventService};
#[cfg(any(test, feature = "test-support"))]
pub use functions::{FakeFunctionService, FunctionCall};
#[cfg(any(test, feature = "test-support"))]
pub use identity::FakeIdentityService;
#[cfg(any(test, feature = "test-support"))]
pub use jobs::{FakeJobService, JobCall};
#[cfg(any(test, feature = "test-support"))]
pub use storage::{FakeObjectStore, StoreCall};
