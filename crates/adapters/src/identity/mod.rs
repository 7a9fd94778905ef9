// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity and account lookups

use crate::error::RemoteError;
use async_trait::async_trait;
use nbrun_core::CallerIdentity;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeIdentityService;

/// Adapter for identity queries
#[async_trait]
pub trait IdentityService: Clone + Send + Sync + 'static {
    async fn caller_identity(&self) -> Result<CallerIdentity, RemoteError>;

    /// Full ARN (including path) of a named role.
    async fn role_arn(&self, role_name: &str) -> Result<String, RemoteError>;

    /// Region calls are made against, if one is configured.
    async fn region(&self) -> Result<Option<String>, RemoteError>;
}
