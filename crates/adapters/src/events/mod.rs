// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote event (scheduling) service

use crate::error::RemoteError;
use async_trait::async_trait;
use nbrun_core::{RulePage, RuleRecord, RuleTarget, Trigger};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{EventCall, FakeEventService};

/// Adapter for the remote event service that stores schedule rules
#[async_trait]
pub trait EventService: Clone + Send + Sync + 'static {
    /// Create or update a rule; returns the rule's ARN.
    async fn put_rule(
        &self,
        name: &str,
        trigger: &Trigger,
        description: &str,
    ) -> Result<String, RemoteError>;

    async fn delete_rule(&self, name: &str) -> Result<(), RemoteError>;

    async fn describe_rule(&self, name: &str) -> Result<RuleRecord, RemoteError>;

    /// One page of rules whose names start with `prefix`.
    async fn list_rules(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<RulePage, RemoteError>;

    async fn put_targets(&self, rule: &str, targets: &[RuleTarget]) -> Result<(), RemoteError>;

    async fn remove_targets(&self, rule: &str, ids: &[&str]) -> Result<(), RemoteError>;

    async fn list_targets(&self, rule: &str) -> Result<Vec<RuleTarget>, RemoteError>;
}
