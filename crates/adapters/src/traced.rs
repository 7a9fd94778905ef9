// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::error::RemoteError;
use crate::events::EventService;
use crate::functions::{FunctionService, PermissionGrant};
use crate::jobs::{JobService, ListQuery};
use async_trait::async_trait;
use nbrun_core::{JobName, JobPage, JobRecord, JobSpec, RulePage, RuleRecord, RuleTarget, Trigger};
use serde_json::Value;
use tracing::Instrument;

/// Wrapper that adds tracing to any JobService
#[derive(Clone)]
pub struct TracedJobService<J> {
    inner: J,
}

impl<J> TracedJobService<J> {
    pub fn new(inner: J) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<J: JobService> JobService for TracedJobService<J> {
    async fn submit(&self, spec: &JobSpec) -> Result<JobName, RemoteError> {
        async {
            tracing::info!(
                image = %spec.app_specification.image_uri,
                instance_type = %spec.processing_resources.cluster_config.instance_type,
                "starting"
            );
            let start = std::time::Instant::now();
            let result = self.inner.submit(spec).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(name) => tracing::info!(job = %name, elapsed_ms, "job created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "submit failed"),
            }
            result
        }
        .instrument(tracing::info_span!("jobs.submit", job = %spec.processing_job_name))
        .await
    }

    async fn describe(&self, job: &JobName) -> Result<JobRecord, RemoteError> {
        let result = self.inner.describe(job).await;
        match &result {
            Ok(record) => tracing::trace!(%job, status = %record.status, "described"),
            Err(e) if e.is_throttled() => tracing::debug!(%job, "describe throttled"),
            Err(e) => tracing::warn!(%job, error = %e, "describe failed"),
        }
        result
    }

    async fn list(&self, query: &ListQuery) -> Result<JobPage, RemoteError> {
        let span = tracing::info_span!(
            "jobs.list",
            name_contains = query.name_contains.as_deref().unwrap_or(""),
            paged = query.page_token.is_some()
        );
        async {
            let start = std::time::Instant::now();
            let result = self.inner.list(query).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(page) => tracing::debug!(
                    count = page.summaries.len(),
                    more = page.next_token.is_some(),
                    elapsed_ms,
                    "listed"
                ),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "list failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn stop(&self, job: &JobName) -> Result<(), RemoteError> {
        let result = self.inner.stop(job).await;
        tracing::info_span!("jobs.stop", %job).in_scope(|| match &result {
            Ok(()) => tracing::info!("stop requested"),
            Err(e) => tracing::error!(error = %e, "stop failed"),
        });
        result
    }
}

/// Wrapper that adds tracing to any EventService
#[derive(Clone)]
pub struct TracedEventService<E> {
    inner: E,
}

impl<E> TracedEventService<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E: EventService> EventService for TracedEventService<E> {
    async fn put_rule(
        &self,
        name: &str,
        trigger: &Trigger,
        description: &str,
    ) -> Result<String, RemoteError> {
        let result = self.inner.put_rule(name, trigger, description).await;
        tracing::info_span!("events.put_rule", name).in_scope(|| match &result {
            Ok(arn) => tracing::info!(%arn, "rule stored"),
            Err(e) => tracing::error!(error = %e, "put_rule failed"),
        });
        result
    }

    async fn delete_rule(&self, name: &str) -> Result<(), RemoteError> {
        let result = self.inner.delete_rule(name).await;
        tracing::info_span!("events.delete_rule", name).in_scope(|| match &result {
            Ok(()) => tracing::info!("rule deleted"),
            Err(e) => tracing::error!(error = %e, "delete_rule failed"),
        });
        result
    }

    async fn describe_rule(&self, name: &str) -> Result<RuleRecord, RemoteError> {
        let result = self.inner.describe_rule(name).await;
        if let Err(ref e) = result {
            tracing::warn!(name, error = %e, "describe_rule failed");
        }
        result
    }

    async fn list_rules(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<RulePage, RemoteError> {
        let result = self.inner.list_rules(prefix, page_token).await;
        match &result {
            Ok(page) => tracing::debug!(prefix, count = page.rules.len(), "listed rules"),
            Err(e) => tracing::error!(prefix, error = %e, "list_rules failed"),
        }
        result
    }

    async fn put_targets(&self, rule: &str, targets: &[RuleTarget]) -> Result<(), RemoteError> {
        let result = self.inner.put_targets(rule, targets).await;
        if let Err(ref e) = result {
            tracing::error!(rule, error = %e, "put_targets failed");
        }
        result
    }

    async fn remove_targets(&self, rule: &str, ids: &[&str]) -> Result<(), RemoteError> {
        let result = self.inner.remove_targets(rule, ids).await;
        if let Err(ref e) = result {
            tracing::error!(rule, error = %e, "remove_targets failed");
        }
        result
    }

    async fn list_targets(&self, rule: &str) -> Result<Vec<RuleTarget>, RemoteError> {
        self.inner.list_targets(rule).await
    }
}

/// Wrapper that adds tracing to any FunctionService
#[derive(Clone)]
pub struct TracedFunctionService<F> {
    inner: F,
}

impl<F> TracedFunctionService<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F: FunctionService> FunctionService for TracedFunctionService<F> {
    async fn invoke(&self, function: &str, payload: &Value) -> Result<Value, RemoteError> {
        async {
            tracing::info!("starting");
            let start = std::time::Instant::now();
            let result = self.inner.invoke(function, payload).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(reply) if reply.get("errorMessage").is_some() => {
                    tracing::warn!(elapsed_ms, "function reported an error")
                }
                Ok(_) => tracing::info!(elapsed_ms, "invoked"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "invoke failed"),
            }
            result
        }
        .instrument(tracing::info_span!("functions.invoke", function))
        .await
    }

    async fn add_permission(&self, grant: &PermissionGrant) -> Result<(), RemoteError> {
        let result = self.inner.add_permission(grant).await;
        if let Err(ref e) = result {
            tracing::error!(statement_id = %grant.statement_id, error = %e, "add_permission failed");
        }
        result
    }

    async fn remove_permission(
        &self,
        function: &str,
        statement_id: &str,
    ) -> Result<(), RemoteError> {
        let result = self.inner.remove_permission(function, statement_id).await;
        if let Err(ref e) = result {
            tracing::warn!(statement_id, error = %e, "remove_permission failed (may be expected)");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
