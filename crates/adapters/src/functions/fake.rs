// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake function service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FunctionService, PermissionGrant};
use crate::error::RemoteError;
use crate::scripted::ScriptedFailures;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// Recorded function service call
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCall {
    Invoke { function: String, payload: Value },
    AddPermission(PermissionGrant),
    RemovePermission { function: String, statement_id: String },
}

#[derive(Default)]
struct FakeFunctionState {
    replies: VecDeque<Value>,
    /// (function, statement id) -> grant
    permissions: BTreeMap<(String, String), PermissionGrant>,
    calls: Vec<FunctionCall>,
    failures: ScriptedFailures,
}

/// In-memory function service.
///
/// Invocations return queued replies in order, then `{"job_name": "papermill-fake"}`.
#[derive(Clone, Default)]
pub struct FakeFunctionService {
    inner: Arc<Mutex<FakeFunctionState>>,
}

impl FakeFunctionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: Value) {
        self.inner.lock().replies.push_back(reply);
    }

    pub fn fail_next(&self, op: &str, error: RemoteError) {
        self.inner.lock().failures.push(op, error);
    }

    pub fn has_permission(&self, function: &str, statement_id: &str) -> bool {
        self.inner
            .lock()
            .permissions
            .contains_key(&(function.to_string(), statement_id.to_string()))
    }

    pub fn permissions(&self) -> Vec<PermissionGrant> {
        self.inner.lock().permissions.values().cloned().collect()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<FunctionCall> {
        self.inner.lock().calls.clone()
    }

    /// Payloads of every invocation, in order.
    pub fn invocations(&self) -> Vec<Value> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FunctionCall::Invoke { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl FunctionService for FakeFunctionService {
    async fn invoke(&self, function: &str, payload: &Value) -> Result<Value, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FunctionCall::Invoke {
            function: function.to_string(),
            payload: payload.clone(),
        });
        if let Some(err) = inner.failures.take("invoke") {
            return Err(err);
        }
        Ok(inner
            .replies
            .pop_front()
            .unwrap_or_else(|| serde_json::json!({ "job_name": "papermill-fake" })))
    }

    async fn add_permission(&self, grant: &PermissionGrant) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FunctionCall::AddPermission(grant.clone()));
        if let Some(err) = inner.failures.take("add_permission") {
            return Err(err);
        }
        let key = (grant.function.clone(), grant.statement_id.clone());
        if inner.permissions.contains_key(&key) {
            return Err(RemoteError::service(
                "ResourceConflictException",
                format!(
                    "The statement id ({}) provided already exists.",
                    grant.statement_id
                ),
            ));
        }
        inner.permissions.insert(key, grant.clone());
        Ok(())
    }

    async fn remove_permission(
        &self,
        function: &str,
        statement_id: &str,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FunctionCall::RemovePermission {
            function: function.to_string(),
            statement_id: statement_id.to_string(),
        });
        if let Some(err) = inner.failures.take("remove_permission") {
            return Err(err);
        }
        inner
            .permissions
            .remove(&(function.to_string(), statement_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| {
                RemoteError::NotFound(format!(
                    "Statement {statement_id} is not found in resource policy."
                ))
            })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
