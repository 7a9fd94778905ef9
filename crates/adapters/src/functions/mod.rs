// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote function service hosting the job submission entry point

use crate::error::RemoteError;
use async_trait::async_trait;
use serde_json::Value;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFunctionService, FunctionCall};

/// Permission for another service to invoke a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    pub function: String,
    pub statement_id: String,
    pub action: String,
    pub principal: String,
    pub source_arn: String,
}

/// Adapter for the remote function service
#[async_trait]
pub trait FunctionService: Clone + Send + Sync + 'static {
    /// Invoke a function synchronously and return its JSON reply.
    async fn invoke(&self, function: &str, payload: &Value) -> Result<Value, RemoteError>;

    async fn add_permission(&self, grant: &PermissionGrant) -> Result<(), RemoteError>;

    async fn remove_permission(
        &self,
        function: &str,
        statement_id: &str,
    ) -> Result<(), RemoteError>;
}
