// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Function invocation and permissions via `aws lambda`

use super::AwsCli;
use crate::error::RemoteError;
use crate::functions::{FunctionService, PermissionGrant};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Default)]
pub struct AwsFunctionService {
    cli: AwsCli,
}

impl AwsFunctionService {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl FunctionService for AwsFunctionService {
    async fn invoke(&self, function: &str, payload: &Value) -> Result<Value, RemoteError> {
        let reply = tempfile::NamedTempFile::new()
            .map_err(|e| RemoteError::Transport(format!("invoke reply file: {e}")))?;
        let reply_path = reply.path().display().to_string();
        let payload = payload.to_string();

        let meta: InvokeResponse = self
            .cli
            .json(
                "lambda",
                "invoke",
                &[
                    "--function-name",
                    function,
                    "--invocation-type",
                    "RequestResponse",
                    "--cli-binary-format",
                    "raw-in-base64-out",
                    "--payload",
                    &payload,
                    &reply_path,
                ],
            )
            .await?;

        let body = tokio::fs::read(reply.path())
            .await
            .map_err(|e| RemoteError::Transport(format!("invoke reply file: {e}")))?;
        let reply: Value = serde_json::from_slice(&body)
            .map_err(|e| RemoteError::Decode(format!("invoke reply: {e}")))?;

        if let Some(kind) = meta.function_error {
            tracing::debug!(function, kind, "function reported an error");
        }
        Ok(reply)
    }

    async fn add_permission(&self, grant: &PermissionGrant) -> Result<(), RemoteError> {
        let _: Value = self
            .cli
            .json(
                "lambda",
                "add-permission",
                &[
                    "--function-name",
                    &grant.function,
                    "--statement-id",
                    &grant.statement_id,
                    "--action",
                    &grant.action,
                    "--principal",
                    &grant.principal,
                    "--source-arn",
                    &grant.source_arn,
                ],
            )
            .await?;
        Ok(())
    }

    async fn remove_permission(
        &self,
        function: &str,
        statement_id: &str,
    ) -> Result<(), RemoteError> {
        self.cli
            .json(
                "lambda",
                "remove-permission",
                &["--function-name", function, "--statement-id", statement_id],
            )
            .await
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvokeResponse {
    function_error: Option<String>,
}

#[cfg(test)]
#[path = "functions_tests.rs"]
mod tests;
