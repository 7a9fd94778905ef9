// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity via `aws sts` and `aws iam`

use super::AwsCli;
use crate::error::RemoteError;
use crate::identity::IdentityService;
use async_trait::async_trait;
use nbrun_core::CallerIdentity;
use serde::Deserialize;

#[derive(Clone, Default)]
pub struct AwsIdentityService {
    cli: AwsCli,
}

impl AwsIdentityService {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl IdentityService for AwsIdentityService {
    async fn caller_identity(&self) -> Result<CallerIdentity, RemoteError> {
        let id: CallerWire = self
            .cli
            .json("sts", "get-caller-identity", &[] as &[&str])
            .await?;
        Ok(CallerIdentity {
            account: id.account,
            arn: id.arn,
        })
    }

    async fn role_arn(&self, role_name: &str) -> Result<String, RemoteError> {
        let role: GetRoleWire = self
            .cli
            .json("iam", "get-role", &["--role-name", role_name])
            .await?;
        Ok(role.role.arn)
    }

    async fn region(&self) -> Result<Option<String>, RemoteError> {
        if let Some(region) = self.cli.region() {
            return Ok(Some(region.to_string()));
        }
        // `configure get` exits non-zero when the key is unset
        match self.cli.bytes("configure", "get", &["region"]).await {
            Ok(out) => {
                let region = String::from_utf8_lossy(&out).trim().to_string();
                Ok((!region.is_empty()).then_some(region))
            }
            Err(RemoteError::Transport(e)) => Err(RemoteError::Transport(e)),
            Err(_) => Ok(None),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CallerWire {
    account: String,
    arn: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetRoleWire {
    role: RoleWire,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoleWire {
    arn: String,
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
