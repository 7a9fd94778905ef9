// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session account facts, resolved once and memoized.

use crate::error::EngineError;
use nbrun_adapters::{IdentityService, ObjectStore, RemoteError};
use nbrun_core::abbrev::{qualify_image, qualify_role};
use nbrun_core::CallerIdentity;
use regex::Regex;
use std::sync::LazyLock;
use tokio::sync::OnceCell;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static ASSUMED_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)sts::(\d+):assumed-role/(.+?)/.*$").expect("constant regex pattern is valid")
});

/// Managed notebook execution roles live under this path.
const SERVICE_ROLE_MARKER: &str = "AmazonSageMaker-ExecutionRole";

/// Account, region and default bucket for one set of credentials.
///
/// Each fact is looked up at most once per session; a failed lookup is
/// retried on the next call.
pub struct Session<I, S> {
    identity: I,
    store: S,
    region_override: Option<String>,
    bucket_override: Option<String>,
    caller: OnceCell<CallerIdentity>,
    region: OnceCell<String>,
    bucket: OnceCell<String>,
}

impl<I, S> Session<I, S>
where
    I: IdentityService,
    S: ObjectStore,
{
    pub fn new(identity: I, store: S) -> Self {
        Self {
            identity,
            store,
            region_override: None,
            bucket_override: None,
            caller: OnceCell::new(),
            region: OnceCell::new(),
            bucket: OnceCell::new(),
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region_override = region;
        self
    }

    pub fn with_bucket(mut self, bucket: Option<String>) -> Self {
        self.bucket_override = bucket;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn caller(&self) -> Result<&CallerIdentity, EngineError> {
        self.caller
            .get_or_try_init(|| async {
                Ok::<_, EngineError>(self.identity.caller_identity().await?)
            })
            .await
    }

    pub async fn account(&self) -> Result<&str, EngineError> {
        Ok(&self.caller().await?.account)
    }

    pub async fn region(&self) -> Result<&str, EngineError> {
        self.region
            .get_or_try_init(|| async {
                let region = match &self.region_override {
                    Some(region) => Some(region.clone()),
                    None => self.identity.region().await?,
                };
                region.ok_or_else(|| {
                    EngineError::configuration(
                        "no region configured (set AWS_REGION or pass --region)",
                    )
                })
            })
            .await
            .map(String::as_str)
    }

    /// The bucket used for uploads and default output, created if missing.
    ///
    /// Defaults to `sagemaker-<region>-<account>`.
    pub async fn default_bucket(&self) -> Result<&str, EngineError> {
        self.bucket
            .get_or_try_init(|| async {
                let region = self.region().await?;
                let bucket = match &self.bucket_override {
                    Some(bucket) => bucket.clone(),
                    None => format!("sagemaker-{}-{}", region, self.account().await?),
                };
                ensure_bucket(&self.store, &bucket, region).await?;
                Ok::<_, EngineError>(bucket)
            })
            .await
            .map(String::as_str)
    }

    /// ARN of the role behind the current credentials.
    ///
    /// Fails with a configuration error when the caller is an IAM user or
    /// the identity does not resolve to a role.
    pub async fn execution_role(&self) -> Result<String, EngineError> {
        let arn = &self.caller().await?.arn;
        if let Some(idx) = arn.find(":user/") {
            let user = arn[idx..].rsplit('/').next().unwrap_or_default();
            return Err(EngineError::configuration(format!(
                "running as the IAM user '{user}'; a role is required to run notebook jobs"
            )));
        }
        if arn.contains(SERVICE_ROLE_MARKER) {
            return Ok(ASSUMED_ROLE
                .replace(arn, "${1}iam::${2}:role/service-role/${3}")
                .into_owned());
        }

        let role = ASSUMED_ROLE.replace(arn, "${1}iam::${2}:role/${3}");
        let role_name = role.rsplit('/').next().unwrap_or_default();
        let resolved = self.identity.role_arn(role_name).await?;
        if resolved.contains(":role/") {
            Ok(resolved)
        } else {
            Err(EngineError::configuration(format!(
                "the current identity is not a role: {resolved}"
            )))
        }
    }

    /// Role ARN for a job: the given role qualified into this account, else
    /// the execution role, else `BasicExecuteNotebookRole-<region>`.
    pub async fn resolve_role(&self, role: Option<&str>) -> Result<String, EngineError> {
        let role = match role.filter(|r| !r.is_empty()) {
            Some(role) => role.to_string(),
            None => match self.execution_role().await {
                Ok(arn) => arn,
                Err(EngineError::Configuration(reason)) => {
                    tracing::debug!(%reason, "no execution role; using the basic role");
                    format!("BasicExecuteNotebookRole-{}", self.region().await?)
                }
                Err(e) => return Err(e),
            },
        };
        Ok(qualify_role(&role, self.account().await?))
    }

    pub async fn resolve_image(&self, image: &str) -> Result<String, EngineError> {
        let (account, region) = (self.account().await?, self.region().await?);
        Ok(qualify_image(image, account, region))
    }
}

/// Create a bucket unless it exists, tolerating a concurrent creator.
async fn ensure_bucket<S: ObjectStore>(
    store: &S,
    bucket: &str,
    region: &str,
) -> Result<(), EngineError> {
    if store.bucket_exists(bucket).await? {
        return Ok(());
    }
    match store.create_bucket(bucket, region).await {
        Ok(()) => {
            tracing::info!(bucket, region, "created default bucket");
            Ok(())
        }
        Err(e) if e.code() == Some("BucketAlreadyOwnedByYou") => Ok(()),
        Err(RemoteError::Service { code, message })
            if code == "OperationAborted" && message.contains("conflicting conditional operation") =>
        {
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
