// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object storage via `aws s3` and `aws s3api`

use super::AwsCli;
use crate::error::RemoteError;
use crate::storage::{s3_uri, ObjectStore};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Clone, Default)]
pub struct AwsObjectStore {
    cli: AwsCli,
}

impl AwsObjectStore {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl ObjectStore for AwsObjectStore {
    async fn upload(&self, bytes: Vec<u8>, bucket: &str, key: &str) -> Result<(), RemoteError> {
        let target = s3_uri(bucket, key);
        self.cli
            .with_input("s3", "cp", &["--no-progress", "-", &target], bytes)
            .await?;
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, RemoteError> {
        let source = s3_uri(bucket, key);
        self.cli
            .bytes("s3", "cp", &["--no-progress", &source, "-"])
            .await
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, RemoteError> {
        match self
            .cli
            .json::<Value, _>("s3api", "head-bucket", &["--bucket", bucket])
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), RemoteError> {
        let mut args = vec!["--bucket".to_string(), bucket.to_string()];
        // us-east-1 is the implicit location and is rejected as a constraint
        if region != "us-east-1" {
            args.push("--create-bucket-configuration".to_string());
            args.push(format!("LocationConstraint={region}"));
        }
        let _: Value = self.cli.json("s3api", "create-bucket", &args).await?;
        tracing::info!(bucket, region, "created bucket");
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
