// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote object storage

use crate::error::RemoteError;
use async_trait::async_trait;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeObjectStore, StoreCall};

/// Adapter for the remote object store
#[async_trait]
pub trait ObjectStore: Clone + Send + Sync + 'static {
    async fn upload(&self, bytes: Vec<u8>, bucket: &str, key: &str) -> Result<(), RemoteError>;

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, RemoteError>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, RemoteError>;

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), RemoteError>;
}

/// Split `s3://bucket/key` into bucket and key.
pub fn parse_s3_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("s3://")?;
    let (bucket, key) = rest.split_once('/')?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    Some((bucket, key))
}

pub fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
