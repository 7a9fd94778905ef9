// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake object store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::ObjectStore;
use crate::error::RemoteError;
use crate::scripted::ScriptedFailures;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Recorded object store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Upload { bucket: String, key: String },
    Download { bucket: String, key: String },
    BucketExists { bucket: String },
    CreateBucket { bucket: String, region: String },
}

#[derive(Default)]
struct FakeStoreState {
    buckets: BTreeSet<String>,
    objects: BTreeMap<(String, String), Vec<u8>>,
    calls: Vec<StoreCall>,
    failures: ScriptedFailures,
}

/// In-memory object store; uploads require the bucket to exist.
#[derive(Clone, Default)]
pub struct FakeObjectStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bucket(&self, bucket: &str) {
        self.inner.lock().buckets.insert(bucket.to_string());
    }

    pub fn put_object(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        let mut inner = self.inner.lock();
        inner.buckets.insert(bucket.to_string());
        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.inner.lock().buckets.contains(bucket)
    }

    /// Object keys stored in a bucket.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.inner
            .lock()
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn fail_next(&self, op: &str, error: RemoteError) {
        self.inner.lock().failures.push(op, error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn upload(&self, bytes: Vec<u8>, bucket: &str, key: &str) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if let Some(err) = inner.failures.take("upload") {
            return Err(err);
        }
        if !inner.buckets.contains(bucket) {
            return Err(RemoteError::NotFound(format!(
                "The specified bucket does not exist: {bucket}"
            )));
        }
        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes);
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Download {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if let Some(err) = inner.failures.take("download") {
            return Err(err);
        }
        inner
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("s3://{bucket}/{key}")))
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::BucketExists {
            bucket: bucket.to_string(),
        });
        if let Some(err) = inner.failures.take("bucket_exists") {
            return Err(err);
        }
        Ok(inner.buckets.contains(bucket))
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::CreateBucket {
            bucket: bucket.to_string(),
            region: region.to_string(),
        });
        if let Some(err) = inner.failures.take("create_bucket") {
            return Err(err);
        }
        if !inner.buckets.insert(bucket.to_string()) {
            return Err(RemoteError::service(
                "BucketAlreadyOwnedByYou",
                "Your previous request to create the named bucket succeeded and you already own it.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
