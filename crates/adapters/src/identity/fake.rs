// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::IdentityService;
use crate::error::RemoteError;
use crate::scripted::ScriptedFailures;
use async_trait::async_trait;
use nbrun_core::CallerIdentity;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

struct FakeIdentityState {
    identity: CallerIdentity,
    region: Option<String>,
    /// role name -> full ARN
    roles: BTreeMap<String, String>,
    identity_calls: usize,
    failures: ScriptedFailures,
}

/// In-memory identity service.
///
/// Defaults to account `123456789012` in `us-west-2`, calling as the
/// `Developer` role.
#[derive(Clone)]
pub struct FakeIdentityService {
    inner: Arc<Mutex<FakeIdentityState>>,
}

impl Default for FakeIdentityService {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeIdentityState {
                identity: CallerIdentity {
                    account: "123456789012".to_string(),
                    arn: "arn:aws:iam::123456789012:role/Developer".to_string(),
                },
                region: Some("us-west-2".to_string()),
                roles: BTreeMap::from([(
                    "Developer".to_string(),
                    "arn:aws:iam::123456789012:role/Developer".to_string(),
                )]),
                identity_calls: 0,
                failures: ScriptedFailures::default(),
            })),
        }
    }
}

impl FakeIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_caller_arn(&self, arn: &str) {
        self.inner.lock().identity.arn = arn.to_string();
    }

    pub fn set_region(&self, region: Option<&str>) {
        self.inner.lock().region = region.map(str::to_string);
    }

    pub fn add_role(&self, name: &str, arn: &str) {
        self.inner
            .lock()
            .roles
            .insert(name.to_string(), arn.to_string());
    }

    pub fn fail_next(&self, op: &str, error: RemoteError) {
        self.inner.lock().failures.push(op, error);
    }

    /// Number of caller identity lookups made.
    pub fn identity_calls(&self) -> usize {
        self.inner.lock().identity_calls
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn caller_identity(&self) -> Result<CallerIdentity, RemoteError> {
        let mut inner = self.inner.lock();
        inner.identity_calls += 1;
        if let Some(err) = inner.failures.take("caller_identity") {
            return Err(err);
        }
        Ok(inner.identity.clone())
    }

    async fn role_arn(&self, role_name: &str) -> Result<String, RemoteError> {
        let mut inner = self.inner.lock();
        if let Some(err) = inner.failures.take("role_arn") {
            return Err(err);
        }
        inner.roles.get(role_name).cloned().ok_or_else(|| {
            RemoteError::NotFound(format!("The role with name {role_name} cannot be found."))
        })
    }

    async fn region(&self) -> Result<Option<String>, RemoteError> {
        let mut inner = self.inner.lock();
        if let Some(err) = inner.failures.take("region") {
            return Err(err);
        }
        Ok(inner.region.clone())
    }
}
