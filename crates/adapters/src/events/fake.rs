// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake event service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::EventService;
use crate::error::RemoteError;
use crate::scripted::ScriptedFailures;
use async_trait::async_trait;
use nbrun_core::{RulePage, RuleRecord, RuleTarget, Trigger};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Recorded event service call
#[derive(Debug, Clone, PartialEq)]
pub enum EventCall {
    PutRule { name: String, trigger: Trigger, description: String },
    DeleteRule { name: String },
    DescribeRule { name: String },
    ListRules { prefix: String },
    PutTargets { rule: String, targets: Vec<RuleTarget> },
    RemoveTargets { rule: String, ids: Vec<String> },
    ListTargets { rule: String },
}

#[derive(Default)]
struct FakeEventState {
    rules: BTreeMap<String, RuleRecord>,
    targets: BTreeMap<String, Vec<RuleTarget>>,
    calls: Vec<EventCall>,
    failures: ScriptedFailures,
    page_size: Option<usize>,
}

/// In-memory event service keyed by remote rule name.
#[derive(Clone, Default)]
pub struct FakeEventService {
    inner: Arc<Mutex<FakeEventState>>,
}

impl FakeEventService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&self, rule: RuleRecord, targets: Vec<RuleTarget>) {
        let mut inner = self.inner.lock();
        inner.targets.insert(rule.name.clone(), targets);
        inner.rules.insert(rule.name.clone(), rule);
    }

    pub fn get_rule(&self, name: &str) -> Option<RuleRecord> {
        self.inner.lock().rules.get(name).cloned()
    }

    pub fn targets_of(&self, name: &str) -> Vec<RuleTarget> {
        self.inner.lock().targets.get(name).cloned().unwrap_or_default()
    }

    /// Split listings into pages of this many rules.
    pub fn set_page_size(&self, size: usize) {
        self.inner.lock().page_size = Some(size.max(1));
    }

    /// Queue an error for the named operation (`put_rule`, `put_targets`, ...).
    pub fn fail_next(&self, op: &str, error: RemoteError) {
        self.inner.lock().failures.push(op, error);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<EventCall> {
        self.inner.lock().calls.clone()
    }
}

fn missing_rule(name: &str) -> RemoteError {
    RemoteError::NotFound(format!("Rule {name} does not exist on EventBus default."))
}

#[async_trait]
impl EventService for FakeEventService {
    async fn put_rule(
        &self,
        name: &str,
        trigger: &Trigger,
        description: &str,
    ) -> Result<String, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::PutRule {
            name: name.to_string(),
            trigger: trigger.clone(),
            description: description.to_string(),
        });
        if let Some(err) = inner.failures.take("put_rule") {
            return Err(err);
        }

        let arn = format!("arn:aws:events:us-west-2:123456789012:rule/{name}");
        let (schedule_expression, event_pattern) = match trigger {
            Trigger::Schedule(s) => (Some(s.clone()), None),
            Trigger::EventPattern(p) => (None, Some(p.clone())),
        };
        inner.rules.insert(
            name.to_string(),
            RuleRecord {
                name: name.to_string(),
                arn: Some(arn.clone()),
                schedule_expression,
                event_pattern,
                state: "ENABLED".to_string(),
                description: Some(description.to_string()),
            },
        );
        Ok(arn)
    }

    async fn delete_rule(&self, name: &str) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::DeleteRule {
            name: name.to_string(),
        });
        if let Some(err) = inner.failures.take("delete_rule") {
            return Err(err);
        }
        if inner.targets.get(name).is_some_and(|t| !t.is_empty()) {
            return Err(RemoteError::service(
                "ValidationException",
                "Rule can't be deleted since it has targets.",
            ));
        }
        inner.targets.remove(name);
        inner
            .rules
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| missing_rule(name))
    }

    async fn describe_rule(&self, name: &str) -> Result<RuleRecord, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::DescribeRule {
            name: name.to_string(),
        });
        if let Some(err) = inner.failures.take("describe_rule") {
            return Err(err);
        }
        inner.rules.get(name).cloned().ok_or_else(|| missing_rule(name))
    }

    async fn list_rules(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<RulePage, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::ListRules {
            prefix: prefix.to_string(),
        });
        if let Some(err) = inner.failures.take("list_rules") {
            return Err(err);
        }

        let matching: Vec<RuleRecord> = inner
            .rules
            .values()
            .filter(|r| r.name.starts_with(prefix))
            .cloned()
            .collect();
        let start: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = inner
            .page_size
            .map_or(matching.len(), |size| (start + size).min(matching.len()));
        let rules = matching.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_token = (end < matching.len()).then(|| end.to_string());
        Ok(RulePage { rules, next_token })
    }

    async fn put_targets(&self, rule: &str, targets: &[RuleTarget]) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::PutTargets {
            rule: rule.to_string(),
            targets: targets.to_vec(),
        });
        if let Some(err) = inner.failures.take("put_targets") {
            return Err(err);
        }
        if !inner.rules.contains_key(rule) {
            return Err(missing_rule(rule));
        }
        let existing = inner.targets.entry(rule.to_string()).or_default();
        for target in targets {
            existing.retain(|t| t.id != target.id);
            existing.push(target.clone());
        }
        Ok(())
    }

    async fn remove_targets(&self, rule: &str, ids: &[&str]) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::RemoveTargets {
            rule: rule.to_string(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
        });
        if let Some(err) = inner.failures.take("remove_targets") {
            return Err(err);
        }
        if !inner.rules.contains_key(rule) {
            return Err(missing_rule(rule));
        }
        if let Some(existing) = inner.targets.get_mut(rule) {
            existing.retain(|t| !ids.contains(&t.id.as_str()));
        }
        Ok(())
    }

    async fn list_targets(&self, rule: &str) -> Result<Vec<RuleTarget>, RemoteError> {
        let mut inner = self.inner.lock();
        inner.calls.push(EventCall::ListTargets {
            rule: rule.to_string(),
        });
        if let Some(err) = inner.failures.take("list_targets") {
            return Err(err);
        }
        if !inner.rules.contains_key(rule) {
            return Err(missing_rule(rule));
        }
        Ok(inner.targets.get(rule).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
