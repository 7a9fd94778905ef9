// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule rules via `aws events`

use super::AwsCli;
use crate::error::RemoteError;
use crate::events::EventService;
use async_trait::async_trait;
use nbrun_core::{RulePage, RuleRecord, RuleTarget, Trigger};
use serde::{Deserialize, Serialize};

#[derive(Clone, Default)]
pub struct AwsEventService {
    cli: AwsCli,
}

impl AwsEventService {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl EventService for AwsEventService {
    async fn put_rule(
        &self,
        name: &str,
        trigger: &Trigger,
        description: &str,
    ) -> Result<String, RemoteError> {
        let (flag, value) = match trigger {
            Trigger::Schedule(expr) => ("--schedule-expression", expr.as_str()),
            Trigger::EventPattern(pattern) => ("--event-pattern", pattern.as_str()),
        };
        let created: PutRuleResponse = self
            .cli
            .json(
                "events",
                "put-rule",
                &["--name", name, "--description", description, flag, value],
            )
            .await?;
        Ok(created.rule_arn)
    }

    async fn delete_rule(&self, name: &str) -> Result<(), RemoteError> {
        self.cli.json("events", "delete-rule", &["--name", name]).await
    }

    async fn describe_rule(&self, name: &str) -> Result<RuleRecord, RemoteError> {
        let rule: RuleWire = self
            .cli
            .json("events", "describe-rule", &["--name", name])
            .await?;
        Ok(rule.into())
    }

    async fn list_rules(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<RulePage, RemoteError> {
        let mut args = vec!["--no-paginate", "--name-prefix", prefix];
        if let Some(token) = page_token {
            args.extend(["--next-token", token]);
        }
        let page: ListRulesResponse = self.cli.json("events", "list-rules", &args).await?;
        Ok(RulePage {
            rules: page.rules.into_iter().map(RuleRecord::from).collect(),
            next_token: page.next_token.filter(|t| !t.is_empty()),
        })
    }

    async fn put_targets(&self, rule: &str, targets: &[RuleTarget]) -> Result<(), RemoteError> {
        let wire: Vec<TargetWire> = targets.iter().map(TargetWire::from).collect();
        let targets = serde_json::to_string(&wire)
            .map_err(|e| RemoteError::Decode(format!("rule targets: {e}")))?;
        let result: PutTargetsResponse = self
            .cli
            .json("events", "put-targets", &["--rule", rule, "--targets", &targets])
            .await?;
        match result.failed_entries.into_iter().next() {
            None => Ok(()),
            Some(failed) => Err(RemoteError::service(
                failed.error_code.unwrap_or_else(|| "FailedEntry".to_string()),
                failed.error_message.unwrap_or_default(),
            )),
        }
    }

    async fn remove_targets(&self, rule: &str, ids: &[&str]) -> Result<(), RemoteError> {
        let mut args = vec!["--rule", rule, "--ids"];
        args.extend_from_slice(ids);
        let _: serde_json::Value = self.cli.json("events", "remove-targets", &args).await?;
        Ok(())
    }

    async fn list_targets(&self, rule: &str) -> Result<Vec<RuleTarget>, RemoteError> {
        let result: ListTargetsResponse = self
            .cli
            .json("events", "list-targets-by-rule", &["--rule", rule])
            .await?;
        Ok(result
            .targets
            .into_iter()
            .map(|t| RuleTarget {
                id: t.id,
                arn: t.arn,
                input: t.input,
            })
            .collect())
    }
}

// ── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PutRuleResponse {
    rule_arn: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RuleWire {
    name: String,
    arn: Option<String>,
    schedule_expression: Option<String>,
    event_pattern: Option<String>,
    #[serde(default)]
    state: String,
    description: Option<String>,
}

impl From<RuleWire> for RuleRecord {
    fn from(rule: RuleWire) -> Self {
        RuleRecord {
            name: rule.name,
            arn: rule.arn,
            schedule_expression: rule.schedule_expression,
            event_pattern: rule.event_pattern,
            state: rule.state,
            description: rule.description,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListRulesResponse {
    #[serde(default)]
    rules: Vec<RuleWire>,
    next_token: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TargetWire {
    id: String,
    arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<String>,
}

impl From<&RuleTarget> for TargetWire {
    fn from(target: &RuleTarget) -> Self {
        TargetWire {
            id: target.id.clone(),
            arn: target.arn.clone(),
            input: target.input.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PutTargetsResponse {
    #[serde(default)]
    failed_entries: Vec<FailedEntryWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FailedEntryWire {
    error_code: Option<String>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListTargetsResponse {
    #[serde(default)]
    targets: Vec<TargetWire>,
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
