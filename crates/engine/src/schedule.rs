// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule rules that run a notebook on a timer or in response to events.
//!
//! A schedule is a rule named `RunNotebook-<name>` whose single target is
//! the submission function, invoked with the run bundle as input. Partial
//! failures are not rolled back.

use crate::error::EngineError;
use crate::invoke::InvokeRequest;
use crate::runner::Runner;
use nbrun_adapters::{
    EventService, FunctionService, IdentityService, JobService, ObjectStore, PermissionGrant,
};
use nbrun_core::{
    RuleName, RuleRecord, RuleTarget, ScheduleDescription, SubmissionRequest, Trigger, RULE_PREFIX,
    TARGET_ID,
};

const EVENTS_PRINCIPAL: &str = "events.amazonaws.com";
const INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// A rule to create and the run it starts.
#[derive(Clone)]
pub struct ScheduleRequest {
    pub rule_name: RuleName,
    /// `cron(...)` or `rate(...)`; exclusive with `event_pattern`.
    pub schedule: Option<String>,
    pub event_pattern: Option<String>,
    pub run: InvokeRequest,
}

impl<J, E, F, S, I> Runner<J, E, F, S, I>
where
    J: JobService,
    E: EventService,
    F: FunctionService,
    S: ObjectStore,
    I: IdentityService,
{
    /// Create (or replace) a schedule rule; returns the rule's ARN.
    pub async fn schedule(&self, request: ScheduleRequest) -> Result<String, EngineError> {
        let trigger = Trigger::from_options(request.schedule, request.event_pattern)?;
        let rule = request.rule_name;
        let bundle = self.prepare(request.run, Some(rule.to_string())).await?;
        let remote_name = rule.prefixed();
        let function = &self.config.function_name;

        let description = format!("Rule to run the Jupyter notebook \"{}\"", bundle.notebook);
        let rule_arn = self
            .events
            .put_rule(&remote_name, &trigger, &description)
            .await?;

        self.functions
            .add_permission(&PermissionGrant {
                function: function.clone(),
                statement_id: rule.statement_id(),
                action: INVOKE_ACTION.to_string(),
                principal: EVENTS_PRINCIPAL.to_string(),
                source_arn: rule_arn.clone(),
            })
            .await?;

        let target = RuleTarget {
            id: TARGET_ID.to_string(),
            arn: format!(
                "arn:aws:lambda:{}:{}:function:{}",
                self.session.region().await?,
                self.session.account().await?,
                function
            ),
            input: Some(serde_json::to_string(&bundle)?),
        };
        self.events.put_targets(&remote_name, &[target]).await?;

        tracing::info!(rule = %rule, arn = %rule_arn, notebook = %bundle.notebook, "schedule created");
        Ok(rule_arn)
    }

    /// Remove a schedule rule, its target, and the function permission.
    ///
    /// A permission that is already gone is not an error.
    pub async fn unschedule(&self, rule: &RuleName) -> Result<(), EngineError> {
        let remote_name = rule.prefixed();
        match self
            .functions
            .remove_permission(&self.config.function_name, &rule.statement_id())
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(rule = %rule, "permission already removed");
            }
            Err(e) => return Err(e.into()),
        }
        self.events.remove_targets(&remote_name, &[TARGET_ID]).await?;
        self.events.delete_rule(&remote_name).await?;
        tracing::info!(rule = %rule, "schedule removed");
        Ok(())
    }

    pub async fn describe_schedule(&self, rule: &RuleName) -> Result<ScheduleDescription, EngineError> {
        let record = self.events.describe_rule(&rule.prefixed()).await?;
        self.describe_rule_record(&record).await
    }

    /// Describe schedules whose names start with `prefix`, up to `max`
    /// (0 means all).
    pub async fn describe_schedules(
        &self,
        max: usize,
        prefix: Option<&str>,
    ) -> Result<Vec<ScheduleDescription>, EngineError> {
        let prefix = format!("{RULE_PREFIX}{}", prefix.unwrap_or_default());
        let mut schedules = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.events.list_rules(&prefix, token.as_deref()).await?;
            for record in &page.rules {
                schedules.push(self.describe_rule_record(record).await?);
                if max > 0 && schedules.len() == max {
                    return Ok(schedules);
                }
            }
            match page.next_token {
                Some(next) => token = Some(next),
                None => return Ok(schedules),
            }
        }
    }

    async fn describe_rule_record(&self, record: &RuleRecord) -> Result<ScheduleDescription, EngineError> {
        let targets = self.events.list_targets(&record.name).await?;
        let bundle = targets
            .first()
            .and_then(|t| t.input.as_deref())
            .map(|input| serde_json::from_str::<SubmissionRequest>(input))
            .transpose()?;
        if bundle.is_none() {
            tracing::warn!(rule = %record.name, "rule has no readable target");
        }
        Ok(ScheduleDescription::new(record, bundle))
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
