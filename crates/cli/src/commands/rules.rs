// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbrun schedule`, `nbrun unschedule` and `nbrun list-rules`

use std::io::Write;

use anyhow::Result;
use clap::Args;
use nbrun_core::{RuleName, ScheduleDescription};
use nbrun_engine::{AwsRunner, ScheduleRequest};

use super::{format_params, JobArgs};
use crate::output::{print_json, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Local notebook file, or an s3:// location
    pub notebook: String,

    /// Rule name (without the RunNotebook- prefix)
    #[arg(long)]
    pub name: String,

    /// Schedule expression, e.g. "cron(0 8 * * ? *)" or "rate(1 day)"
    #[arg(long = "at", value_name = "EXPRESSION")]
    pub schedule: Option<String>,

    /// Event pattern (JSON) that triggers the run
    #[arg(long = "event", value_name = "PATTERN")]
    pub event_pattern: Option<String>,

    #[command(flatten)]
    pub job: JobArgs,
}

#[derive(Args, Debug)]
pub struct UnscheduleArgs {
    /// Rule name (without the RunNotebook- prefix)
    pub rule_name: String,
}

#[derive(Args, Debug)]
pub struct ListRulesArgs {
    /// Only rules whose names start with this
    #[arg(long)]
    pub prefix: Option<String>,

    /// Only rules that run this notebook
    #[arg(long)]
    pub notebook: Option<String>,

    /// Maximum number of rules to show (0 for all)
    #[arg(long, default_value_t = 0)]
    pub max: usize,
}

pub async fn schedule(runner: &AwsRunner, args: ScheduleArgs, format: OutputFormat) -> Result<()> {
    let rule_name = RuleName::new(&args.name);
    let request = ScheduleRequest {
        rule_name: rule_name.clone(),
        schedule: args.schedule,
        event_pattern: args.event_pattern,
        run: args.job.into_request(&args.notebook)?,
    };
    let arn = runner.schedule(request).await?;
    match format {
        OutputFormat::Text => println!("Scheduled {rule_name} ({arn})"),
        OutputFormat::Json => print_json(&serde_json::json!({ "rule": rule_name, "arn": arn }))?,
    }
    Ok(())
}

pub async fn unschedule(runner: &AwsRunner, args: UnscheduleArgs, format: OutputFormat) -> Result<()> {
    let rule_name = RuleName::new(&args.rule_name);
    runner.unschedule(&rule_name).await?;
    match format {
        OutputFormat::Text => println!("Removed schedule {rule_name}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "rule": rule_name, "removed": true }))?,
    }
    Ok(())
}

pub async fn list(runner: &AwsRunner, args: ListRulesArgs, format: OutputFormat) -> Result<()> {
    // The notebook filter is applied locally, so it cannot cap the remote listing.
    let remote_max = if args.notebook.is_some() { 0 } else { args.max };
    let rules = runner
        .describe_schedules(remote_max, args.prefix.as_deref())
        .await?;
    let rules = filter_rules(rules, args.notebook.as_deref(), args.max);
    match format {
        OutputFormat::Text => {
            if rules.is_empty() {
                println!("No schedules found");
                return Ok(());
            }
            format_rule_list(&mut std::io::stdout().lock(), &rules)?;
        }
        OutputFormat::Json => print_json(&rules)?,
    }
    Ok(())
}

pub fn filter_rules(
    rules: Vec<ScheduleDescription>,
    notebook: Option<&str>,
    max: usize,
) -> Vec<ScheduleDescription> {
    let matching = rules
        .into_iter()
        .filter(|r| notebook.map_or(true, |n| r.notebook == n));
    if max > 0 {
        matching.take(max).collect()
    } else {
        matching.collect()
    }
}

pub fn format_rule_list(out: &mut impl Write, rules: &[ScheduleDescription]) -> std::io::Result<()> {
    let mut table = Table::new(vec![
        Column::left("Name"),
        Column::left("Notebook"),
        Column::left("Parameters").with_max(40),
        Column::left("Schedule"),
        Column::status("State"),
        Column::left("Event Pattern"),
    ]);
    for rule in rules {
        table.row(vec![
            rule.name.to_string(),
            rule.notebook.clone(),
            format_params(&rule.parameters),
            rule.schedule.clone().unwrap_or_default(),
            rule.state.clone(),
            rule.event_pattern.clone().unwrap_or_default(),
        ]);
    }
    table.render(out)
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
