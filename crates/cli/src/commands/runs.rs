// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbrun list-runs` and `nbrun stop-run`

use std::io::Write;

use anyhow::Result;
use clap::Args;
use nbrun_core::{expand_params, format_elapsed_opt, format_timestamp, JobName, RunDescription};
use nbrun_engine::{AwsRunner, RunFilter};

use crate::output::{print_json, wrap, OutputFormat};
use crate::table::{Column, Table};

/// Width failure reasons are wrapped to under a listing.
const FAILURE_WIDTH: usize = 60;

#[derive(Args, Debug)]
pub struct ListRunsArgs {
    /// Only runs started by this schedule rule
    #[arg(long)]
    pub rule: Option<String>,

    /// Only runs of this notebook
    #[arg(long)]
    pub notebook: Option<String>,

    /// Maximum number of runs to show (0 for all)
    #[arg(long, default_value_t = 0)]
    pub max: usize,
}

#[derive(Args, Debug)]
pub struct StopRunArgs {
    /// Processing job name of the run
    pub run_name: String,
}

pub async fn list(runner: &AwsRunner, args: ListRunsArgs, format: OutputFormat) -> Result<()> {
    let filter = RunFilter {
        max: args.max,
        notebook: args.notebook,
        rule: args.rule,
    };
    let runs = runner.describe_runs(&filter).await?;
    match format {
        OutputFormat::Text => {
            if runs.is_empty() {
                println!("No runs found");
                return Ok(());
            }
            format_run_list(&mut std::io::stdout().lock(), &runs)?;
        }
        OutputFormat::Json => print_json(&runs)?,
    }
    Ok(())
}

pub async fn stop(runner: &AwsRunner, args: StopRunArgs, format: OutputFormat) -> Result<()> {
    let job = JobName::new(args.run_name);
    runner.stop_run(&job).await?;
    match format {
        OutputFormat::Text => println!("Stop requested for {job}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "job": job, "stopping": true }))?,
    }
    Ok(())
}

/// Table of runs, newest first, with failure reasons listed underneath.
pub fn format_run_list(out: &mut impl Write, runs: &[RunDescription]) -> std::io::Result<()> {
    run_table(runs).render(out)?;
    format_failures(out, runs)
}

pub(crate) fn run_table(runs: &[RunDescription]) -> Table {
    let mut table = Table::new(vec![
        Column::muted("Date"),
        Column::left("Rule"),
        Column::left("Notebook"),
        Column::left("Parameters").with_max(40),
        Column::status("Status"),
        Column::right("Elapsed"),
        Column::left("Job"),
    ]);
    for run in runs {
        table.row(vec![
            format_timestamp(run.created_at),
            run.rule_name.clone(),
            run.notebook_name.clone(),
            expand_params(&run.parameters),
            run.status.to_string(),
            format_elapsed_opt(run.elapsed_ms),
            run.job_id.to_string(),
        ]);
    }
    table
}

pub(crate) fn format_failures(out: &mut impl Write, runs: &[RunDescription]) -> std::io::Result<()> {
    let failed: Vec<_> = runs
        .iter()
        .filter_map(|r| r.failure_reason.as_deref().map(|reason| (&r.job_id, reason)))
        .collect();
    if failed.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    for (job, reason) in failed {
        writeln!(out, "{job}:")?;
        for line in wrap(reason, FAILURE_WIDTH) {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
