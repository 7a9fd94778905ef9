// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbrun run`

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use nbrun_core::{JobName, JobStatus, RunDescription};
use nbrun_engine::AwsRunner;
use serde::Serialize;

use super::JobArgs;
use crate::color;
use crate::output::{print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Local notebook file, or an s3:// location to run in place
    pub notebook: String,

    #[command(flatten)]
    pub job: JobArgs,

    /// Submit the processing job directly instead of through the
    /// submission function
    #[arg(long)]
    pub direct: bool,

    /// Return once the job has started
    #[arg(long)]
    pub no_wait: bool,

    /// Directory the executed notebook is downloaded to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Serialize)]
struct RunResult<'a> {
    job: &'a JobName,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<&'a RunDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a Path>,
}

pub async fn handle(runner: &AwsRunner, args: RunArgs, format: OutputFormat) -> Result<()> {
    let request = args.job.into_request(&args.notebook)?;
    let job = if args.direct {
        let bundle = runner.prepare(request, None).await?;
        runner.execute(bundle).await?
    } else {
        runner.invoke(request).await?
    };
    if format == OutputFormat::Text {
        println!("Started processing job {}", color::header(job.as_str()));
    }
    if args.no_wait {
        if format == OutputFormat::Json {
            print_json(&RunResult {
                job: &job,
                run: None,
                output: None,
            })?;
        }
        return Ok(());
    }

    let interval = runner.config().poll_interval();
    let run = runner
        .wait_for_complete(&job, interval, |run| {
            tracing::debug!(job = %run.job_id, status = %run.status, "polled");
        })
        .await?;

    let output = match run.status {
        JobStatus::Completed => Some(runner.download_notebook(&job, &args.output_dir).await?),
        _ => None,
    };

    match format {
        OutputFormat::Text => print!("{}", finish_message(&run, output.as_deref())),
        OutputFormat::Json => print_json(&RunResult {
            job: &job,
            run: Some(&run),
            output: output.as_deref(),
        })?,
    }
    Ok(())
}

/// Text printed once a waited-on run has finished.
pub fn finish_message(run: &RunDescription, output: Option<&Path>) -> String {
    let mut text = format!("Run finished with status {}\n", color::status(run.status.as_str()));
    if let Some(reason) = &run.failure_reason {
        text.push_str(&format!("Failure reason: {reason}\n"));
    }
    if let Some(path) = output {
        text.push_str(&format!("Output notebook: {}\n", path.display()));
    }
    text
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
