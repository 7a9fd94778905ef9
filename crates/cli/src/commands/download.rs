// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbrun download`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use nbrun_core::{JobName, JobStatus};
use nbrun_engine::AwsRunner;

use crate::color;
use crate::output::{print_json, OutputFormat};

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Processing job name of the run
    pub run_name: String,

    /// Directory the executed notebook is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Wait for the run to finish first
    #[arg(long)]
    pub wait: bool,
}

pub async fn handle(runner: &AwsRunner, args: DownloadArgs, format: OutputFormat) -> Result<()> {
    let job = JobName::new(args.run_name);
    let run = if args.wait {
        runner
            .wait_for_complete(&job, runner.config().poll_interval(), |_| {})
            .await?
    } else {
        runner.describe_run(&job).await?
    };

    if run.status != JobStatus::Completed {
        match format {
            OutputFormat::Text => println!(
                "Run {} has status {}; no output to download",
                job,
                color::status(run.status.as_str())
            ),
            OutputFormat::Json => print_json(&serde_json::json!({
                "job": job,
                "status": run.status,
                "output": null,
            }))?,
        }
        return Ok(());
    }

    let path = runner.download_notebook(&job, &args.output_dir).await?;
    match format {
        OutputFormat::Text => println!("Downloaded {}", path.display()),
        OutputFormat::Json => print_json(&serde_json::json!({
            "job": job,
            "status": run.status,
            "output": path,
        }))?,
    }
    Ok(())
}
