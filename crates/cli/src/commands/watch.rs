// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbrun watch`: follow recent runs with incremental refreshes.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use nbrun_core::RunDescription;
use nbrun_engine::{AwsRunner, RefreshOutcome, RunTracker};

use super::parse_duration;
use super::runs::{format_failures, run_table};
use crate::color;
use crate::output::{print_json, OutputFormat};
use crate::poll::{Poller, Tick};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Refresh once, print, and exit
    #[arg(long)]
    pub once: bool,

    /// Number of runs to track (defaults to the configured max_jobs)
    #[arg(long)]
    pub max: Option<usize>,

    /// Time between refreshes (e.g. 10s, 1m)
    #[arg(long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Stop watching after this long
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

pub async fn handle(runner: &AwsRunner, args: WatchArgs, format: OutputFormat) -> Result<()> {
    let mut tracker = match args.max {
        Some(max) => RunTracker::new(runner.fetcher().clone(), max)
            .with_max_new_per_refresh(runner.config().max_new_per_refresh.unwrap_or(max)),
        None => runner.tracker(),
    };
    let interval = args.interval.unwrap_or_else(|| runner.config().poll_interval());
    let mut poller = Poller::new(interval, args.timeout);

    loop {
        match poller.tick().await {
            Tick::Ready => {}
            Tick::Timeout | Tick::Interrupted => return Ok(()),
        }
        // A failed refresh keeps what it applied, so the list is still shown.
        let refreshed = tracker.refresh().await;
        let outcome = refreshed.as_ref().cloned().unwrap_or_default();
        let runs: Vec<RunDescription> = tracker.iter().rev().cloned().collect();
        match format {
            OutputFormat::Text => {
                let mut out = std::io::stdout().lock();
                format_watch(&mut out, &runs, &outcome, tracker.in_progress_count())?;
                out.flush()?;
            }
            OutputFormat::Json => print_json(&runs)?,
        }

        match refreshed {
            Err(e) if args.once => return Err(e.into()),
            Err(e) => eprintln!("Error: {e}"),
            Ok(_) => {}
        }
        if args.once {
            return Ok(());
        }
    }
}

/// One refresh: a summary line, then the tracked runs newest first.
pub fn format_watch(
    out: &mut impl Write,
    runs: &[RunDescription],
    outcome: &RefreshOutcome,
    in_progress: usize,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} {} tracked, {} in progress ({} new, {} finished)",
        color::header("Runs:"),
        runs.len(),
        in_progress,
        outcome.discovered,
        outcome.finished,
    )?;
    run_table(runs).render(out)?;
    format_failures(out, runs)?;
    writeln!(out)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
