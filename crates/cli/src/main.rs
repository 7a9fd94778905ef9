// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! nbrun - run Jupyter notebooks as remote processing jobs

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod env;
mod output;
mod poll;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use commands::{download, rules, run, runs, watch};
use nbrun_engine::{AwsRunner, Config};

#[derive(Parser)]
#[command(
    name = "nbrun",
    version,
    about = "Run, schedule and track Jupyter notebooks as remote processing jobs"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    /// AWS region (overrides the config file and environment)
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWS CLI profile
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a notebook and, unless told otherwise, wait for it and fetch the result
    Run(run::RunArgs),
    /// Download the executed notebook of a run
    Download(download::DownloadArgs),
    /// Stop a run in progress
    StopRun(runs::StopRunArgs),
    /// List recent notebook runs
    ListRuns(runs::ListRunsArgs),
    /// Follow recent runs, refreshing only what changed
    Watch(watch::WatchArgs),
    /// Run a notebook on a schedule or on matching events
    Schedule(rules::ScheduleArgs),
    /// Remove a schedule
    Unschedule(rules::UnscheduleArgs),
    /// List notebook schedules
    ListRules(rules::ListRulesArgs),
}

fn cli_command() -> clap::Command {
    Cli::command()
}

#[tokio::main]
async fn main() {
    setup_logging();
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays clean.
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = env::log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

/// Settings from the config file and environment, with flags applied last.
fn load_config(region: Option<String>, profile: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if region.is_some() {
        config.region = region;
    }
    if profile.is_some() {
        config.profile = profile;
    }
    Ok(config)
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        cli_command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(cli.region, cli.profile)?;
    let runner = AwsRunner::from_config(config);

    match command {
        Commands::Run(args) => run::handle(&runner, args, format).await?,
        Commands::Download(args) => download::handle(&runner, args, format).await?,
        Commands::StopRun(args) => runs::stop(&runner, args, format).await?,
        Commands::ListRuns(args) => runs::list(&runner, args, format).await?,
        Commands::Watch(args) => watch::handle(&runner, args, format).await?,
        Commands::Schedule(args) => rules::schedule(&runner, args, format).await?,
        Commands::Unschedule(args) => rules::unschedule(&runner, args, format).await?,
        Commands::ListRules(args) => rules::list(&runner, args, format).await?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
