// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod download;
pub mod rules;
pub mod run;
pub mod runs;
pub mod watch;

use anyhow::{Context, Result};
use clap::Args;
use nbrun_core::naming::basename;
use nbrun_core::submission::{env_var, time_limit};
use nbrun_core::{parse_param, Override, Parameters, SubmissionOverrides};
use nbrun_engine::InvokeRequest;
use serde_json::Value;
use std::time::Duration;

/// Options shared by commands that start or schedule a run.
#[derive(Args, Debug, Default, Clone)]
pub struct JobArgs {
    /// Container image: an ECR repository name or a full image URI
    #[arg(long)]
    pub image: Option<String>,

    /// Execution role name or ARN
    #[arg(long)]
    pub role: Option<String>,

    /// Instance type for the processing job
    #[arg(long = "instance", value_name = "TYPE")]
    pub instance_type: Option<String>,

    /// Where the executed notebook is written (s3://...)
    #[arg(long, value_name = "S3_URI")]
    pub output_prefix: Option<String>,

    /// Notebook parameter; values that parse as JSON are passed as JSON
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// Extra processing job arguments as JSON, or @FILE to read them
    #[arg(long, value_name = "JSON|@FILE")]
    pub extra: Option<String>,

    /// Environment variable for the job container (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
    pub env: Vec<(String, String)>,

    /// Stop the job after this long (e.g. 30m, 4h)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub max_runtime: Option<Duration>,
}

impl JobArgs {
    /// Build the run request for `notebook`.
    ///
    /// An `s3://` notebook is used in place; anything else is a local file
    /// that gets uploaded.
    pub fn into_request(self, notebook: &str) -> Result<InvokeRequest> {
        let extra_args = match &self.extra {
            Some(arg) => parse_extra(arg)?,
            None => SubmissionOverrides::default(),
        };
        let (name, input_path) = notebook_target(notebook);
        let mut overrides: Vec<Override> = self
            .env
            .into_iter()
            .map(|(key, value)| env_var(key, value))
            .collect();
        if let Some(limit) = self.max_runtime {
            overrides.push(time_limit(limit.as_secs()));
        }
        Ok(InvokeRequest {
            notebook: name,
            image: self.image,
            input_path,
            output_prefix: self.output_prefix,
            parameters: self.params.into_iter().collect::<Parameters>(),
            role: self.role,
            instance_type: self.instance_type,
            extra_args,
            overrides,
        })
    }
}

/// Split a notebook argument into (notebook, input location).
pub fn notebook_target(notebook: &str) -> (String, Option<String>) {
    if notebook.starts_with("s3://") {
        (basename(notebook).to_string(), Some(notebook.to_string()))
    } else {
        (notebook.to_string(), None)
    }
}

/// Parse a `KEY=VALUE` environment entry.
pub fn parse_env(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => anyhow::bail!("environment entry \"{arg}\" is not in the form KEY=VALUE"),
    }
}

/// Parse `--extra`: inline JSON, or `@path` naming a JSON file.
pub fn parse_extra(arg: &str) -> Result<SubmissionOverrides> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read extra arguments from {path}"))?,
        None => arg.to_string(),
    };
    Ok(SubmissionOverrides::from_json(&text)?)
}

/// Render one parameter value the way it was typed.
pub fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `a=1, b=text` for a parameter mapping.
pub fn format_params(params: &Parameters) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={}", param_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a duration string like "5s", "1m", "2h", "1h30m" or a bare number
/// of seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let mut total_secs: u64 = 0;
    let mut current_num = String::new();

    for c in s.trim().chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
            continue;
        }
        let n: u64 = current_num
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
        current_num.clear();
        total_secs += match c {
            'h' => n * 3600,
            'm' => n * 60,
            's' => n,
            _ => anyhow::bail!("unknown duration unit '{}' in: {}", c, s),
        };
    }
    if !current_num.is_empty() {
        let n: u64 = current_num
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
        total_secs += n;
    }
    if total_secs == 0 {
        anyhow::bail!("duration must be > 0: {}", s);
    }
    Ok(Duration::from_secs(total_secs))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
