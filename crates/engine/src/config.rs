// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.
//!
//! Resolution order: built-in defaults, then the TOML config file, then
//! `NBRUN_*` environment variables. Front ends apply their flags last.
//! The AWS connection settings (region, profile, binary, timeout) override
//! the standard AWS environment variables when set.

use crate::env;
use crate::error::EngineError;
use crate::tracker::DEFAULT_MAX_JOBS;
use nbrun_adapters::AwsCli;
use nbrun_core::submission::{DEFAULT_IMAGE, DEFAULT_INSTANCE_TYPE};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Name of the function that turns a submission bundle into a job.
pub const DEFAULT_FUNCTION: &str = "RunNotebook";
pub const DEFAULT_BIND: &str = "127.0.0.1:8642";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub aws_bin: Option<String>,
    /// Per remote call; unset means calls may take as long as they take.
    pub aws_timeout_ms: Option<u64>,
    /// Capacity of the tracked run window.
    pub max_jobs: usize,
    /// New descriptions fetched per refresh (default: `max_jobs`).
    pub max_new_per_refresh: Option<usize>,
    pub throttle_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub image: String,
    pub role: Option<String>,
    pub instance_type: String,
    /// Bucket for uploads and default output (default: derived per account).
    pub bucket: Option<String>,
    pub function_name: String,
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            aws_bin: None,
            aws_timeout_ms: None,
            max_jobs: DEFAULT_MAX_JOBS,
            max_new_per_refresh: None,
            throttle_delay_ms: 1000,
            poll_interval_ms: 10_000,
            image: DEFAULT_IMAGE.to_string(),
            role: None,
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            bucket: None,
            function_name: DEFAULT_FUNCTION.to_string(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Config {
    /// Load the config file (when present) and apply the environment.
    ///
    /// A missing file at the default location is fine; a missing file named
    /// by `NBRUN_CONFIG` is an error.
    pub fn load() -> Result<Self, EngineError> {
        let config = match env::config_path() {
            Some((path, explicit)) if explicit || path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        Ok(config.apply_env())
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
            .map_err(|e| EngineError::configuration(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `NBRUN_*` overrides.
    pub fn apply_env(mut self) -> Self {
        if let Some(n) = env::max_jobs() {
            self.max_jobs = n;
        }
        if let Some(n) = env::max_new_per_refresh() {
            self.max_new_per_refresh = Some(n);
        }
        if let Some(ms) = env::throttle_delay_ms() {
            self.throttle_delay_ms = ms;
        }
        if let Some(ms) = env::poll_interval_ms() {
            self.poll_interval_ms = ms;
        }
        if let Some(image) = env::image() {
            self.image = image;
        }
        if let Some(role) = env::role() {
            self.role = Some(role);
        }
        if let Some(instance_type) = env::instance_type() {
            self.instance_type = instance_type;
        }
        if let Some(bucket) = env::bucket() {
            self.bucket = Some(bucket);
        }
        if let Some(function) = env::function_name() {
            self.function_name = function;
        }
        if let Some(bind) = env::bind() {
            self.bind = bind;
        }
        self
    }

    pub fn new_per_refresh(&self) -> usize {
        self.max_new_per_refresh.unwrap_or(self.max_jobs)
    }

    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// CLI runner settings for the AWS backend.
    pub fn aws_cli(&self) -> AwsCli {
        let cli = AwsCli::new()
            .with_region(self.region.clone())
            .with_profile(self.profile.clone())
            .with_timeout(self.aws_timeout_ms.map(Duration::from_millis));
        match &self.aws_bin {
            Some(bin) => cli.with_bin(bin),
            None => cli,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
