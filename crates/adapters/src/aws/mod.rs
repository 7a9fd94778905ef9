// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AWS CLI backed service adapters
//!
//! Every call shells out to the `aws` executable with JSON output. Errors
//! are classified from the CLI's stderr so throttling and missing resources
//! surface as distinct [`RemoteError`] variants.

mod events;
mod functions;
mod identity;
mod jobs;
mod storage;

pub use events::AwsEventService;
pub use functions::AwsFunctionService;
pub use identity::AwsIdentityService;
pub use jobs::AwsJobService;
pub use storage::AwsObjectStore;

use crate::env;
use crate::error::{classify_cli_error, RemoteError};
use crate::subprocess::{run_with_input, run_with_timeout};
use serde::de::DeserializeOwned;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Shared invocation settings for the `aws` executable.
#[derive(Debug, Clone)]
pub struct AwsCli {
    bin: String,
    region: Option<String>,
    profile: Option<String>,
    timeout: Option<Duration>,
}

impl Default for AwsCli {
    fn default() -> Self {
        Self {
            bin: env::aws_bin(),
            region: env::aws_region(),
            profile: env::aws_profile(),
            timeout: env::aws_timeout(),
        }
    }
}

impl AwsCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        if region.is_some() {
            self.region = region;
        }
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        if profile.is_some() {
            self.profile = profile;
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn command<S: AsRef<str>>(&self, service: &str, op: &str, args: &[S]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg(service).arg(op);
        for arg in args {
            cmd.arg(arg.as_ref());
        }
        if let Some(region) = &self.region {
            cmd.args(["--region", region]);
        }
        if let Some(profile) = &self.profile {
            cmd.args(["--profile", profile]);
        }
        cmd
    }

    /// Run `aws <service> <op> <args>` and parse its JSON output.
    ///
    /// Commands that print nothing on success parse as JSON `null`, so
    /// callers expecting no payload can ask for `()` or `serde_json::Value`.
    pub async fn json<T, S>(&self, service: &str, op: &str, args: &[S]) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        let mut cmd = self.command(service, op, args);
        cmd.args(["--output", "json"]);
        let description = format!("aws {service} {op}");
        let output = run_with_timeout(cmd, self.timeout, &description)
            .await
            .map_err(RemoteError::Transport)?;
        let stdout = checked(output)?;
        parse_json(&stdout, &description)
    }

    /// Run a command and return raw stdout bytes.
    pub async fn bytes<S: AsRef<str>>(
        &self,
        service: &str,
        op: &str,
        args: &[S],
    ) -> Result<Vec<u8>, RemoteError> {
        let cmd = self.command(service, op, args);
        let output = run_with_timeout(cmd, self.timeout, &format!("aws {service} {op}"))
            .await
            .map_err(RemoteError::Transport)?;
        checked(output)
    }

    /// Run a command with `input` on stdin.
    pub async fn with_input<S: AsRef<str>>(
        &self,
        service: &str,
        op: &str,
        args: &[S],
        input: Vec<u8>,
    ) -> Result<Vec<u8>, RemoteError> {
        let cmd = self.command(service, op, args);
        let output = run_with_input(cmd, input, self.timeout, &format!("aws {service} {op}"))
            .await
            .map_err(RemoteError::Transport)?;
        checked(output)
    }
}

fn checked(output: Output) -> Result<Vec<u8>, RemoteError> {
    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(classify_cli_error(&String::from_utf8_lossy(&output.stderr)))
    }
}

fn parse_json<T: DeserializeOwned>(stdout: &[u8], description: &str) -> Result<T, RemoteError> {
    let text = String::from_utf8_lossy(stdout);
    let text = if text.trim().is_empty() { "null" } else { text.trim() };
    serde_json::from_str(text).map_err(|e| RemoteError::Decode(format!("{description}: {e}")))
}

#[cfg(test)]
mod test_cli;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
