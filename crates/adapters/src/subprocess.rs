// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Run a subprocess command, optionally bounded by a timeout.
///
/// Remote calls carry no timeout unless one is configured. When the
/// timeout elapses the child is killed (via the tokio `Child` drop
/// implementation) and a descriptive error is returned.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Option<Duration>,
    description: &str,
) -> Result<Output, String> {
    cmd.kill_on_drop(true);
    bounded(cmd.output(), timeout, description).await
}

/// Run a subprocess command with `input` written to its stdin.
pub async fn run_with_input(
    mut cmd: Command,
    input: Vec<u8>,
    timeout: Option<Duration>,
    description: &str,
) -> Result<Output, String> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let mut child = cmd
        .spawn()
        .map_err(|e| format!("{} failed: {}", description, e))?;

    let stdin = child.stdin.take();
    let run = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&input).await?;
            stdin.shutdown().await?;
        }
        child.wait_with_output().await
    };
    bounded(run, timeout, description).await
}

async fn bounded<F>(run: F, timeout: Option<Duration>, description: &str) -> Result<Output, String>
where
    F: std::future::Future<Output = std::io::Result<Output>>,
{
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(result) => result,
            Err(_elapsed) => {
                return Err(format!(
                    "{} timed out after {}s",
                    description,
                    limit.as_secs()
                ))
            }
        },
        None => run.await,
    };
    result.map_err(|io_err| format!("{} failed: {}", description, io_err))
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
