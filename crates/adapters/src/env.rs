// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

/// AWS CLI executable (default: `aws` on PATH).
pub fn aws_bin() -> String {
    non_empty("NBRUN_AWS_BIN").unwrap_or_else(|| "aws".to_string())
}

/// Per-call timeout for remote CLI calls (default: none).
pub fn aws_timeout() -> Option<Duration> {
    parse_duration_ms("NBRUN_AWS_TIMEOUT_MS")
}

/// Region from the standard AWS variables.
pub fn aws_region() -> Option<String> {
    non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION"))
}

/// Named credentials profile.
pub fn aws_profile() -> Option<String> {
    non_empty("AWS_PROFILE")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
