// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::path::PathBuf;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

fn parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    non_empty(var).and_then(|s| s.parse().ok())
}

/// Config file: NBRUN_CONFIG > <config dir>/nbrun/config.toml.
///
/// The flag is true when the path was named explicitly.
pub fn config_path() -> Option<(PathBuf, bool)> {
    if let Some(path) = non_empty("NBRUN_CONFIG") {
        return Some((PathBuf::from(path), true));
    }
    dirs::config_dir().map(|dir| (dir.join("nbrun").join("config.toml"), false))
}

pub fn max_jobs() -> Option<usize> {
    parse("NBRUN_MAX_JOBS")
}

pub fn max_new_per_refresh() -> Option<usize> {
    parse("NBRUN_MAX_NEW_PER_REFRESH")
}

pub fn throttle_delay_ms() -> Option<u64> {
    parse("NBRUN_THROTTLE_DELAY_MS")
}

pub fn poll_interval_ms() -> Option<u64> {
    parse("NBRUN_POLL_MS")
}

pub fn image() -> Option<String> {
    non_empty("NBRUN_IMAGE")
}

pub fn role() -> Option<String> {
    non_empty("NBRUN_ROLE")
}

pub fn instance_type() -> Option<String> {
    non_empty("NBRUN_INSTANCE_TYPE")
}

pub fn bucket() -> Option<String> {
    non_empty("NBRUN_BUCKET")
}

pub fn function_name() -> Option<String> {
    non_empty("NBRUN_FUNCTION")
}

pub fn bind() -> Option<String> {
    non_empty("NBRUN_BIND")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
