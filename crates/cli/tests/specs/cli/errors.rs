// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument errors are reported before any remote call is made.

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    cli().args(&["frobnicate"]).fails().stderr_has("frobnicate");
}

#[test]
fn malformed_parameter_is_rejected() {
    let sandbox = Sandbox::new("exit 1");
    sandbox
        .cli()
        .args(&["run", "s3://bucket/nb.ipynb", "-p", "alpha"])
        .fails()
        .stderr_has("is not in the form");
    assert!(sandbox.aws_calls().is_empty());
}

#[test]
fn zero_watch_interval_is_rejected() {
    cli()
        .args(&["watch", "--interval", "0s"])
        .fails()
        .stderr_has("interval");
}

#[test]
fn schedule_requires_a_name() {
    cli()
        .args(&["schedule", "nb.ipynb", "--at", "rate(1 day)"])
        .fails()
        .stderr_has("--name");
}

#[test]
fn missing_explicit_config_file_fails() {
    let sandbox = Sandbox::new("exit 1");
    sandbox
        .cli()
        .env("NBRUN_CONFIG", sandbox.path().join("absent.toml"))
        .args(&["list-runs"])
        .fails()
        .stderr_has("absent.toml");
    assert!(sandbox.aws_calls().is_empty());
}
