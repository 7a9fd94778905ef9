// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output

use crate::prelude::*;

#[test]
fn no_arguments_prints_usage() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn help_lists_commands() {
    let run = cli().args(&["--help"]).passes();
    for command in [
        "run",
        "download",
        "stop-run",
        "list-runs",
        "watch",
        "schedule",
        "unschedule",
        "list-rules",
    ] {
        assert!(run.stdout().contains(command), "missing {command}");
    }
}

#[test]
fn version_names_the_binary() {
    cli().args(&["--version"]).passes().stdout_has("nbrun 0.1.0");
}

#[test]
fn run_help_describes_parameters() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--param")
        .stdout_has("--no-wait");
}
