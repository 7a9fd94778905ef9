// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    in_progress = { JobStatus::InProgress, false },
    stopping    = { JobStatus::Stopping,   false },
    completed   = { JobStatus::Completed,  true },
    failed      = { JobStatus::Failed,     true },
    stopped     = { JobStatus::Stopped,    true },
)]
fn terminal_split(status: JobStatus, terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
}

#[yare::parameterized(
    in_progress = { "InProgress", JobStatus::InProgress },
    stopping    = { "Stopping",   JobStatus::Stopping },
    completed   = { "Completed",  JobStatus::Completed },
    failed      = { "Failed",     JobStatus::Failed },
    stopped     = { "Stopped",    JobStatus::Stopped },
)]
fn parses_remote_spelling(raw: &str, expected: JobStatus) {
    assert_eq!(raw.parse::<JobStatus>().unwrap(), expected);
    assert_eq!(expected.to_string(), raw);
}

#[test]
fn unknown_status_is_rejected() {
    let err = "Pending".parse::<JobStatus>().unwrap_err();
    assert_eq!(err.to_string(), "unknown job status: Pending");
}

#[test]
fn serde_uses_remote_spelling() {
    let json = serde_json::to_string(&JobStatus::InProgress).unwrap();
    assert_eq!(json, "\"InProgress\"");
}
