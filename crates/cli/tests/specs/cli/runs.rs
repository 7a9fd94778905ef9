// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listing and stopping runs against a scripted `aws`.

use crate::prelude::*;

#[test]
fn list_runs_with_no_jobs() {
    let sandbox = Sandbox::new(r#"echo '{"ProcessingJobSummaries": []}'"#);
    sandbox
        .cli()
        .args(&["list-runs"])
        .passes()
        .stdout_eq("No runs found\n");

    let calls = sandbox.aws_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("sagemaker list-processing-jobs"), "{}", calls[0]);
    assert!(calls[0].contains("--region us-west-2"), "{}", calls[0]);
}

#[test]
fn region_flag_overrides_config() {
    let sandbox = Sandbox::new(r#"echo '{"ProcessingJobSummaries": []}'"#);
    sandbox
        .cli()
        .args(&["--region", "eu-west-1", "list-runs"])
        .passes();
    assert!(sandbox.aws_calls()[0].contains("--region eu-west-1"));
}

#[test]
fn list_runs_json_is_an_empty_array() {
    let sandbox = Sandbox::new(r#"echo '{"ProcessingJobSummaries": []}'"#);
    let run = sandbox
        .cli()
        .args(&["-o", "json", "list-runs"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn stop_run_requests_a_stop() {
    let sandbox = Sandbox::new("");
    sandbox
        .cli()
        .args(&["stop-run", "papermill-powers-2020-11-02-19-49-24"])
        .passes()
        .stdout_eq("Stop requested for papermill-powers-2020-11-02-19-49-24\n");
    assert!(sandbox.aws_calls()[0]
        .contains("stop-processing-job --processing-job-name papermill-powers-2020-11-02-19-49-24"));
}

#[test]
fn stop_unknown_run_fails() {
    let sandbox = Sandbox::new(
        r#"echo 'An error occurred (ValidationException) when calling the StopProcessingJob operation: Could not find job papermill-x' >&2
exit 254"#,
    );
    let run = sandbox
        .cli()
        .args(&["stop-run", "papermill-x"])
        .fails()
        .stderr_has("Could not find job papermill-x");
    assert_eq!(run.code(), Some(1));
}
