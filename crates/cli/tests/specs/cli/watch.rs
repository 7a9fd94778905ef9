// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watching runs while the remote side fails part of a refresh.

use crate::prelude::*;

/// Lists two jobs; describing the older one always fails.
const FLAKY_DESCRIBE: &str = r#"case "$*" in
*list-processing-jobs*)
    cat <<'JSON'
{"ProcessingJobSummaries": [
  {"ProcessingJobName": "papermill-newer", "CreationTime": "2020-11-02T19:50:00Z", "ProcessingJobStatus": "InProgress"},
  {"ProcessingJobName": "papermill-older", "CreationTime": "2020-11-02T19:40:00Z", "ProcessingJobStatus": "Completed"}
]}
JSON
    ;;
*papermill-newer*)
    echo '{"ProcessingJobName": "papermill-newer", "ProcessingJobStatus": "InProgress", "CreationTime": "2020-11-02T19:50:00Z"}'
    ;;
*)
    echo 'An error occurred (InternalFailure) when calling the DescribeProcessingJob operation: boom' >&2
    exit 254
    ;;
esac"#;

#[test]
fn watch_once_shows_partial_list_before_failing() {
    let sandbox = Sandbox::new(FLAKY_DESCRIBE);
    let run = sandbox
        .cli()
        .args(&["watch", "--once"])
        .fails()
        .stdout_has("Runs: 1 tracked, 1 in progress")
        .stdout_has("papermill-newer")
        .stdout_lacks("papermill-older")
        .stderr_has("boom");
    assert_eq!(run.code(), Some(1));
}

#[test]
fn watch_keeps_polling_after_a_failed_refresh() {
    let sandbox = Sandbox::new(FLAKY_DESCRIBE);
    let run = sandbox
        .cli()
        .args(&["watch", "--interval", "1s", "--timeout", "2s"])
        .passes()
        .stderr_has("boom");

    assert!(run.stdout().matches("Runs: 1 tracked").count() >= 2, "{}", run.stdout());
    assert!(run.stderr().matches("Error:").count() >= 2, "{}", run.stderr());
    let retried = sandbox
        .aws_calls()
        .into_iter()
        .filter(|c| c.contains("describe-processing-job") && c.contains("papermill-older"))
        .count();
    assert!(retried >= 2, "{retried}");
}
