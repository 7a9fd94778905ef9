// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{setup, BUCKET};
use nbrun_adapters::{JobCall, RemoteError, StoreCall};
use nbrun_core::record::ENV_RULE;
use nbrun_core::test_support::{failed_record, foreign_record, job_name, job_record};
use tempfile::tempdir;

fn rule_run(n: usize, rule: &str) -> nbrun_core::JobRecord {
    let mut record = job_record(n, JobStatus::Completed);
    record.environment.insert(ENV_RULE.to_string(), rule.to_string());
    record
}

#[tokio::test]
async fn describe_run_abbreviates_and_locates_result() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::Completed));

    let run = ctx.runner.describe_run(&job_name(1)).await.unwrap();

    assert_eq!(run.notebook_name, "nb1.ipynb");
    assert_eq!(run.image, "notebook-runner");
    assert_eq!(run.role, "BasicExecuteNotebookRole-us-west-2");
    assert_eq!(
        run.result_location.as_deref(),
        Some("s3://sagemaker-us-west-2-123456789012/papermill_output/nb1-out.ipynb")
    );
    assert_eq!(run.elapsed_ms, Some(60_000));
}

#[tokio::test]
async fn describe_run_of_missing_job_is_not_found() {
    let ctx = setup();
    let err = ctx.runner.describe_run(&job_name(9)).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)), "{err}");
}

#[tokio::test]
async fn describe_runs_lists_newest_first_and_skips_foreign_jobs() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::Completed));
    ctx.jobs.add_job(foreign_record("xgboost-papermill-7", JobStatus::Completed));
    ctx.jobs.add_job(job_record(2, JobStatus::InProgress));

    let runs = ctx.runner.describe_runs(&RunFilter::default()).await.unwrap();

    let names: Vec<_> = runs.iter().map(|r| r.job_id.to_string()).collect();
    assert_eq!(names, vec!["papermill-nb2", "papermill-nb1"]);
    assert_eq!(ctx.jobs.describe_count("xgboost-papermill-7"), 0);
}

#[tokio::test]
async fn describe_runs_stops_at_max() {
    let ctx = setup();
    for n in 1..=5 {
        ctx.jobs.add_job(job_record(n, JobStatus::Completed));
    }
    let filter = RunFilter {
        max: 2,
        ..RunFilter::default()
    };

    let runs = ctx.runner.describe_runs(&filter).await.unwrap();

    assert_eq!(runs.len(), 2);
    assert_eq!(ctx.jobs.describe_count("papermill-nb3"), 0);
}

#[tokio::test]
async fn describe_runs_follows_pages() {
    let ctx = setup();
    for n in 1..=(PAGE_SIZE as usize + 5) {
        ctx.jobs.add_job(job_record(n, JobStatus::Completed));
    }

    let runs = ctx.runner.describe_runs(&RunFilter::default()).await.unwrap();

    assert_eq!(runs.len(), PAGE_SIZE as usize + 5);
    assert_eq!(ctx.jobs.list_count(), 2);
}

#[tokio::test]
async fn describe_runs_filters_by_rule_and_notebook() {
    let ctx = setup();
    ctx.jobs.add_job(rule_run(1, "Nightly"));
    ctx.jobs.add_job(job_record(2, JobStatus::Completed));
    ctx.jobs.add_job(rule_run(3, "Hourly"));

    let by_rule = RunFilter {
        rule: Some("Nightly".to_string()),
        ..RunFilter::default()
    };
    let runs = ctx.runner.describe_runs(&by_rule).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].job_id, "papermill-nb1");

    let by_notebook = RunFilter {
        notebook: Some("nb2.ipynb".to_string()),
        ..RunFilter::default()
    };
    let runs = ctx.runner.describe_runs(&by_notebook).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].job_id, "papermill-nb2");
}

#[tokio::test(start_paused = true)]
async fn wait_for_complete_polls_until_job_leaves_in_progress() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::InProgress));
    let jobs = ctx.jobs.clone();
    let mut polls = 0;

    let run = ctx
        .runner
        .wait_for_complete(&job_name(1), Duration::from_secs(10), |run| {
            polls += 1;
            assert_eq!(run.job_id, "papermill-nb1");
            if polls == 3 {
                jobs.update_job(failed_record(1, "kernel crashed"));
            }
        })
        .await
        .unwrap();

    assert_eq!(polls, 4);
    assert_eq!(run.status, JobStatus::Failed);
    assert_eq!(run.failure_reason.as_deref(), Some("kernel crashed"));
}

#[tokio::test(start_paused = true)]
async fn wait_for_complete_treats_stopping_as_done() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::Stopping));

    let run = ctx
        .runner
        .wait_for_complete(&job_name(1), Duration::from_secs(10), |_| {})
        .await
        .unwrap();

    assert_eq!(run.status, JobStatus::Stopping);
}

#[tokio::test]
async fn stop_run_asks_the_service() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::InProgress));

    ctx.runner.stop_run(&job_name(1)).await.unwrap();

    assert!(ctx.jobs.calls().contains(&JobCall::Stop { name: job_name(1) }));
    assert_eq!(ctx.jobs.get_job("papermill-nb1").unwrap().status, JobStatus::Stopping);
}

#[tokio::test]
async fn stop_run_of_missing_job_is_not_found() {
    let ctx = setup();
    assert!(matches!(
        ctx.runner.stop_run(&job_name(4)).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn download_writes_result_into_new_directory() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::Completed));
    ctx.store.put_object(BUCKET, "papermill_output/nb1-out.ipynb", "{\"cells\": []}");
    let dir = tempdir().unwrap();
    let target = dir.path().join("results/today");

    let path = ctx.runner.download_notebook(&job_name(1), &target).await.unwrap();

    assert_eq!(path, target.join("nb1-out.ipynb"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"cells\": []}");
}

#[tokio::test]
async fn download_of_missing_object_is_not_found() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(1, JobStatus::Completed));
    ctx.store.add_bucket(BUCKET);
    let dir = tempdir().unwrap();

    let err = ctx
        .runner
        .download_notebook(&job_name(1), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::NotFound(_)), "{err}");
}

#[tokio::test]
async fn fetch_output_returns_bytes() {
    let ctx = setup();
    ctx.jobs.add_job(job_record(2, JobStatus::Completed));
    ctx.store.put_object(BUCKET, "papermill_output/nb2-out.ipynb", "result");

    let bytes = ctx.runner.fetch_output(&job_name(2)).await.unwrap();

    assert_eq!(bytes, b"result");
}

#[tokio::test]
async fn result_without_output_location_is_not_found() {
    let ctx = setup();
    let mut record = job_record(1, JobStatus::Completed);
    record.output_prefix = None;
    ctx.jobs.add_job(record);

    assert!(matches!(
        ctx.runner.result_object(&job_name(1)).await,
        Err(EngineError::NotFound(_))
    ));
}

#[tokio::test]
async fn upload_stores_notebook_in_default_bucket() {
    let ctx = setup();

    let uri = ctx.runner.upload_notebook(b"{}".to_vec()).await.unwrap();

    assert!(uri.starts_with("s3://sagemaker-us-west-2-123456789012/papermill_input/notebook-"));
    assert!(uri.ends_with(".ipynb"));
    let keys = ctx.store.keys(BUCKET);
    assert_eq!(keys.len(), 1);
    assert_eq!(ctx.store.object(BUCKET, &keys[0]).unwrap(), b"{}");
}

#[tokio::test]
async fn upload_failure_surfaces() {
    let ctx = setup();
    ctx.store.fail_next("upload", RemoteError::Transport("connection reset".into()));

    let err = ctx.runner.upload_notebook(b"{}".to_vec()).await.unwrap_err();

    assert!(matches!(err, EngineError::Remote(RemoteError::Transport(_))));
    assert!(ctx
        .store
        .calls()
        .iter()
        .any(|c| matches!(c, StoreCall::Upload { .. })));
}
