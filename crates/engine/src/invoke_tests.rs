// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{setup, setup_with_config, test_config, BUCKET};
use nbrun_adapters::{FunctionCall, RemoteError};
use nbrun_core::submission::{env_var, time_limit};
use serde_json::json;
use tempfile::tempdir;

fn uploaded(notebook: &str) -> InvokeRequest {
    InvokeRequest {
        input_path: Some(format!("s3://{BUCKET}/papermill_input/notebook-1.ipynb")),
        ..InvokeRequest::new(notebook)
    }
}

#[tokio::test]
async fn prepare_qualifies_image_and_role() {
    let ctx = setup();

    let bundle = ctx.runner.prepare(uploaded("powers.ipynb"), None).await.unwrap();

    assert_eq!(
        bundle.image,
        "123456789012.dkr.ecr.us-west-2.amazonaws.com/notebook-runner:latest"
    );
    assert_eq!(bundle.role, "arn:aws:iam::123456789012:role/Developer");
    assert_eq!(bundle.instance_type, "ml.m5.large");
    assert_eq!(
        bundle.output_prefix.as_deref(),
        Some("s3://sagemaker-us-west-2-123456789012/papermill_output")
    );
    assert_eq!(bundle.notebook, "powers.ipynb");
    assert_eq!(bundle.rule_name, None);
}

#[tokio::test]
async fn prepare_keeps_explicit_values() {
    let ctx = setup();
    let request = InvokeRequest {
        image: Some("999.dkr.ecr.eu-west-1.amazonaws.com/custom:v2".to_string()),
        role: Some("NotebookRole".to_string()),
        instance_type: Some("ml.c5.xlarge".to_string()),
        output_prefix: Some("s3://elsewhere/out".to_string()),
        ..uploaded("dir/powers.ipynb")
    };

    let bundle = ctx.runner.prepare(request, Some("Nightly".into())).await.unwrap();

    assert_eq!(bundle.image, "999.dkr.ecr.eu-west-1.amazonaws.com/custom:v2");
    assert_eq!(bundle.role, "arn:aws:iam::123456789012:role/NotebookRole");
    assert_eq!(bundle.instance_type, "ml.c5.xlarge");
    assert_eq!(bundle.output_prefix.as_deref(), Some("s3://elsewhere/out"));
    assert_eq!(bundle.notebook, "powers.ipynb");
    assert_eq!(bundle.rule_name.as_deref(), Some("Nightly"));
}

#[tokio::test]
async fn prepare_uses_configured_defaults() {
    let ctx = setup_with_config(crate::Config {
        image: "team-runner:v1".to_string(),
        role: Some("TeamRole".to_string()),
        instance_type: "ml.t3.medium".to_string(),
        ..test_config()
    });

    let bundle = ctx.runner.prepare(uploaded("a.ipynb"), None).await.unwrap();

    assert_eq!(
        bundle.image,
        "123456789012.dkr.ecr.us-west-2.amazonaws.com/team-runner:v1"
    );
    assert_eq!(bundle.role, "arn:aws:iam::123456789012:role/TeamRole");
    assert_eq!(bundle.instance_type, "ml.t3.medium");
}

#[tokio::test]
async fn user_credentials_fall_back_to_basic_role() {
    let ctx = setup();
    ctx.identity.set_caller_arn("arn:aws:iam::123456789012:user/alice");

    let bundle = ctx.runner.prepare(uploaded("a.ipynb"), None).await.unwrap();

    assert_eq!(
        bundle.role,
        "arn:aws:iam::123456789012:role/BasicExecuteNotebookRole-us-west-2"
    );
}

#[tokio::test]
async fn prepare_uploads_local_notebook() {
    let ctx = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("powers.ipynb");
    std::fs::write(&path, "{\"cells\": []}").unwrap();

    let bundle = ctx
        .runner
        .prepare(InvokeRequest::new(path.to_string_lossy()), None)
        .await
        .unwrap();

    assert!(bundle
        .input_path
        .starts_with("s3://sagemaker-us-west-2-123456789012/papermill_input/notebook-"));
    assert_eq!(bundle.notebook, "powers.ipynb");
    let keys = ctx.store.keys(BUCKET);
    assert_eq!(keys.len(), 1);
    assert_eq!(ctx.store.object(BUCKET, &keys[0]).unwrap(), b"{\"cells\": []}");
}

#[tokio::test]
async fn missing_local_notebook_is_an_io_error() {
    let ctx = setup();
    let err = ctx
        .runner
        .prepare(InvokeRequest::new("/nonexistent/nb.ipynb"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Io(_)), "{err}");
}

#[tokio::test]
async fn overrides_fold_over_extra_args() {
    let ctx = setup();
    let mut request = uploaded("a.ipynb");
    request.extra_args = SubmissionOverrides::from_json(r#"{"Environment": {"A": "0"}}"#).unwrap();
    request.overrides = vec![time_limit(600), env_var("A", "1")];

    let bundle = ctx.runner.prepare(request, None).await.unwrap();

    assert_eq!(bundle.extra_args.environment["A"], "1");
    assert_eq!(
        bundle.extra_args.stopping_condition.map(|s| s.max_runtime_in_seconds),
        Some(600)
    );
}

#[tokio::test]
async fn invoke_sends_bundle_to_function() {
    let ctx = setup();
    ctx.functions
        .push_reply(json!({"job_name": "papermill-powers-2020-11-02-19-49-24"}));
    let mut request = uploaded("powers.ipynb");
    request.parameters.insert("x".to_string(), json!(5));

    let job = ctx.runner.invoke(request).await.unwrap();

    assert_eq!(job, "papermill-powers-2020-11-02-19-49-24");
    let calls = ctx.functions.calls();
    let FunctionCall::Invoke { function, payload } = &calls[0] else {
        panic!("expected invoke, got {calls:?}");
    };
    assert_eq!(function, "RunNotebook");
    assert_eq!(payload["notebook"], "powers.ipynb");
    assert_eq!(payload["parameters"], json!({"x": 5}));
    assert_eq!(payload["input_path"], format!("s3://{BUCKET}/papermill_input/notebook-1.ipynb"));
}

#[tokio::test]
async fn invoke_uses_configured_function() {
    let ctx = setup_with_config(crate::Config {
        function_name: "RunNotebookDev".to_string(),
        ..test_config()
    });

    ctx.runner.invoke(uploaded("a.ipynb")).await.unwrap();

    assert!(matches!(
        &ctx.functions.calls()[0],
        FunctionCall::Invoke { function, .. } if function == "RunNotebookDev"
    ));
}

#[yare::parameterized(
    error_message = { json!({"errorMessage": "Processing job limit exceeded", "errorType": "ResourceLimitExceeded"}), "Processing job limit exceeded" },
    no_job_name   = { json!({"statusCode": 200}), "reply has no job name" },
)]
fn reply_errors(reply: serde_json::Value, expected: &str) {
    let err = job_from_reply(&reply).unwrap_err();
    assert!(matches!(&err, EngineError::Invoke(m) if m.contains(expected)), "{err}");
}

#[tokio::test]
async fn invoke_error_reply_is_an_invoke_error() {
    let ctx = setup();
    ctx.functions.push_reply(json!({"errorMessage": "boom"}));

    let err = ctx.runner.invoke(uploaded("a.ipynb")).await.unwrap_err();

    assert!(matches!(err, EngineError::Invoke(ref m) if m == "boom"), "{err}");
}

#[tokio::test]
async fn invoke_transport_failure_is_remote() {
    let ctx = setup();
    ctx.functions
        .fail_next("invoke", RemoteError::Transport("timed out".into()));

    let err = ctx.runner.invoke(uploaded("a.ipynb")).await.unwrap_err();

    assert!(matches!(err, EngineError::Remote(_)), "{err}");
}
