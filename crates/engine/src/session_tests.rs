// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nbrun_adapters::{FakeIdentityService, FakeObjectStore, StoreCall};

fn session() -> (FakeIdentityService, FakeObjectStore, Session<FakeIdentityService, FakeObjectStore>) {
    let identity = FakeIdentityService::new();
    let store = FakeObjectStore::new();
    let session = Session::new(identity.clone(), store.clone());
    (identity, store, session)
}

#[tokio::test]
async fn caller_identity_is_fetched_once() {
    let (identity, _, session) = session();
    assert_eq!(session.account().await.unwrap(), "123456789012");
    assert_eq!(session.account().await.unwrap(), "123456789012");
    assert_eq!(identity.identity_calls(), 1);
}

#[tokio::test]
async fn failed_lookup_is_retried() {
    let (identity, _, session) = session();
    identity.fail_next("caller_identity", RemoteError::Transport("offline".into()));
    assert!(session.account().await.is_err());
    assert!(session.account().await.is_ok());
}

#[tokio::test]
async fn default_bucket_is_derived_and_created_once() {
    let (_, store, session) = session();
    assert_eq!(
        session.default_bucket().await.unwrap(),
        "sagemaker-us-west-2-123456789012"
    );
    session.default_bucket().await.unwrap();

    assert!(store.has_bucket("sagemaker-us-west-2-123456789012"));
    let creates = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::CreateBucket { .. }))
        .count();
    assert_eq!(creates, 1);
}

#[tokio::test]
async fn existing_bucket_is_not_recreated() {
    let (_, store, session) = session();
    store.add_bucket("mine");
    let session = session.with_bucket(Some("mine".into()));
    assert_eq!(session.default_bucket().await.unwrap(), "mine");
    assert!(!store
        .calls()
        .iter()
        .any(|c| matches!(c, StoreCall::CreateBucket { .. })));
}

#[tokio::test]
async fn bucket_already_owned_is_tolerated() {
    let (_, store, session) = session();
    store.fail_next(
        "create_bucket",
        RemoteError::service("BucketAlreadyOwnedByYou", "you own it"),
    );
    assert!(session.default_bucket().await.is_ok());
}

#[tokio::test]
async fn concurrent_bucket_creation_is_tolerated() {
    let (_, store, session) = session();
    store.fail_next(
        "create_bucket",
        RemoteError::service(
            "OperationAborted",
            "A conflicting conditional operation is currently in progress",
        ),
    );
    assert!(session.default_bucket().await.is_ok());
}

#[tokio::test]
async fn other_creation_errors_surface() {
    let (_, store, session) = session();
    store.fail_next("create_bucket", RemoteError::service("AccessDenied", "no"));
    assert!(matches!(session.default_bucket().await, Err(EngineError::Remote(_))));
}

#[tokio::test]
async fn missing_region_is_a_configuration_error() {
    let (identity, _, session) = session();
    identity.set_region(None);
    assert!(matches!(session.region().await, Err(EngineError::Configuration(_))));
}

#[tokio::test]
async fn region_override_skips_lookup() {
    let (identity, _, session) = session();
    identity.set_region(None);
    let session = session.with_region(Some("eu-central-1".into()));
    assert_eq!(session.region().await.unwrap(), "eu-central-1");
}

#[tokio::test]
async fn assumed_role_resolves_through_role_lookup() {
    let (identity, _, session) = session();
    identity.set_caller_arn("arn:aws:sts::123456789012:assumed-role/Analyst/alice");
    identity.add_role("Analyst", "arn:aws:iam::123456789012:role/team/Analyst");
    assert_eq!(
        session.execution_role().await.unwrap(),
        "arn:aws:iam::123456789012:role/team/Analyst"
    );
}

#[tokio::test]
async fn managed_execution_role_gets_service_role_path() {
    let (identity, _, session) = session();
    identity.set_caller_arn(
        "arn:aws:sts::123456789012:assumed-role/AmazonSageMaker-ExecutionRole-2020/SageMaker",
    );
    assert_eq!(
        session.execution_role().await.unwrap(),
        "arn:aws:iam::123456789012:role/service-role/AmazonSageMaker-ExecutionRole-2020"
    );
}

#[tokio::test]
async fn iam_user_falls_back_to_basic_role() {
    let (identity, _, session) = session();
    identity.set_caller_arn("arn:aws:iam::123456789012:user/alice");
    assert!(matches!(
        session.execution_role().await,
        Err(EngineError::Configuration(_))
    ));
    assert_eq!(
        session.resolve_role(None).await.unwrap(),
        "arn:aws:iam::123456789012:role/BasicExecuteNotebookRole-us-west-2"
    );
}

#[tokio::test]
async fn explicit_role_is_qualified() {
    let (_, _, session) = session();
    assert_eq!(
        session.resolve_role(Some("Runner")).await.unwrap(),
        "arn:aws:iam::123456789012:role/Runner"
    );
    assert_eq!(
        session.resolve_role(Some("arn:aws:iam::999:role/x/Runner")).await.unwrap(),
        "arn:aws:iam::999:role/x/Runner"
    );
}

#[tokio::test]
async fn bare_image_is_qualified_into_account_registry() {
    let (_, _, session) = session();
    assert_eq!(
        session.resolve_image("notebook-runner").await.unwrap(),
        "123456789012.dkr.ecr.us-west-2.amazonaws.com/notebook-runner:latest"
    );
}
