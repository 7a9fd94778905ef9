// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn upload_then_download() {
    let store = FakeObjectStore::new();
    store.add_bucket("b");
    store.upload(b"abc".to_vec(), "b", "k/nb.ipynb").await.unwrap();
    assert_eq!(store.download("b", "k/nb.ipynb").await.unwrap(), b"abc");
    assert_eq!(store.keys("b"), vec!["k/nb.ipynb"]);
}

#[tokio::test]
async fn upload_to_missing_bucket_fails() {
    let store = FakeObjectStore::new();
    assert!(store.upload(vec![], "nope", "k").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn creating_owned_bucket_reports_code() {
    let store = FakeObjectStore::new();
    store.create_bucket("b", "us-west-2").await.unwrap();
    assert!(store.bucket_exists("b").await.unwrap());
    let err = store.create_bucket("b", "us-west-2").await.unwrap_err();
    assert_eq!(err.code(), Some("BucketAlreadyOwnedByYou"));
}

#[tokio::test]
async fn queued_failure_applies_once() {
    let store = FakeObjectStore::new();
    store.put_object("b", "k", "x");
    store.fail_next("download", RemoteError::Transport("timed out".into()));
    assert!(store.download("b", "k").await.is_err());
    assert!(store.download("b", "k").await.is_ok());
}
