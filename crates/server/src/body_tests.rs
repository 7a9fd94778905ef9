// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::http::HeaderValue;
use serde_json::json;

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn kind(err: ApiError) -> &'static str {
    err.classify().1
}

fn body(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

#[test]
fn parses_a_complete_body() {
    let parsed = RunBody::parse(
        &json_headers(),
        &body(json!({
            "image": "notebook-runner",
            "input_path": "s3://b/in/nb.ipynb",
            "notebook": "nb.ipynb",
            "parameters": {"x": 5},
            "instance_type": "",
            "schedule": "rate(1 day)"
        })),
    )
    .unwrap();
    assert_eq!(parsed.schedule.as_deref(), Some("rate(1 day)"));

    let request = parsed.into_request().unwrap();
    assert_eq!(request.notebook, "nb.ipynb");
    assert_eq!(request.image.as_deref(), Some("notebook-runner"));
    assert_eq!(request.input_path.as_deref(), Some("s3://b/in/nb.ipynb"));
    assert_eq!(request.parameters["x"], json!(5));
    assert_eq!(request.instance_type, None);
}

#[test]
fn accepts_parameters_as_a_json_string() {
    let parsed = RunBody::parse(
        &json_headers(),
        &body(json!({
            "image": "i", "input_path": "s3://b/k", "notebook": "n",
            "parameters": "{\"who\": \"me\"}"
        })),
    )
    .unwrap();
    let request = parsed.into_request().unwrap();
    assert_eq!(request.parameters["who"], json!("me"));
}

#[yare::parameterized(
    image      = { json!({"input_path": "s3://b/k", "notebook": "n"}), "MissingParameter" },
    input_path = { json!({"image": "i", "notebook": "n"}), "MissingParameter" },
    notebook   = { json!({"image": "i", "input_path": "s3://b/k"}), "MissingParameter" },
    not_object = { json!(["image"]), "InvalidJson" },
    wrong_type = { json!({"image": 5, "input_path": "s3://b/k", "notebook": "n"}), "InvalidParameter" },
)]
fn rejects_bad_bodies(value: Value, expected: &str) {
    let err = RunBody::parse(&json_headers(), &body(value)).unwrap_err();
    assert_eq!(kind(err), expected);
}

#[test]
fn rejects_non_json_content() {
    let err = RunBody::parse(&HeaderMap::new(), b"image=x").unwrap_err();
    assert_eq!(kind(err), "BadContentType");
}

#[test]
fn rejects_malformed_json() {
    let err = RunBody::parse(&json_headers(), b"{\"image\":").unwrap_err();
    assert_eq!(kind(err), "InvalidJson");
}

#[test]
fn rejects_unparseable_parameter_string() {
    let parsed = RunBody::parse(
        &json_headers(),
        &body(json!({"image": "i", "input_path": "s3://b/k", "notebook": "n", "parameters": "x=5"})),
    )
    .unwrap();
    assert_eq!(kind(parsed.into_request().unwrap_err()), "InvalidParameter");
}
