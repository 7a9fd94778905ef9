// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! API errors and their JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nbrun_engine::EngineError;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The request itself is unusable.
    #[error("{message}")]
    BadRequest { kind: &'static str, message: String },
}

impl ApiError {
    pub fn bad_request(kind: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            kind,
            message: message.into(),
        }
    }

    /// HTTP status and error type name.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest { kind, .. } => (StatusCode::BAD_REQUEST, *kind),
            ApiError::Engine(err) => match err {
                EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
                EngineError::Configuration(_) => (StatusCode::BAD_REQUEST, "ConfigurationError"),
                EngineError::Invoke(_) => (StatusCode::BAD_REQUEST, "InvokeException"),
                EngineError::IndexOutOfRange { .. } => (StatusCode::BAD_REQUEST, "IndexOutOfRange"),
                EngineError::Remote(_) => (StatusCode::BAD_GATEWAY, "RemoteError"),
                EngineError::Io(_) | EngineError::Json(_) | EngineError::Task(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
                }
            },
        }
    }
}

impl ApiError {
    /// Status and JSON body; server-side failures are logged.
    pub fn render(&self) -> (StatusCode, Value) {
        let (status, kind) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self, kind, "request failed");
        } else {
            tracing::debug!(error = %self, kind, "request rejected");
        }
        let body = json!({
            "error": { "type": kind, "message": self.to_string() }
        });
        (status, body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.render();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
