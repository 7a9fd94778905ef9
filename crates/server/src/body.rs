// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request bodies for starting and scheduling runs.

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use nbrun_core::{Parameters, SubmissionOverrides};
use nbrun_engine::InvokeRequest;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

const REQUIRED: [&str; 3] = ["image", "input_path", "notebook"];

/// Body of `POST run` and `POST schedule/{rule}`.
#[derive(Debug, Deserialize)]
pub struct RunBody {
    pub image: String,
    pub input_path: String,
    pub notebook: String,
    /// A JSON object, or a string holding one.
    #[serde(default)]
    pub parameters: Option<Value>,
    pub output_prefix: Option<String>,
    pub role: Option<String>,
    pub instance_type: Option<String>,
    pub schedule: Option<String>,
    pub event_pattern: Option<String>,
    #[serde(default)]
    pub extra_args: SubmissionOverrides,
}

impl RunBody {
    /// Parse a JSON body, checking the content type and required keys.
    pub fn parse(headers: &HeaderMap, body: &[u8]) -> Result<Self, ApiError> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !content_type.starts_with("application/json") {
            return Err(ApiError::bad_request(
                "BadContentType",
                format!("expected 'application/json' content, got '{content_type}'"),
            ));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request("InvalidJson", format!("JSON parser error: {e}")))?;
        let Some(object) = value.as_object() else {
            return Err(ApiError::bad_request("InvalidJson", "body must be a JSON object"));
        };
        if let Some(missing) = REQUIRED.iter().find(|key| !object.contains_key(**key)) {
            return Err(ApiError::bad_request(
                "MissingParameter",
                format!("the parameter '{missing}' must be supplied"),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ApiError::bad_request("InvalidParameter", e.to_string()))
    }

    fn parameters(&self) -> Result<Parameters, ApiError> {
        let invalid = |e: serde_json::Error| {
            ApiError::bad_request("InvalidParameter", format!("parameters: {e}"))
        };
        match &self.parameters {
            None | Some(Value::Null) => Ok(Parameters::new()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Parameters::new()),
            Some(Value::String(s)) => serde_json::from_str(s).map_err(invalid),
            Some(other) => serde_json::from_value(other.clone()).map_err(invalid),
        }
    }

    pub fn into_request(self) -> Result<InvokeRequest, ApiError> {
        let parameters = self.parameters()?;
        Ok(InvokeRequest {
            notebook: self.notebook,
            image: Some(self.image),
            input_path: Some(self.input_path),
            output_prefix: self.output_prefix.filter(|p| !p.is_empty()),
            parameters,
            role: self.role.filter(|r| !r.is_empty()),
            instance_type: self.instance_type.filter(|t| !t.is_empty()),
            extra_args: self.extra_args,
            overrides: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "body_tests.rs"]
mod tests;
