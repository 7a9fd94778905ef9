// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote call errors

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors from calls to remote services
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The service is rate limiting this caller; safe to retry.
    #[error("request throttled: {0}")]
    Throttled(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    /// The call never produced a service answer (spawn failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, RemoteError::Throttled(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }

    /// Service error code, when the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            RemoteError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static CLI_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"An error occurred \(([^)]+)\) when calling the \w+ operation(?: \([^)]*\))?: (.*)")
        .expect("constant regex pattern is valid")
});

const THROTTLE_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
];

const NOT_FOUND_CODES: &[&str] = &[
    "ResourceNotFoundException",
    "ResourceNotFound",
    "NoSuchEntity",
    "NoSuchKey",
    "NoSuchBucket",
    "404",
];

/// Classify the stderr of a failed CLI call.
pub fn classify_cli_error(stderr: &str) -> RemoteError {
    let stderr = stderr.trim();
    let Some(caps) = CLI_ERROR.captures(stderr) else {
        return RemoteError::service("Unknown", stderr);
    };
    let code = caps.get(1).map_or("", |m| m.as_str());
    let message = caps.get(2).map_or("", |m| m.as_str()).trim();

    if THROTTLE_CODES.contains(&code) {
        RemoteError::Throttled(message.to_string())
    } else if NOT_FOUND_CODES.contains(&code)
        || message.contains("does not exist")
        || message.contains("is not found")
        || message.starts_with("Could not find")
    {
        RemoteError::NotFound(message.to_string())
    } else {
        RemoteError::service(code, message)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
