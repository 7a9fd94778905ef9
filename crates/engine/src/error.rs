// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use nbrun_adapters::RemoteError;
use nbrun_core::ConfigError;
use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// A remote call failed with something other than throttling or a
    /// missing resource.
    #[error("remote service error: {0}")]
    Remote(RemoteError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("index {index} out of range for {len} tracked runs")]
    IndexOutOfRange { index: usize, len: usize },
    /// The submission function answered with an error message.
    #[error("invoke failed: {0}")]
    Invoke(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<RemoteError> for EngineError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::NotFound(message) => EngineError::NotFound(message),
            other => EngineError::Remote(other),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Configuration(e.to_string())
    }
}

impl EngineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        EngineError::Configuration(message.into())
    }
}
