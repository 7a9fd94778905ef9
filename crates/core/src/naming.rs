// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and output file naming.
//!
//! Job names carry a fixed prefix so that runs created by this tool can be
//! told apart from other jobs in the same account. The remote service caps
//! names at 63 characters, so the notebook stem is truncated to leave room
//! for the timestamp suffix.

use crate::id::JobName;
use chrono::{DateTime, Utc};

/// Prefix of every job name created by this tool.
pub const JOB_PREFIX: &str = "papermill-";

/// Timestamp format shared by job names, output files, and uploads.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

const MAX_NAME_LEN: usize = 62;

/// Names derived from a notebook file name and a submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobNaming {
    pub job_name: JobName,
    /// File name of the executed notebook inside the output prefix.
    pub result_file: String,
    /// Basename of the source notebook.
    pub notebook: String,
}

impl JobNaming {
    pub fn new(notebook: &str, at: DateTime<Utc>) -> Self {
        let base = basename(notebook);
        let (stem, ext) = split_ext(base);
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();

        let sanitized: String = stem
            .chars()
            .map(|c| if c == '-' || c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let mut head = format!("{JOB_PREFIX}{sanitized}");
        head.truncate(MAX_NAME_LEN.saturating_sub(timestamp.len()));

        Self {
            job_name: JobName::new(format!("{head}-{timestamp}")),
            result_file: format!("{stem}-{timestamp}{ext}"),
            notebook: base.to_string(),
        }
    }
}

/// Object key for an uploaded notebook.
pub fn upload_key(at: DateTime<Utc>) -> String {
    format!("papermill_input/notebook-{}.ipynb", at.format(TIMESTAMP_FORMAT))
}

/// Final path component of a `/`-separated path or URI.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the final `/` of a path or URI (empty if none).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Split a file name into stem and extension (extension keeps its dot).
///
/// A leading dot does not start an extension (`.hidden` has none).
pub fn split_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && !name[..idx].chars().all(|c| c == '.') => {
            (&name[..idx], &name[idx..])
        }
        _ => (name, ""),
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
