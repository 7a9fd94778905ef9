// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queued failures for fake services
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::RemoteError;
use std::collections::{HashMap, VecDeque};

/// Per-operation queue of errors to return before succeeding.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFailures {
    queued: HashMap<String, VecDeque<RemoteError>>,
}

impl ScriptedFailures {
    pub(crate) fn push(&mut self, op: impl Into<String>, error: RemoteError) {
        self.queued.entry(op.into()).or_default().push_back(error);
    }

    /// Next queued error for `op`, consuming it.
    pub(crate) fn take(&mut self, op: &str) -> Option<RemoteError> {
        self.queued.get_mut(op).and_then(VecDeque::pop_front)
    }
}
