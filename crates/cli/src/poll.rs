// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling loop for commands that follow runs until something changes.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Result of waiting for the next poll tick.
pub enum Tick {
    Ready,
    /// The deadline was reached.
    Timeout,
    /// Ctrl+C was pressed.
    Interrupted,
}

/// Interval timer with an optional deadline and Ctrl+C handling.
///
/// The first tick is immediate so a watch shows data at once.
pub struct Poller {
    interval: Duration,
    deadline: Option<Instant>,
    started: bool,
    ctrl_c: Pin<Box<dyn Future<Output = std::io::Result<()>>>>,
}

impl Poller {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            interval,
            deadline: timeout.map(|t| Instant::now() + t),
            started: false,
            ctrl_c: Box::pin(tokio::signal::ctrl_c()),
        }
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Wait for the next tick; the deadline is checked before and after
    /// sleeping.
    pub async fn tick(&mut self) -> Tick {
        if self.expired() {
            return Tick::Timeout;
        }
        if !self.started {
            self.started = true;
            return Tick::Ready;
        }

        tokio::select! {
            _ = &mut self.ctrl_c => Tick::Interrupted,
            _ = tokio::time::sleep(self.interval) => {
                if self.expired() {
                    Tick::Timeout
                } else {
                    Tick::Ready
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
