// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared human-readable time formatting for run listings.

use chrono::{DateTime, Local, Utc};

/// Format seconds as `H:MM:SS`: `"0:00:54"`, `"1:02:03"`, `"26:00:00"`.
///
/// Hours are not rolled into days; runs are capped well below a day.
pub fn format_elapsed(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h}:{m:02}:{s:02}")
}

/// Format milliseconds as `H:MM:SS`, dropping the fraction.
pub fn format_elapsed_ms(ms: u64) -> String {
    format_elapsed(ms / 1000)
}

/// Format an optional elapsed duration; absent durations render empty.
pub fn format_elapsed_opt(ms: Option<u64>) -> String {
    ms.map(format_elapsed_ms).unwrap_or_default()
}

/// Format an optional timestamp in local time for tables.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
