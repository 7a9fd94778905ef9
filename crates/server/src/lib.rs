// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nbrun-server: HTTP API over notebook runs and schedules

mod body;
mod error;
mod routes;
mod state;

pub use body::RunBody;
pub use error::ApiError;
pub use routes::{router, PREFIX};
pub use state::{AppState, AwsServices, ServiceRunner, Services};
