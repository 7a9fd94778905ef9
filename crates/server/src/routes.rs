// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes under `/notebook-runner/`.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use nbrun_core::{JobName, RuleName};
use nbrun_engine::ScheduleRequest;
use serde_json::{json, Value};

use crate::body::RunBody;
use crate::error::ApiError;
use crate::state::{AppState, Services};

pub const PREFIX: &str = "/notebook-runner";

/// How many schedules `GET schedules` describes.
const SCHEDULE_LIST_LIMIT: usize = 20;

type ApiResult<T> = Result<T, ApiError>;

pub fn router<B: Services>(state: AppState<B>) -> Router {
    let api = Router::new()
        .route("/runs", get(list_runs::<B>))
        .route("/run", post(start_run::<B>))
        .route("/run/{job}", get(get_run::<B>).delete(stop_run::<B>))
        .route("/output/{job}", get(get_output::<B>))
        .route("/schedules", get(list_schedules::<B>))
        .route(
            "/schedule/{rule}",
            get(get_schedule::<B>)
                .post(create_schedule::<B>)
                .delete(delete_schedule::<B>),
        )
        .route("/upload", put(upload::<B>))
        .with_state(state);
    Router::new()
        .nest(PREFIX, api)
        .layer(middleware::from_fn(log_request))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Refresh the shared tracker and return its runs, newest first.
///
/// A failed refresh still returns the runs it left behind, next to the
/// error.
async fn list_runs<B: Services>(State(state): State<AppState<B>>) -> Response {
    let mut tracker = state.tracker.lock().await;
    let refreshed = tracker.refresh().await;
    let runs: Vec<_> = tracker.iter().rev().collect();
    match refreshed {
        Ok(outcome) => {
            tracing::debug!(?outcome, "tracker refreshed");
            Json(json!({ "runs": runs })).into_response()
        }
        Err(e) => {
            let (status, mut body) = ApiError::from(e).render();
            body["runs"] = json!(runs);
            (status, Json(body)).into_response()
        }
    }
}

async fn get_run<B: Services>(
    State(state): State<AppState<B>>,
    Path(job): Path<String>,
) -> ApiResult<Json<Value>> {
    let run = state.runner.describe_run(&JobName::new(job)).await?;
    Ok(Json(json!({ "run": run })))
}

async fn stop_run<B: Services>(
    State(state): State<AppState<B>>,
    Path(job): Path<String>,
) -> ApiResult<StatusCode> {
    state.runner.stop_run(&JobName::new(job)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn start_run<B: Services>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let request = RunBody::parse(&headers, &body)?.into_request()?;
    let job = state.runner.invoke(request).await?;
    Ok(Json(json!({ "job_name": job })))
}

/// The executed notebook of a run, inline.
async fn get_output<B: Services>(
    State(state): State<AppState<B>>,
    Path(job): Path<String>,
) -> ApiResult<Json<Value>> {
    let job = JobName::new(job);
    let run = state.runner.describe_run(&job).await?;
    let bytes = state.runner.fetch_output(&job).await?;
    Ok(Json(json!({
        "notebook": run.notebook_name,
        "output_object": run.result_location,
        "data": String::from_utf8_lossy(&bytes),
    })))
}

async fn list_schedules<B: Services>(State(state): State<AppState<B>>) -> ApiResult<Json<Value>> {
    let schedules = state
        .runner
        .describe_schedules(SCHEDULE_LIST_LIMIT, None)
        .await?;
    Ok(Json(json!({ "schedules": schedules })))
}

async fn get_schedule<B: Services>(
    State(state): State<AppState<B>>,
    Path(rule): Path<String>,
) -> ApiResult<Json<Value>> {
    let schedule = state.runner.describe_schedule(&RuleName::new(rule)).await?;
    Ok(Json(json!({ "schedules": [schedule] })))
}

async fn create_schedule<B: Services>(
    State(state): State<AppState<B>>,
    Path(rule): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let body = RunBody::parse(&headers, &body)?;
    let rule_name = RuleName::new(rule);
    let request = ScheduleRequest {
        rule_name: rule_name.clone(),
        schedule: body.schedule.clone().filter(|s| !s.is_empty()),
        event_pattern: body.event_pattern.clone().filter(|p| !p.is_empty()),
        run: body.into_request()?,
    };
    state.runner.schedule(request).await?;
    Ok(Json(json!({ "rule_name": rule_name })))
}

async fn delete_schedule<B: Services>(
    State(state): State<AppState<B>>,
    Path(rule): Path<String>,
) -> ApiResult<StatusCode> {
    state.runner.unschedule(&RuleName::new(rule)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn upload<B: Services>(State(state): State<AppState<B>>, body: Bytes) -> ApiResult<Json<Value>> {
    let uri = state.runner.upload_notebook(body.to_vec()).await?;
    Ok(Json(json!({ "s3Object": uri })))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
