//! Manual Planner trigger and dead-letter inspection (spec §6, supplemented
//! operator surface -- the scheduled Planner tick in the `worker` binary
//! covers the normal weekly cadence).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use socratic_bench_domain::DomainError;
use socratic_bench_orchestrator::{load_pipeline_config, PlanOutcome};

use crate::middleware::auth::AdminApiKey;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct PlanRequest {
    /// ISO week to plan, e.g. `"2025-W45"`. Defaults to the current week.
    pub week: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub manifest_id: String,
    pub newly_planned: bool,
    pub runs_created: usize,
}

/// `POST /v1/admin/plan` -- load the current `PipelineConfig` blob and run
/// the Planner against it for the requested (or current) week. Safe to call
/// more than once for the same week: the Planner's own idempotent-planning
/// invariant (spec §8) means a repeat call is a no-op fan-out-wise.
pub async fn trigger_plan(
    State(state): State<Arc<AppState>>,
    _admin: AdminApiKey,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, DomainError> {
    let week = request.week.unwrap_or_else(current_iso_week);

    let config = load_pipeline_config(&state.object_store, &state.config.pipeline_config_key)
        .await
        .map_err(|err| DomainError::Internal(err.into()))?;

    let PlanOutcome {
        manifest_id,
        newly_planned,
        runs_created,
    } = state
        .planner
        .plan(&config, &week, Utc::now())
        .await
        .map_err(|err| DomainError::Internal(err.into()))?;

    Ok(Json(PlanResponse {
        manifest_id,
        newly_planned,
        runs_created,
    }))
}

#[derive(Debug, Serialize)]
pub struct DeadLetterResponse {
    pub id: i64,
    pub queue_name: String,
    pub payload: serde_json::Value,
    pub delivery_count: i32,
    pub dead_lettered_at: Option<chrono::DateTime<Utc>>,
}

/// `GET /v1/admin/dead-letters/{queue}` -- list messages that exhausted
/// their redelivery budget on the named queue, for operator triage.
pub async fn list_dead_letters(
    State(state): State<Arc<AppState>>,
    _admin: AdminApiKey,
    Path(queue_name): Path<String>,
) -> Result<Json<Vec<DeadLetterResponse>>, DomainError> {
    let dead_letters = state
        .queue
        .list_dead_letters(&queue_name)
        .await
        .map_err(|err| DomainError::Internal(err.into()))?;

    Ok(Json(
        dead_letters
            .into_iter()
            .map(|dl| DeadLetterResponse {
                id: dl.id,
                queue_name: dl.queue_name,
                payload: dl.payload,
                delivery_count: dl.delivery_count,
                dead_lettered_at: dl.dead_lettered_at,
            })
            .collect(),
    ))
}

fn current_iso_week() -> String {
    let now = Utc::now();
    let iso = now.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
