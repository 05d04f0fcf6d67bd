//! Socratic Benchmarks admin/observability HTTP surface.
//!
//! This binary never runs the pipeline itself -- the `worker` binary owns
//! the scheduled Planner tick and the Runner/Judge/Curator consumer loops
//! (spec §5). This crate only exposes read-only health/ready checks plus
//! the one in-scope mutating endpoint: a manual Planner trigger, alongside
//! dead-letter inspection, both gated behind the admin API key.

pub mod handlers;
pub mod middleware;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use socratic_bench_config::AppConfig;
use socratic_bench_domain::{HealthResponse, ReadyResponse};
use socratic_bench_objectstore::ObjectStore;
use socratic_bench_orchestrator::Planner;
use socratic_bench_queue::JobQueue;
use socratic_bench_storage::check_connection;
use sqlx::PgPool;

use handlers::admin::{list_dead_letters, trigger_plan};

/// Application state shared across handlers.
pub struct AppState {
    pub pool: PgPool,
    pub object_store: Arc<dyn ObjectStore>,
    pub queue: JobQueue,
    pub planner: Planner,
    pub config: AppConfig,
    pub start_time: Instant,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/ready", get(ready))
        .route("/v1/admin/plan", post(trigger_plan))
        .route("/v1/admin/dead-letters/{queue}", get(list_dead_letters))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_sha: option_env!("BUILD_SHA").unwrap_or("dev").to_string(),
        uptime_seconds: uptime,
    })
}

/// Readiness check endpoint.
async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let db_status = match check_connection(&state.pool).await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    Json(ReadyResponse {
        status: if db_status == "connected" {
            "ok"
        } else {
            "degraded"
        }
        .to_string(),
        database: db_status.to_string(),
    })
}
