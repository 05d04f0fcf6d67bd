//! Socratic Benchmarks admin/observability server.

use std::sync::Arc;
use std::time::Instant;

use socratic_bench_api::{build_router, AppState};
use socratic_bench_config::AppConfig;
use socratic_bench_objectstore::{FsObjectStore, ObjectStore};
use socratic_bench_orchestrator::Planner;
use socratic_bench_queue::JobQueue;
use socratic_bench_storage::{create_pool, run_migrations, ManifestRepository, RunRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Socratic Benchmarks admin server...");

    let config = AppConfig::from_env()?;
    tracing::info!("Binding to {}", config.bind_address);

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let object_store: Arc<dyn ObjectStore> =
        Arc::new(FsObjectStore::new(config.object_store_root.clone()));
    let queue = JobQueue::new(pool.clone());

    let planner = Planner::new(
        ManifestRepository::new(pool.clone()),
        RunRepository::new(pool.clone()),
        queue.clone(),
        object_store.clone(),
        config.max_redeliveries,
    );

    let state = Arc::new(AppState {
        pool,
        object_store,
        queue,
        planner,
        config: config.clone(),
        start_time: Instant::now(),
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
