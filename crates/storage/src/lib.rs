//! Postgres-backed kv-store for the benchmarking pipeline: manifests, runs,
//! turns, judges, and curated summaries/rollups.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod judge_repository;
pub mod manifest_repository;
pub mod run_repository;
pub mod summary_repository;
pub mod turn_repository;

pub use error::StorageError;
pub use judge_repository::JudgeRepository;
pub use manifest_repository::ManifestRepository;
pub use run_repository::RunRepository;
pub use summary_repository::SummaryRepository;
pub use turn_repository::TurnRepository;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, StorageError> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(StorageError::Connection)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)
}

/// Check database connectivity.
pub async fn check_connection(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StorageError::Query)?;
    Ok(())
}
