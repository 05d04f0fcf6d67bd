use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations_sqlite");
static COUNTER: AtomicU64 = AtomicU64::new(1);

pub struct SqliteTestDb {
    pub pool: SqlitePool,
    pub db_path: PathBuf,
    keep_db: bool,
}

impl Drop for SqliteTestDb {
    fn drop(&mut self) {
        if self.keep_db {
            return;
        }

        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub async fn setup_test_db() -> Result<SqliteTestDb, sqlx::Error> {
    let keep_db = std::env::var("TEST_KEEP_DB").ok().as_deref() == Some("1");
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
    let db_path = std::env::temp_dir().join(format!(
        "socratic-bench-storage-sqlite-test-{}-{}.db",
        std::process::id(),
        unique
    ));

    if db_path.exists() {
        let _ = std::fs::remove_file(&db_path);
    }

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    Ok(SqliteTestDb {
        pool,
        db_path,
        keep_db,
    })
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Protocol(format!("sqlite migration failed: {e}")))
}

pub async fn seed_common_fixtures(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO manifests (manifest_id, week, config_json, run_count, created_at) VALUES (?1, ?2, ?3, ?4, STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))",
    )
    .bind("manifest-1")
    .bind("2025-W45")
    .bind("{}")
    .bind(1_i64)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO runs (run_id, manifest_id, model_id, scenario_id, week, status, n_turns_planned, started_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))",
    )
    .bind("run-1")
    .bind("manifest-1")
    .bind("model-1")
    .bind("scenario-1")
    .bind("2025-W45")
    .bind("queued")
    .bind(3_i64)
    .execute(pool)
    .await?;

    Ok(())
}
