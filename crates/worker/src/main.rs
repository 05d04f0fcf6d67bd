//! The Socratic Benchmarks pipeline worker: the scheduled Planner tick
//! plus the Runner, Judge, and Curator consumer loops (spec §4.5, §5).
//!
//! This binary owns every suspension point in the pipeline. The `api`
//! binary is a separate process that only serves health checks, a manual
//! Planner trigger, and dead-letter inspection -- it never claims queue
//! messages itself.

mod consumers;
mod gateway_bootstrap;

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use socratic_bench_config::AppConfig;
use socratic_bench_objectstore::{FsObjectStore, ObjectStore};
use socratic_bench_orchestrator::{
    load_pipeline_config, Curator, DialogueRunner, JudgeHandler, Planner,
};
use socratic_bench_orchestrator::{DialogueJob, JudgeJob, RunJudgedEvent};
use socratic_bench_queue::{JobQueue, DIALOGUE_JOBS, JUDGE_JOBS, RUN_JUDGED};
use socratic_bench_storage::{
    create_pool, run_migrations, JudgeRepository, ManifestRepository, RunRepository,
    SummaryRepository, TurnRepository,
};

use consumers::spawn_consumers;
use gateway_bootstrap::build_gateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Socratic Benchmarks pipeline worker...");

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let object_store: Arc<dyn ObjectStore> =
        Arc::new(FsObjectStore::new(config.object_store_root.clone()));
    let queue = JobQueue::new(pool.clone());

    let pipeline_config = load_pipeline_config(&object_store, &config.pipeline_config_key).await?;
    let gateway = build_gateway(&config, &pipeline_config);

    let manifest_repo = ManifestRepository::new(pool.clone());
    let run_repo = RunRepository::new(pool.clone());
    let turn_repo = TurnRepository::new(pool.clone());
    let judge_repo = JudgeRepository::new(pool.clone());
    let summary_repo = SummaryRepository::new(pool.clone());

    let planner = Arc::new(Planner::new(
        manifest_repo.clone(),
        run_repo.clone(),
        queue.clone(),
        object_store.clone(),
        config.max_redeliveries,
    ));

    let runner = Arc::new(DialogueRunner::new(
        manifest_repo.clone(),
        run_repo.clone(),
        turn_repo,
        judge_repo.clone(),
        object_store.clone(),
        queue.clone(),
        gateway.clone(),
        config.max_redeliveries,
    ));

    let judge_handler = Arc::new(JudgeHandler::new(
        judge_repo.clone(),
        run_repo.clone(),
        object_store.clone(),
        gateway,
        queue.clone(),
        config.max_redeliveries,
    ));

    let curator = Arc::new(Curator::new(
        manifest_repo,
        run_repo,
        judge_repo,
        summary_repo,
        object_store.clone(),
    ));

    spawn_consumers(
        queue.clone(),
        DIALOGUE_JOBS,
        config.dialogue_visibility_timeout_secs,
        config.max_redeliveries,
        config.runner_concurrency,
        runner,
        |runner, job: DialogueJob| async move {
            runner.handle(&job).await.map(|_| ())
        },
    );

    spawn_consumers(
        queue.clone(),
        JUDGE_JOBS,
        config.judge_visibility_timeout_secs,
        config.max_redeliveries,
        config.judge_concurrency,
        judge_handler,
        |handler, job: JudgeJob| async move { handler.handle(&job).await.map(|_| ()) },
    );

    // `run-judged` is an event bus, not a retry-bounded work queue, but it
    // rides the same at-least-once queue primitive (spec §4.4): dead
    // lettering still applies past `max_redeliveries` so a permanently
    // broken Curator doesn't spin forever.
    spawn_consumers(
        queue.clone(),
        RUN_JUDGED,
        config.judge_visibility_timeout_secs,
        config.max_redeliveries,
        config.curator_concurrency,
        curator,
        |curator, event: RunJudgedEvent| async move { curator.handle(&event).await.map(|_| ()) },
    );

    tracing::info!(
        runner_concurrency = config.runner_concurrency,
        judge_concurrency = config.judge_concurrency,
        curator_concurrency = config.curator_concurrency,
        "consumer loops started"
    );

    run_planner_loop(planner, object_store, config).await;

    Ok(())
}

/// Plan once at startup (so a freshly deployed worker doesn't wait a full
/// week for its first manifest), then again on every `planner_interval`
/// tick. Both paths share the Planner's idempotent-planning guarantee
/// (spec §8), so an overlapping manual trigger via the `api` binary never
/// produces a duplicate manifest or run.
async fn run_planner_loop(
    planner: Arc<Planner>,
    object_store: Arc<dyn ObjectStore>,
    config: AppConfig,
) -> ! {
    let mut interval = tokio::time::interval(config.planner_interval());
    loop {
        interval.tick().await;

        let week = current_iso_week();
        match load_pipeline_config(&object_store, &config.pipeline_config_key).await {
            Ok(pipeline_config) => match planner.plan(&pipeline_config, &week, Utc::now()).await {
                Ok(outcome) => tracing::info!(
                    week,
                    manifest_id = outcome.manifest_id,
                    newly_planned = outcome.newly_planned,
                    runs_created = outcome.runs_created,
                    "planner tick complete"
                ),
                Err(err) => tracing::error!(week, error = %err, "planner tick failed"),
            },
            Err(err) => tracing::error!(error = %err, "failed to load pipeline config for planner tick"),
        }
    }
}

fn current_iso_week() -> String {
    let now = Utc::now();
    let iso = now.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
