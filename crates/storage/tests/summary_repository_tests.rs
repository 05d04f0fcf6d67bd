#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use sqlx::PgPool;

use socratic_bench_domain::config::Parameters;
use socratic_bench_domain::judge::{Heuristics, RubricScores};
use socratic_bench_domain::{Judge, Manifest, Run, RunSummary};
use socratic_bench_storage::{ManifestRepository, RunRepository, SummaryRepository};

fn judge_with(run_id: &str, turn_index: i32, overall: f64) -> Judge {
    Judge {
        run_id: run_id.to_string(),
        turn_index,
        scores: RubricScores {
            verbosity: overall,
            exploratory: overall,
            interrogative: overall,
            overall,
        },
        heuristics: Heuristics {
            has_question: true,
            question_count: 1,
            open_ended: true,
            has_advice: false,
            is_leading: false,
            approx_tokens: 10,
        },
        rationale: "test".to_string(),
        judge_model: "judge-test".to_string(),
        failed: false,
        body_ref: format!("raw/runs/{run_id}/judge_{turn_index:03}.json"),
        created_at: Utc::now(),
    }
}

async fn seed_run(pool: &PgPool, manifest_id: &str, run_id: &str) {
    let manifest = Manifest::new(
        manifest_id.to_string(),
        "2025-W45".to_string(),
        &Parameters {
            max_turns: 2,
            judge_model: "judge-test".to_string(),
            compliance_threshold: 0.30,
            discipline_threshold: 0.80,
        },
        vec![],
        vec!["EL-ETH-UTIL-DEON-01".to_string()],
        Utc::now(),
    );
    ManifestRepository::new(pool.clone())
        .create_if_absent(&manifest)
        .await
        .unwrap();

    let run = Run::new(
        run_id.to_string(),
        manifest_id.to_string(),
        "model-1".to_string(),
        "scenario-1".to_string(),
        "2025-W45".to_string(),
        2,
    );
    RunRepository::new(pool.clone())
        .create_if_absent(&run)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn run_summary_create_if_absent_is_write_once(pool: PgPool) -> Result<(), sqlx::Error> {
    seed_run(&pool, "manifest-1", "run-1").await;
    let repo = SummaryRepository::new(pool);

    let judges = vec![judge_with("run-1", 0, 0.9), judge_with("run-1", 1, 0.9)];
    let summary = RunSummary::compute(
        "run-1",
        "manifest-1",
        "model-1",
        "scenario-1",
        "2025-W45",
        2,
        &judges,
        0.30,
        0.80,
        Utc::now(),
    );

    let first = repo
        .create_run_summary_if_absent(&summary)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    let second = repo
        .create_run_summary_if_absent(&summary)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert!(first);
    assert!(!second);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn weekly_rollup_merge_is_idempotent_under_replay(pool: PgPool) -> Result<(), sqlx::Error> {
    seed_run(&pool, "manifest-2", "run-2").await;
    let repo = SummaryRepository::new(pool);

    let judges = vec![judge_with("run-2", 0, 0.8)];
    let summary = RunSummary::compute(
        "run-2",
        "manifest-2",
        "model-1",
        "scenario-1",
        "2025-W45",
        1,
        &judges,
        0.30,
        0.80,
        Utc::now(),
    );

    let first = repo
        .merge_into_weekly_rollup(&summary, Utc::now())
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    let second = repo
        .merge_into_weekly_rollup(&summary, Utc::now())
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert_eq!(first.run_count, 1);
    assert_eq!(second.run_count, 1);
    assert_eq!(first.run_ids, second.run_ids);

    Ok(())
}
