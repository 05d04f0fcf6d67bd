#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use sqlx::PgPool;

use socratic_bench_domain::config::Parameters;
use socratic_bench_domain::judge::{Heuristics, RubricScores};
use socratic_bench_domain::{Judge, Manifest, Run, Turn};
use socratic_bench_storage::{JudgeRepository, ManifestRepository, RunRepository, TurnRepository};

async fn seed_run(pool: &PgPool, manifest_id: &str, run_id: &str) {
    let manifest = Manifest::new(
        manifest_id.to_string(),
        "2025-W45".to_string(),
        &Parameters {
            max_turns: 3,
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
async fn turn_create_if_absent_is_write_once(pool: PgPool) -> Result<(), sqlx::Error> {
    seed_run(&pool, "manifest-1", "run-1").await;
    let repo = TurnRepository::new(pool);

    let turn = Turn {
        run_id: "run-1".to_string(),
        turn_index: 0,
        student_prompt: "What is justice?".to_string(),
        ai_response: "What do you think justice requires?".to_string(),
        tokens_in: 12,
        tokens_out: 9,
        latency_ms: 420,
        created_at: Utc::now(),
        body_ref: "raw/runs/run-1/turn_000.json".to_string(),
    };

    let first = repo
        .create_if_absent(&turn, "tutor")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    let second = repo
        .create_if_absent(&turn, "tutor")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert!(first);
    assert!(!second);

    let body_ref = repo
        .get_body_ref("run-1", 0)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(body_ref.as_deref(), Some("raw/runs/run-1/turn_000.json"));

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn judge_list_for_run_round_trips_scores_and_heuristics(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    seed_run(&pool, "manifest-2", "run-2").await;
    let repo = JudgeRepository::new(pool);

    let judge = Judge {
        run_id: "run-2".to_string(),
        turn_index: 0,
        scores: RubricScores::from_dimensions(0.8, 0.6, 0.9),
        heuristics: Heuristics {
            has_question: true,
            question_count: 2,
            open_ended: true,
            has_advice: false,
            is_leading: false,
            approx_tokens: 11,
        },
        rationale: "Probes the student's reasoning without supplying an answer.".to_string(),
        judge_model: "judge-test".to_string(),
        failed: false,
        body_ref: "raw/runs/run-2/judge_000.json".to_string(),
        created_at: Utc::now(),
    };

    repo.create_if_absent(&judge)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let fetched = repo
        .list_for_run("run-2")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert_eq!(fetched.len(), 1);
    assert!((fetched[0].scores.overall - judge.scores.overall).abs() < 1e-9);
    assert_eq!(fetched[0].heuristics.question_count, 2);

    Ok(())
}
