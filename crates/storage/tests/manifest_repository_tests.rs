#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use sqlx::PgPool;

use socratic_bench_domain::config::Parameters;
use socratic_bench_domain::Manifest;
use socratic_bench_storage::ManifestRepository;

fn sample_manifest(manifest_id: &str) -> Manifest {
    Manifest::new(
        manifest_id.to_string(),
        "2025-W45".to_string(),
        &Parameters {
            max_turns: 5,
            judge_model: "judge-test".to_string(),
            compliance_threshold: 0.30,
            discipline_threshold: 0.80,
        },
        vec![],
        vec!["EL-ETH-UTIL-DEON-01".to_string()],
        Utc::now(),
    )
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_if_absent_returns_true_only_once(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = ManifestRepository::new(pool);
    let manifest = sample_manifest("manifest-1");

    let first = repo
        .create_if_absent(&manifest)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    let second = repo
        .create_if_absent(&manifest)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert!(first);
    assert!(!second);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_round_trips_the_stored_manifest(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = ManifestRepository::new(pool);
    let manifest = sample_manifest("manifest-2");

    repo.create_if_absent(&manifest)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let fetched = repo
        .get("manifest-2")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?
        .expect("manifest should exist");

    assert_eq!(fetched.manifest_id, manifest.manifest_id);
    assert_eq!(fetched.scenarios, manifest.scenarios);
    assert_eq!(fetched.judge_model, manifest.judge_model);

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_returns_none_for_unknown_id(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = ManifestRepository::new(pool);

    let fetched = repo
        .get("no-such-manifest")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert!(fetched.is_none());

    Ok(())
}
