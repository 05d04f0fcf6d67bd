//! Shared helper for loading the weekly `PipelineConfig` blob, used by both
//! the `worker` and `api` binaries so a manual Planner trigger and the
//! scheduled timer always plan against the same configuration.

use std::sync::Arc;

use socratic_bench_domain::config::{ModelConfig, Parameters, PipelineConfig};
use socratic_bench_objectstore::{ObjectStore, ObjectStoreJsonExt};

use crate::error::OrchestratorError;

/// Load the `PipelineConfig` at `pipeline_config_key`, falling back to a
/// small built-in default (one mock model, every compiled-in scenario) so
/// the pipeline is runnable out of the box without an operator having to
/// hand-author a config blob first.
pub async fn load_pipeline_config(
    object_store: &Arc<dyn ObjectStore>,
    pipeline_config_key: &str,
) -> Result<PipelineConfig, OrchestratorError> {
    if let Some(config) = object_store.get_json::<PipelineConfig>(pipeline_config_key).await? {
        return Ok(config);
    }

    Ok(default_pipeline_config())
}

fn default_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        models: vec![ModelConfig {
            model_id: "mock-default".to_string(),
            provider: "mock".to_string(),
            temperature: 0.7,
            max_tokens: 400,
        }],
        scenarios: socratic_bench_scenarios::all_scenario_ids(),
        parameters: Parameters {
            max_turns: 5,
            judge_model: "mock-default".to_string(),
            compliance_threshold: 0.30,
            discipline_threshold: 0.80,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socratic_bench_objectstore::FsObjectStore;

    #[tokio::test]
    async fn falls_back_to_the_default_config_when_no_blob_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(dir.path()));

        let config = load_pipeline_config(&store, "config/pipeline.json").await.unwrap();
        assert_eq!(config.models.len(), 1);
        assert_eq!(config.scenarios.len(), 3);
    }

    #[tokio::test]
    async fn loads_the_stored_blob_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::new(dir.path()));
        let stored = PipelineConfig {
            models: vec![ModelConfig {
                model_id: "gpt-test".to_string(),
                provider: "openai".to_string(),
                temperature: 0.5,
                max_tokens: 300,
            }],
            scenarios: vec!["EL-ETH-UTIL-DEON-01".to_string()],
            parameters: Parameters {
                max_turns: 3,
                judge_model: "judge-test".to_string(),
                compliance_threshold: 0.30,
                discipline_threshold: 0.80,
            },
        };
        store.put_json("config/pipeline.json", &stored).await.unwrap();

        let loaded = load_pipeline_config(&store, "config/pipeline.json").await.unwrap();
        assert_eq!(loaded, stored);
    }
}
