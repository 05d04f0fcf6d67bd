//! Builds the worker's [`ModelGateway`] from the live `PipelineConfig` plus
//! the compiled-in scenario registry.
//!
//! The registry is "fixed, config-driven" per spec §4.1: it is built once
//! at worker startup from the config snapshot the first Planner tick will
//! also plan against, not rebuilt per message. A model id that appears in
//! `PipelineConfig.models` routes through the provider family it declares;
//! any other model id the pipeline can still reference -- the configured
//! `judge_model`, or a scenario's simulated-student model id -- falls back
//! to the mock provider so the pipeline is runnable without every model
//! needing a real upstream credential.

use std::collections::HashMap;
use std::sync::Arc;

use socratic_bench_config::AppConfig;
use socratic_bench_domain::config::PipelineConfig;
use socratic_bench_gateway::{MockProvider, ModelGateway, OpenAiCompatibleProvider, Provider};
use socratic_bench_scenarios::StudentReplyPolicy;

const MOCK_FAMILY: &str = "mock";
const OPENAI_FAMILY: &str = "openai";

pub fn build_gateway(config: &AppConfig, pipeline_config: &PipelineConfig) -> ModelGateway {
    let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();
    providers.insert(MOCK_FAMILY.to_string(), Arc::new(MockProvider::new()));
    providers.insert(
        OPENAI_FAMILY.to_string(),
        Arc::new(OpenAiCompatibleProvider::new(
            OPENAI_FAMILY,
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
        )),
    );

    let mut model_registry: HashMap<String, String> = HashMap::new();
    for model in &pipeline_config.models {
        let family = if providers.contains_key(&model.provider) {
            model.provider.clone()
        } else {
            MOCK_FAMILY.to_string()
        };
        model_registry.insert(model.model_id.clone(), family);
    }

    model_registry
        .entry(pipeline_config.parameters.judge_model.clone())
        .or_insert_with(|| MOCK_FAMILY.to_string());

    for scenario_id in socratic_bench_scenarios::all_scenario_ids() {
        if let Some(scenario) = socratic_bench_scenarios::scenario_by_id(&scenario_id) {
            if let StudentReplyPolicy::Simulated { model_id, .. } = scenario.student_reply_policy {
                model_registry.entry(model_id).or_insert_with(|| MOCK_FAMILY.to_string());
            }
        }
    }

    ModelGateway::new(
        providers,
        model_registry,
        config.gateway_max_retries,
        config.gateway_timeout(),
    )
}
