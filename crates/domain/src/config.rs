//! The weekly plan configuration and its canonicalization.
//!
//! The exact byte form of the canonical config determines `manifest_id`
//! (spec §6), so canonicalization is implemented as a standalone,
//! independently testable function rather than inline in the Planner.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One model entry in the weekly plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_id: String,
    pub provider: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Tunable thresholds and run shape, shared by every model/scenario pair
/// in a given week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub max_turns: u32,
    pub judge_model: String,
    #[serde(default = "default_compliance_threshold")]
    pub compliance_threshold: f64,
    #[serde(default = "default_discipline_threshold")]
    pub discipline_threshold: f64,
}

fn default_compliance_threshold() -> f64 {
    0.30
}

fn default_discipline_threshold() -> f64 {
    0.80
}

/// The full weekly plan, as read from the configuration object at a
/// well-known object-store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub models: Vec<ModelConfig>,
    pub scenarios: Vec<String>,
    pub parameters: Parameters,
}

/// Canonicalize a config into its deterministic byte form: keys sorted,
/// no extraneous whitespace, numbers in fixed decimal form.
///
/// `serde_json::Value`'s default (non-`preserve_order`) map representation
/// is a `BTreeMap`, so round-tripping through `Value` already yields
/// lexicographically sorted object keys; `to_string` already omits
/// whitespace. This function exists so the guarantee is named, tested, and
/// not accidentally broken by a future serde_json feature flag flip.
pub fn canonicalize(config: &PipelineConfig) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(config)?;
    serde_json::to_string(&value)
}

/// Hash a canonical config together with a week label into a `manifest_id`.
pub fn manifest_id(canonical_config: &str, week: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_config.as_bytes());
    hasher.update(b"\0");
    hasher.update(week.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hash a `(manifest_id, model_id, scenario_id)` triple into a deterministic
/// `run_id`. Two Planner invocations over the same config and week always
/// produce the same run ids for the same model/scenario pairs.
pub fn run_id(manifest_id: &str, model_id: &str, scenario_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(manifest_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(model_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(scenario_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> PipelineConfig {
        PipelineConfig {
            models: vec![ModelConfig {
                model_id: "gpt-test".to_string(),
                provider: "mock".to_string(),
                temperature: 0.7,
                max_tokens: 200,
            }],
            scenarios: vec!["EL-ETH-UTIL-DEON-01".to_string()],
            parameters: Parameters {
                max_turns: 5,
                judge_model: "judge-test".to_string(),
                compliance_threshold: 0.30,
                discipline_threshold: 0.80,
            },
        }
    }

    #[test]
    fn canonical_round_trip_is_stable() {
        let config = sample_config();
        let once = canonicalize(&config).unwrap();
        let reparsed: PipelineConfig = serde_json::from_str(&once).unwrap();
        let twice = canonicalize(&reparsed).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn manifest_id_is_deterministic_for_same_config_and_week() {
        let config = sample_config();
        let canonical = canonicalize(&config).unwrap();
        let a = manifest_id(&canonical, "2025-W45");
        let b = manifest_id(&canonical, "2025-W45");
        assert_eq!(a, b);
    }

    #[test]
    fn manifest_id_differs_across_weeks() {
        let config = sample_config();
        let canonical = canonicalize(&config).unwrap();
        let w45 = manifest_id(&canonical, "2025-W45");
        let w46 = manifest_id(&canonical, "2025-W46");
        assert_ne!(w45, w46);
    }

    #[test]
    fn run_id_is_deterministic_per_model_scenario_pair() {
        let mid = "abc123";
        let a = run_id(mid, "gpt-test", "EL-ETH-UTIL-DEON-01");
        let b = run_id(mid, "gpt-test", "EL-ETH-UTIL-DEON-01");
        let c = run_id(mid, "gpt-test", "MA-OTHER-02");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
