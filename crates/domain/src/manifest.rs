//! The frozen weekly run manifest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, Parameters};

/// An immutable snapshot of a week's configuration.
///
/// Two Planner invocations with the same config and week produce the same
/// `manifest_id` and never create duplicate downstream Runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_id: String,
    pub week: String,
    pub models: Vec<ModelConfig>,
    pub scenarios: Vec<String>,
    pub max_turns: u32,
    pub judge_model: String,
    pub compliance_threshold: f64,
    pub discipline_threshold: f64,
    pub created_at: DateTime<Utc>,
}

impl Manifest {
    pub fn new(manifest_id: String, week: String, parameters: &Parameters, config_models: Vec<ModelConfig>, scenarios: Vec<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            manifest_id,
            week,
            models: config_models,
            scenarios,
            max_turns: parameters.max_turns,
            judge_model: parameters.judge_model.clone(),
            compliance_threshold: parameters.compliance_threshold,
            discipline_threshold: parameters.discipline_threshold,
            created_at,
        }
    }

    /// Total number of (model, scenario) pairs this manifest fans out into.
    pub fn run_count(&self) -> usize {
        self.models.len() * self.scenarios.len()
    }
}
