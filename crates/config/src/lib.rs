//! Configuration module for the Socratic benchmarking pipeline.

use serde::Deserialize;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration loaded from environment variables.
///
/// Following the reference backend's pattern, every handler constructor
/// takes its dependencies (including these values) explicitly rather than
/// reaching for a process-wide singleton, so tests can substitute.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection URL backing the kv-store and job bus.
    pub database_url: String,
    /// Filesystem root for the object store.
    pub object_store_root: String,
    /// Address to bind the admin/health HTTP surface to.
    pub bind_address: String,
    /// Shared admin key gating the manual Planner trigger and DLQ inspection
    /// endpoints. Empty disables those endpoints.
    pub admin_api_key: String,
    /// Object-store key holding the weekly `PipelineConfig` JSON blob.
    pub pipeline_config_key: String,
    /// Wall-clock interval between automatic Planner ticks. Defaults to one
    /// week; overridable for tests and manual operation.
    pub planner_interval_secs: u64,
    /// Upper bound on concurrently in-flight Runner jobs (spec §5: <= 25).
    pub runner_concurrency: usize,
    /// Upper bound on concurrently in-flight Judge jobs (spec §5: <= 25).
    pub judge_concurrency: usize,
    /// Upper bound on concurrently in-flight Curator jobs (spec §5: <= 10).
    pub curator_concurrency: usize,
    /// `dialogue-jobs` visibility timeout in seconds (spec §4.4: >= 15 min).
    pub dialogue_visibility_timeout_secs: i64,
    /// `judge-jobs` visibility timeout in seconds (spec §4.4: 5 min).
    pub judge_visibility_timeout_secs: i64,
    /// Redelivery count after which a message moves to its DLQ.
    pub max_redeliveries: i32,
    /// Model Gateway retry attempts before promoting to a terminal failure.
    pub gateway_max_retries: u32,
    /// Model Gateway per-call timeout in seconds.
    pub gateway_timeout_secs: u64,
    /// Base URL for the OpenAI-compatible provider adapter.
    pub openai_base_url: String,
    /// API key for the OpenAI-compatible provider adapter. Absent means
    /// any `openai`-family model in the pipeline config falls back to an
    /// unauthenticated request, which upstream will reject -- operators
    /// running only the mock provider can leave this unset.
    pub openai_api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables, applying the same
    /// defaults documented in spec §4.1, §4.4, and §5.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env_var("DATABASE_URL")?,
            object_store_root: env_var_or("OBJECT_STORE_ROOT", "./data/objects"),
            bind_address: env_var_or("BIND_ADDRESS", "0.0.0.0:8090"),
            admin_api_key: env_var_or("ADMIN_API_KEY", ""),
            pipeline_config_key: env_var_or("PIPELINE_CONFIG_KEY", "config/pipeline.json"),
            planner_interval_secs: env_parse_or("PLANNER_INTERVAL_SECS", 7 * 24 * 3600)?,
            runner_concurrency: env_parse_or("RUNNER_CONCURRENCY", 25)?,
            judge_concurrency: env_parse_or("JUDGE_CONCURRENCY", 25)?,
            curator_concurrency: env_parse_or("CURATOR_CONCURRENCY", 10)?,
            dialogue_visibility_timeout_secs: env_parse_or(
                "DIALOGUE_VISIBILITY_TIMEOUT_SECS",
                15 * 60,
            )?,
            judge_visibility_timeout_secs: env_parse_or("JUDGE_VISIBILITY_TIMEOUT_SECS", 5 * 60)?,
            max_redeliveries: env_parse_or("MAX_REDELIVERIES", 3)?,
            gateway_max_retries: env_parse_or("GATEWAY_MAX_RETRIES", 4)?,
            gateway_timeout_secs: env_parse_or("GATEWAY_TIMEOUT_SECS", 60)?,
            openai_base_url: env_var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        })
    }

    pub fn planner_interval(&self) -> Duration {
        Duration::from_secs(self.planner_interval_secs)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}

fn env_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_or_uses_default() {
        let val = env_var_or("NON_EXISTENT_VAR_12345", "default_value");
        assert_eq!(val, "default_value");
    }

    #[test]
    fn env_parse_or_uses_default_when_unset() {
        let val: usize = env_parse_or("NON_EXISTENT_VAR_67890", 25).unwrap();
        assert_eq!(val, 25);
    }
}
