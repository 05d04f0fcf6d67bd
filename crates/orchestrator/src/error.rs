//! Orchestrator error taxonomy (spec §7), composing every collaborator's
//! error type so handlers can propagate with `?` and let the worker's
//! consumer loop decide the message outcome (ack, leave for redelivery).

use thiserror::Error;

use socratic_bench_gateway::GatewayError;
use socratic_bench_objectstore::ObjectStoreError;
use socratic_bench_queue::QueueError;
use socratic_bench_scenarios::ScenarioError;
use socratic_bench_storage::StorageError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("manifest not found: {0}")]
    ManifestNotFound(String),
}

impl OrchestratorError {
    /// Whether this error is a structural/terminal failure that should
    /// never be retried by the caller's own logic (spec §7:
    /// `UnknownModelError`, `ScenarioNotFound` are terminal for the run).
    ///
    /// Transient gateway errors are already resolved (retried to
    /// exhaustion) inside [`socratic_bench_gateway::ModelGateway`] before
    /// ever reaching orchestrator code, so by the time an error surfaces
    /// here it is either a terminal run failure or an infrastructure
    /// error worth leaving for redelivery.
    pub fn is_terminal_for_run(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Gateway(GatewayError::UnknownModel(_))
                | OrchestratorError::Scenario(ScenarioError::NotFound(_))
        )
    }
}
