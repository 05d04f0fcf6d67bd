//! The Model Gateway: a uniform `generate` contract over a fixed,
//! config-driven model registry, with bounded exponential backoff and a
//! per-call timeout. Holds no conversational memory -- callers pass the
//! full message history on every call.

pub mod error;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod retry;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

pub use error::GatewayError;
pub use mock::{FlakyMockProvider, MockProvider};
pub use openai::OpenAiCompatibleProvider;
pub use provider::{ChatMessage, ChatRole, GenerateParams, GenerateRequest, GenerateResponse, Provider, Usage};

/// Maximum retry attempts after the first, per spec: `2s, 4s, 8s, 16s`.
pub const MAX_RETRIES: u32 = 4;

#[derive(Clone)]
pub struct ModelGateway {
    providers: HashMap<String, Arc<dyn Provider>>,
    model_registry: HashMap<String, String>,
    max_retries: u32,
    timeout: Duration,
}

impl ModelGateway {
    pub fn new(
        providers: HashMap<String, Arc<dyn Provider>>,
        model_registry: HashMap<String, String>,
        max_retries: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            providers,
            model_registry,
            max_retries,
            timeout,
        }
    }

    /// A single-provider gateway, convenient for tests and for the mock
    /// pipeline where every configured model routes through one adapter.
    pub fn single_provider(
        family: impl Into<String>,
        provider: Arc<dyn Provider>,
        model_ids: impl IntoIterator<Item = String>,
        max_retries: u32,
        timeout: Duration,
    ) -> Self {
        let family = family.into();
        let model_registry = model_ids.into_iter().map(|id| (id, family.clone())).collect();
        let mut providers = HashMap::new();
        providers.insert(family, provider);
        Self::new(providers, model_registry, max_retries, timeout)
    }

    /// Whether `model_id` resolves to a registered provider. Used by
    /// callers that want to validate a registry-built gateway without
    /// issuing a call.
    pub fn knows_model(&self, model_id: &str) -> bool {
        self.model_registry
            .get(model_id)
            .is_some_and(|family| self.providers.contains_key(family))
    }

    /// Uniform `generate(model_id, system, messages, params) -> text + usage`.
    ///
    /// Transient failures (throttling, network errors, timeouts) are retried
    /// up to `max_retries` times with bounded exponential backoff; unknown
    /// models and non-transient errors (validation, access denied) fail
    /// immediately without retry.
    pub async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateResponse, GatewayError> {
        let family = self
            .model_registry
            .get(request.model_id)
            .ok_or_else(|| GatewayError::UnknownModel(request.model_id.to_string()))?;
        let provider = self
            .providers
            .get(family)
            .ok_or_else(|| GatewayError::UnknownModel(request.model_id.to_string()))?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let call = provider.generate(GenerateRequest {
                model_id: request.model_id,
                system: request.system,
                messages: request.messages,
                params: request.params,
            });

            let outcome = match tokio::time::timeout(self.timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(self.timeout.as_secs())),
            };

            match outcome {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && attempt <= self.max_retries => {
                    let delay = retry::backoff_delay(attempt);
                    warn!(
                        model_id = request.model_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying transient gateway error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_transient() => {
                    return Err(GatewayError::RetriesExhausted {
                        attempts: attempt,
                        source: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}
