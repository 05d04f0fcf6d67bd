//! A deterministic provider adapter so the Runner and Judge are testable
//! without network access.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::GatewayError;
use crate::provider::{GenerateRequest, GenerateResponse, Provider, Usage};

/// Echoes a deterministic reply derived from the last message and a
/// per-instance call counter, so tests can assert on call ordering.
pub struct MockProvider {
    calls: AtomicU32,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn family(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateResponse, GatewayError> {
        let call_index = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let last = request
            .messages
            .last()
            .map(|m| m.text.as_str())
            .unwrap_or_default();
        let text = format!("[mock:{}#{}] {}", request.model_id, call_index, last);
        let prompt_tokens = request.messages.iter().map(|m| approx_tokens(&m.text)).sum();
        let completion_tokens = approx_tokens(&text);
        Ok(GenerateResponse {
            text,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
            },
        })
    }
}

fn approx_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Always fails with a transient error, `failures_before_success` times,
/// then delegates to an inner [`MockProvider`]. Used to exercise the
/// gateway's retry/backoff loop deterministically.
pub struct FlakyMockProvider {
    remaining_failures: AtomicU32,
    inner: MockProvider,
}

impl FlakyMockProvider {
    pub fn new(failures_before_success: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(failures_before_success),
            inner: MockProvider::new(),
        }
    }
}

#[async_trait]
impl Provider for FlakyMockProvider {
    fn family(&self) -> &str {
        "mock-flaky"
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateResponse, GatewayError> {
        let remaining = self.remaining_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(GatewayError::Transient("simulated throttling".to_string()));
        }
        self.inner.generate(request).await
    }
}
