//! Uniform request/response shapes and the per-provider adapter trait.
//!
//! A `Provider` is one request/response shape translation away from a
//! concrete API (OpenAI-compatible chat completions, a deterministic mock,
//! ...). Multiple providers with divergent wire formats are modeled as
//! variants behind this one trait; dispatch is by `model_id` lookup in the
//! registry, not by downcasting or runtime inheritance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerateParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A full request: the gateway holds no conversational memory, so callers
/// pass the complete message history every call.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub model_id: &'a str,
    pub system: Option<&'a str>,
    pub messages: &'a [ChatMessage],
    pub params: GenerateParams,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    pub usage: Usage,
}

/// A provider-family adapter. `model_id` is passed through so one adapter
/// can serve every model that family hosts (e.g. one OpenAI-compatible
/// adapter instance serves every OpenAI-compatible model id in the
/// registry).
#[async_trait]
pub trait Provider: Send + Sync {
    /// Family name, e.g. `"openai"`, `"mock"`. Used only for logging.
    fn family(&self) -> &str;

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateResponse, GatewayError>;
}
