//! An OpenAI-compatible chat-completions adapter. Serves any model whose
//! provider speaks the `/chat/completions` wire format (OpenAI itself,
//! most self-hosted and third-party compatible endpoints).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::GatewayError;
use crate::provider::{ChatRole, GenerateRequest, GenerateResponse, Provider, Usage};

pub struct OpenAiCompatibleProvider {
    family: String,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(family: impl Into<String>, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            family: family.into(),
            base_url: base_url.into(),
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn family(&self) -> &str {
        &self.family
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<GenerateResponse, GatewayError> {
        let mut wire_messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system {
            wire_messages.push(json!({"role": "system", "content": system}));
        }
        for message in request.messages {
            let role = match message.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            wire_messages.push(json!({"role": role, "content": message.text}));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(url).json(&json!({
            "model": request.model_id,
            "messages": wire_messages,
            "temperature": request.params.temperature,
            "max_tokens": request.params.max_tokens,
            "stream": false,
        }));
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GatewayError::AccessDenied(extract_error(&body, status.as_str())));
        }
        if status.as_u16() == 400 || status.as_u16() == 422 {
            return Err(GatewayError::Validation(extract_error(&body, status.as_str())));
        }
        if !status.is_success() {
            return Err(GatewayError::Transient(extract_error(&body, status.as_str())));
        }

        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| GatewayError::Transient("response had no message content".to_string()))?
            .to_string();

        let usage = Usage {
            prompt_tokens: body["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            completion_tokens: body["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
        };

        Ok(GenerateResponse { text, usage })
    }
}

fn extract_error(body: &serde_json::Value, status: &str) -> String {
    body["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("provider request failed with status {status}"))
}
