//! OpenAI-compatible chat-completions provider.
//!
//! Works with OpenAI itself and with the many services that mirror its
//! `/chat/completions` API (Groq, OpenRouter, local gateways).
//!
//! # Example
//!
//! ```ignore
//! use quirks_models::auth::ApiKey;
//! use quirks_models::providers::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new(ApiKey::from_env("OPENAI_API_KEY")?);
//! let provider = OpenAiProvider::with_base_url("https://api.groq.com/openai/v1", Some(key));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::ApiKey;

/// Default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// ────────────────────────────────────────────────────────────────────────────
// OpenAI API Types
// ────────────────────────────────────────────────────────────────────────────

/// Message in an OpenAI chat request/response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    pub role: String,
    /// Absent when the model answers with a tool call instead of text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
pub struct OpenAiChatRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl From<super::ChatRequest> for OpenAiChatRequest {
    fn from(request: super::ChatRequest) -> Self {
        let messages = request
            .messages
            .into_iter()
            .map(|m| OpenAiMessage {
                role: match m.role {
                    super::Role::System => "system".to_string(),
                    super::Role::User => "user".to_string(),
                    super::Role::Assistant => "assistant".to_string(),
                },
                content: Some(m.content),
            })
            .collect();

        Self {
            model: request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    pub message: OpenAiMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the API.
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Response body from `/chat/completions`.
#[derive(Debug, Deserialize)]
pub struct OpenAiChatResponse {
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

impl TryFrom<OpenAiChatResponse> for super::ChatResponse {
    type Error = crate::Error;

    fn try_from(response: OpenAiChatResponse) -> Result<Self, Self::Error> {
        let usage = response.usage.unwrap_or_default();
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            crate::Error::ProviderApi("response contained no choices".to_string())
        })?;

        Ok(Self {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: super::Usage::new(usage.prompt_tokens, usage.completion_tokens),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAiProvider
// ────────────────────────────────────────────────────────────────────────────

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiProvider {
    base_url: String,
    api_key: Option<ApiKey>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider for the public OpenAI API.
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, Some(api_key))
    }

    /// Create a provider for a custom base URL.
    ///
    /// `api_key` may be `None` for gateways that do not authenticate.
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL for this provider.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a chat completion request.
    pub async fn chat(&self, request: super::ChatRequest) -> crate::Result<super::ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = OpenAiChatRequest::from(request);

        debug!(model = %body.model, url = %url, "sending chat completion request");

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::ProviderApi(format!(
                "chat completions returned {}: {}",
                status, body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;
        let parsed: OpenAiChatResponse = serde_json::from_str(&text)?;

        parsed.try_into()
    }
}

#[async_trait::async_trait]
impl super::ModelProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: super::ChatRequest) -> crate::Result<super::ChatResponse> {
        self.chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatRequest, ChatResponse, Message};

    #[test]
    fn new_uses_default_url() {
        let provider = OpenAiProvider::new(ApiKey::new("sk-test"));
        assert_eq!(provider.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let provider = OpenAiProvider::with_base_url("http://localhost:8080/v1/", None);
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn request_converts_roles_and_options() {
        let request = ChatRequest::new(
            "gpt-4o-mini",
            vec![Message::system("rules"), Message::user("go")],
        )
        .temperature(1.0);

        let body = OpenAiChatRequest::from(request);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "go");
        assert_eq!(json["temperature"], 1.0);
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn parse_chat_response_extracts_first_choice() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "{\"role\":\"baker\"}" },
                    "finish_reason": "stop"
                }
            ],
            "usage": { "prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160 }
        }"#;

        let parsed: OpenAiChatResponse = serde_json::from_str(json).unwrap();
        let response: ChatResponse = parsed.try_into().unwrap();

        assert_eq!(response.content, "{\"role\":\"baker\"}");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.input_tokens, 120);
        assert_eq!(response.usage.output_tokens, 40);
        assert_eq!(response.usage.total_tokens, 160);
    }

    #[test]
    fn response_without_choices_is_an_error() {
        let parsed: OpenAiChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let result: crate::Result<ChatResponse> = parsed.try_into();
        assert!(matches!(result, Err(crate::Error::ProviderApi(_))));
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: OpenAiChatResponse = serde_json::from_str(json).unwrap();
        let response: ChatResponse = parsed.try_into().unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.usage, crate::providers::Usage::default());
    }
}
