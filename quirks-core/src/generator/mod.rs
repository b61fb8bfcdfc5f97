//! The generation collaborator: turns a difficulty into a character

mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use quirks_models::providers::{ChatRequest, Message, ModelProvider};
use tracing::debug;

use crate::character::GeneratedCharacter;
use crate::difficulty::Difficulty;
use crate::error::GenerationError;
use crate::extract::extract_character;

pub use mock::MockGenerator;

/// User turn sent after the tier's system prompt
const USER_PROMPT: &str = "Generate one character.";

/// Anything that can produce a character for a difficulty tier
#[async_trait]
pub trait CharacterGenerator: Send + Sync {
    async fn generate(&self, difficulty: Difficulty) -> Result<GeneratedCharacter, GenerationError>;
}

/// Model parameters for [`ProviderGenerator`]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Generator backed by a chat-completion [`ModelProvider`]
///
/// Sends the tier prompt, then extracts the character JSON from whatever
/// text the model returns.
pub struct ProviderGenerator {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn build_request(&self, difficulty: Difficulty) -> ChatRequest {
        let mut request = ChatRequest::new(
            self.settings.model.clone(),
            vec![
                Message::system(difficulty.prompt()),
                Message::user(USER_PROMPT),
            ],
        );
        if let Some(temperature) = self.settings.temperature {
            request = request.temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.max_tokens(max_tokens);
        }
        request
    }
}

#[async_trait]
impl CharacterGenerator for ProviderGenerator {
    async fn generate(&self, difficulty: Difficulty) -> Result<GeneratedCharacter, GenerationError> {
        let request = self.build_request(difficulty);
        let response = self.provider.chat(request).await?;

        debug!(
            provider = self.provider.name(),
            output_tokens = response.usage.output_tokens,
            "model responded"
        );

        extract_character(&response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quirks_models::providers::{ChatResponse, Role, Usage};
    use std::sync::Mutex;

    /// Provider that answers with fixed text and records requests
    struct CannedProvider {
        reply: quirks_models::Result<String>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl CannedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(quirks_models::Error::Request("connection refused".to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn chat(&self, request: ChatRequest) -> quirks_models::Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(ChatResponse {
                    content: text.clone(),
                    finish_reason: Some("stop".to_string()),
                    usage: Usage::new(20, 10),
                }),
                Err(_) => Err(quirks_models::Error::Request("connection refused".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn sends_tier_prompt_and_parses_reply() {
        let provider = Arc::new(CannedProvider::replying(
            "Here: {\"role\":\"florist\",\"quirk1\":\"names plants\",\"quirk2\":\"sneezes\"}",
        ));
        let generator = ProviderGenerator::new(
            provider.clone(),
            GenerationSettings::new("gpt-4o-mini")
                .temperature(1.1)
                .max_tokens(300),
        );

        assert_eq!(generator.settings().model, "gpt-4o-mini");

        let character = generator.generate(Difficulty::Hard).await.unwrap();
        assert_eq!(character.role, "florist");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(1.1));
        assert_eq!(request.max_tokens, Some(300));
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, Difficulty::Hard.prompt());
        assert_eq!(request.messages[1].role, Role::User);
    }

    #[tokio::test]
    async fn unparseable_reply_is_malformed() {
        let provider = Arc::new(CannedProvider::replying("I'd rather not."));
        let generator = ProviderGenerator::new(provider, GenerationSettings::new("m"));

        let err = generator.generate(Difficulty::VeryEasy).await.unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[tokio::test]
    async fn provider_error_is_propagated() {
        let provider = Arc::new(CannedProvider::failing());
        let generator = ProviderGenerator::new(provider, GenerationSettings::new("m"));

        let err = generator.generate(Difficulty::VeryEasy).await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
    }
}
