//! Model provider trait and implementations.
//!
//! The [`ModelProvider`] trait is the interface the character generator
//! uses to reach a language model. [`OpenAiProvider`] implements it for
//! any OpenAI-compatible chat-completions endpoint.
//!
//! # Example
//!
//! ```ignore
//! use quirks_models::providers::{ModelProvider, ChatRequest, Message};
//!
//! async fn chat(provider: &dyn ModelProvider) {
//!     let request = ChatRequest::new(
//!         "gpt-4o-mini",
//!         vec![Message::system("You are an API."), Message::user("Generate one character.")],
//!     );
//!
//!     let response = provider.chat(request).await?;
//!     println!("Response: {}", response.content);
//! }
//! ```

mod openai;
mod types;

use async_trait::async_trait;

pub use openai::{DEFAULT_BASE_URL, OpenAiProvider};
pub use types::*;

use crate::Result;

/// Trait for chat-completion providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Perform a non-streaming chat completion request.
    ///
    /// # Returns
    ///
    /// The text of the first choice together with usage statistics.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
