//! Model access for quirks.
//!
//! This crate provides:
//! - [`providers::ModelProvider`], the chat-completion interface the
//!   character generator talks to
//! - [`providers::OpenAiProvider`], a client for any OpenAI-compatible
//!   `/chat/completions` endpoint
//! - [`auth::ApiKey`], a redacting wrapper for provider credentials

mod error;

pub mod auth;
pub mod providers;

pub use error::{Error, Result};
