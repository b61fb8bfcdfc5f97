pub mod config;
pub mod generate;
pub mod serve;

use std::sync::Arc;

use anyhow::Result;
use quirks_core::{GenerationSettings, ProviderGenerator};
use quirks_models::auth::ApiKey;
use quirks_models::providers::OpenAiProvider;

use crate::config::ModelSection;

/// Build the model-backed generator described by the `[model]` section
pub fn build_generator(model: &ModelSection) -> Result<Arc<ProviderGenerator>> {
    let api_key = ApiKey::from_env(&model.api_key_env)?;
    let provider = OpenAiProvider::with_base_url(&model.base_url, Some(api_key));

    let mut settings = GenerationSettings::new(&model.name);
    if let Some(temperature) = model.temperature {
        settings = settings.temperature(temperature);
    }
    if let Some(max_tokens) = model.max_tokens {
        settings = settings.max_tokens(max_tokens);
    }

    tracing::debug!(
        base_url = %model.base_url,
        model = %model.name,
        "using OpenAI-compatible provider"
    );

    Ok(Arc::new(ProviderGenerator::new(Arc::new(provider), settings)))
}
