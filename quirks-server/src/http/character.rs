//! Character generation handler

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use quirks_core::{ClientKey, Difficulty, GeneratedCharacter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppState, ServerError};

/// Body of `POST /api/character`
///
/// `difficulty` stays untyped so that `2` and `"2"` are both accepted and
/// every other shape becomes a 400 rather than a 422.
#[derive(Debug, Serialize, Deserialize)]
pub struct CharacterRequest {
    #[serde(default)]
    pub difficulty: Value,
}

/// Generate a character that differs from the last one accepted
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    Extension(key): Extension<ClientKey>,
    payload: Result<Json<CharacterRequest>, JsonRejection>,
) -> Result<Json<GeneratedCharacter>, ServerError> {
    let Json(request) = payload.map_err(|e| ServerError::InvalidInput(e.body_text()))?;
    let difficulty = Difficulty::try_from(&request.difficulty)
        .map_err(|e| ServerError::InvalidInput(e.to_string()))?;

    let selection = state
        .selector
        .select(&key, state.generator.as_ref(), difficulty)
        .await
        .map_err(|e| {
            tracing::warn!(
                client = %key,
                difficulty = difficulty.level(),
                "generation failed: {}",
                e
            );
            ServerError::from(e)
        })?;

    Ok(Json(selection.character))
}
