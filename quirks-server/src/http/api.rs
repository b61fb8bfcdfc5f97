//! REST API handlers

use std::sync::Arc;

use axum::{Json, extract::State};
use quirks_core::{Difficulty, DifficultyInfo};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the server
    pub status: String,
    /// Server version
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// List the difficulty tiers a client may request
pub async fn difficulties() -> Json<Vec<DifficultyInfo>> {
    Json(Difficulty::ALL.iter().map(|d| d.info()).collect())
}
