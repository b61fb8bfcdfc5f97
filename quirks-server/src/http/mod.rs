//! HTTP server module

mod api;
mod character;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, rate_limit_middleware};

pub use api::HealthResponse;
pub use character::CharacterRequest;

/// Create the HTTP router with all routes configured
///
/// Only character generation sits behind the rate gate.
pub fn create_router(state: Arc<AppState>) -> Router {
    let generation = Router::new()
        .route("/api/character", post(character::create_character))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/difficulties", get(api::difficulties))
        .merge(generation)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
