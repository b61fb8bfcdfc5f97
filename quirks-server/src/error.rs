//! Server error types

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use quirks_core::{GeneratedCharacter, GenerationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the quirks server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Request body or difficulty could not be understood
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Client is inside its cooldown window
    #[error("rate limited, retry in {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The generation collaborator failed or returned unusable output
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body for rejected requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable explanation
    pub message: String,
    /// Milliseconds until a retry will be admitted (rate limiting only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

/// Placeholder character returned when generation fails
#[derive(Debug, Serialize, Deserialize)]
pub struct FallbackResponse {
    #[serde(flatten)]
    pub character: GeneratedCharacter,
    /// Always true; marks the character as a stand-in
    pub fallback: bool,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServerError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Generation(_) => StatusCode::BAD_GATEWAY,
            ServerError::Bind { .. } | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ServerError::RateLimited { retry_after_ms } => {
                let body = ErrorResponse {
                    error: "rate_limited".to_string(),
                    message: "Too many requests, please wait before trying again".to_string(),
                    retry_after_ms: Some(retry_after_ms),
                };
                let mut response = (status, Json(body)).into_response();
                let seconds = retry_after_ms.div_ceil(1000).max(1);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
                response
            }
            ServerError::InvalidInput(message) => {
                let body = ErrorResponse {
                    error: "invalid_input".to_string(),
                    message,
                    retry_after_ms: None,
                };
                (status, Json(body)).into_response()
            }
            // Internals stay in the log; the caller only sees a placeholder.
            ServerError::Generation(_) => {
                let body = FallbackResponse {
                    character: GeneratedCharacter::placeholder(),
                    fallback: true,
                };
                (status, Json(body)).into_response()
            }
            ServerError::Bind { .. } | ServerError::Internal(_) => {
                let body = ErrorResponse {
                    error: "internal".to_string(),
                    message: "Internal server error".to_string(),
                    retry_after_ms: None,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
