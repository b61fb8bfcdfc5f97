//! Per-client cooldown enforcement

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use quirks_core::{Admission, ClientKey};

use crate::{AppState, ServerError};

/// Header carrying the original client address behind a proxy
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Derive the client key for a request
///
/// With `trust_forwarded_for` the first `X-Forwarded-For` entry wins;
/// otherwise the peer IP is used. Without either the key is `unknown`.
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> ClientKey {
    if trust_forwarded_for
        && let Some(forwarded) = headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    {
        return ClientKey::new(forwarded);
    }

    match peer {
        Some(addr) => ClientKey::from(addr.ip()),
        None => ClientKey::unknown(),
    }
}

/// Admit the request through the rate gate or answer 429
///
/// On admission the derived [`ClientKey`] is stored in the request
/// extensions for the handler.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let key = client_key(request.headers(), peer, state.trust_forwarded_for);

    match state.rate_gate.admit(&key, state.clock.now_ms()) {
        Admission::Allowed => {
            request.extensions_mut().insert(key);
            Ok(next.run(request).await)
        }
        Admission::Denied { retry_after_ms } => {
            tracing::warn!(client = %key, retry_after_ms, "rate limited");
            Err(ServerError::RateLimited { retry_after_ms })
        }
    }
}
