//! quirks-server - HTTP server for the quirks character generator
//!
//! Owns the rate gate, the novelty selector and the generation collaborator,
//! and exposes them as a small JSON API under `/api`.

mod error;
pub mod http;
pub mod middleware;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use quirks_core::{CharacterGenerator, RateGateConfig, SelectionConfig};
use tokio::net::TcpListener;

pub use error::{ErrorResponse, FallbackResponse, ServerError};
pub use http::{HealthResponse, create_router};
pub use middleware::{client_key, rate_limit_middleware};
pub use state::AppState;

/// Default address the server binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port the server listens on
pub const DEFAULT_PORT: u16 = 8000;
/// Default interval between rate record sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The main quirks server
pub struct QuirksServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl QuirksServer {
    /// Create a new server around a generation collaborator
    pub fn new(config: ServerConfig, generator: Arc<dyn CharacterGenerator>) -> Self {
        let state = Arc::new(AppState::new(&config, generator));
        Self { config, state }
    }

    /// Create a server with custom state (for testing)
    pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared application state
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Run the server, binding to the configured address
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.clone(),
                source: e,
            })?;

        tracing::info!("quirks server listening on {}", addr);

        self.run_with_listener(listener).await
    }

    /// Run the server on an already-bound listener
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        self.start_rate_sweep();

        let router = create_router(self.state);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

        tracing::info!("quirks server stopped");
        Ok(())
    }

    /// Start a background task that drops expired rate records
    fn start_rate_sweep(&self) {
        let state = Arc::clone(&self.state);
        let period = self.config.sweep_interval.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                let removed = state.rate_gate.sweep(state.clock.now_ms());
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        tracked = state.rate_gate.tracked_clients(),
                        "swept expired rate records"
                    );
                }
            }
        });
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Key clients by the first `X-Forwarded-For` entry when present
    pub trust_forwarded_for: bool,
    /// Cooldown and record capacity
    pub rate_gate: RateGateConfig,
    /// How often expired rate records are dropped
    pub sweep_interval: Duration,
    /// Novelty selector settings
    pub selection: SelectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            trust_forwarded_for: false,
            rate_gate: RateGateConfig::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            selection: SelectionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Returns the socket address string (e.g., "127.0.0.1:8000")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
