//! Shared test utilities for quirks-server integration tests

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use quirks_core::{ManualClock, MockGenerator};
use quirks_server::{AppState, QuirksServer, ServerConfig, create_router};
use tokio::net::TcpListener;

/// Router-level harness with a scripted generator and a manual clock
pub struct Harness {
    pub server: TestServer,
    pub generator: Arc<MockGenerator>,
    pub clock: Arc<ManualClock>,
    #[allow(dead_code)]
    pub state: Arc<AppState>,
}

/// Creates a harness that keys clients by `X-Forwarded-For`
pub fn harness(generator: MockGenerator) -> Harness {
    let config = ServerConfig {
        trust_forwarded_for: true,
        ..ServerConfig::default()
    };
    harness_with_config(config, generator)
}

/// Creates a harness with custom config
pub fn harness_with_config(config: ServerConfig, generator: MockGenerator) -> Harness {
    let generator = Arc::new(generator);
    let clock = Arc::new(ManualClock::new(0));
    let state = Arc::new(AppState::new(&config, generator.clone()).with_clock(clock.clone()));
    let server = TestServer::new(create_router(Arc::clone(&state))).unwrap();

    Harness {
        server,
        generator,
        clock,
        state,
    }
}

/// Header pair identifying a client as `ip`
pub fn forwarded_for(ip: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-forwarded-for"),
        HeaderValue::from_static(ip),
    )
}

/// Spawns a real server in a background task, returns its state and bound address
#[allow(dead_code)]
pub async fn spawn_server(
    config: ServerConfig,
    generator: MockGenerator,
) -> (Arc<AppState>, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(&config, Arc::new(generator)));
    let server = QuirksServer::with_state(config, Arc::clone(&state));

    tokio::spawn(async move {
        let _ = server.run_with_listener(listener).await;
    });

    // Brief delay to ensure server is accepting connections
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    (state, addr)
}
