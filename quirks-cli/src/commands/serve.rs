//! Quirks serve command for running the HTTP server

use anyhow::Result;
use clap::Args;
use quirks_server::QuirksServer;
use tracing::info;

use crate::commands::build_generator;
use crate::config::{ConfigLoader, QuirksConfig};

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    pub host: Option<String>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, mut config: QuirksConfig) -> QuirksConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = args.apply(ConfigLoader::load()?);
    let server_config = config.server_config()?;
    let generator = build_generator(&config.model)?;
    let model = generator.settings().model.clone();

    let server = QuirksServer::new(server_config, generator);
    let state = server.state();

    info!(
        cooldown_ms = state.rate_gate.cooldown_ms(),
        max_attempts = state.selector.max_attempts(),
        policy = state.selector.policy().name(),
        scope = state.selector.scope().as_str(),
        model = %model,
        "Starting quirks server on {}",
        server.config().addr()
    );

    server.run().await?;
    Ok(())
}
