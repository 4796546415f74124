//! Streaming HLS reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!   GET /<path>       │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!  ───────────────────┼─▶│  http   │──▶│ routing  │──▶│ upstream  │──┼──▶ Origin
//!                     │  │ server  │   │ target + │   │ profile + │  │
//!                     │  └─────────┘   │ class    │   │ fetcher   │  │
//!                     │                └──────────┘   └─────┬─────┘  │
//!                     │         ┌──────────────┬────────────┘        │
//!                     │         ▼              ▼                     │
//!                     │  ┌────────────┐ ┌────────────┐               │
//!   Response          │  │  playlist  │ │ streaming  │               │
//!  ◀──────────────────┼──│  rewrite   │ │ rechunk +  │               │
//!                     │  │  (.m3u8)   │ │ metered    │               │
//!                     │  └────────────┘ └────────────┘               │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use m3u_proxy::config::{self, validation::validate_config, ConfigError, ProxyConfig};
use m3u_proxy::observability::{logging, metrics};
use m3u_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "m3u-proxy")]
#[command(about = "Streaming reverse proxy that rewrites HLS manifests", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("m3u-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.upstream.base_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
