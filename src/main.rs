//! CORS Forwarding Proxy
//!
//! A single-target HTTP passthrough proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────┐
//!                      │              CORS PROXY                   │
//!                      │                                           │
//!   Client Request     │  ┌─────────┐   ┌──────────────────────┐  │
//!   ──────────────────▶│  │  http   │──▶│  forward (URI join,  │  │
//!                      │  │ server  │   │  header filter, body)│  │
//!                      │  └─────────┘   └──────────┬───────────┘  │
//!                      │                           │               │
//!                      │                           ▼               │
//!   Client Response    │  ┌─────────┐   ┌──────────────────────┐  │
//!   ◀──────────────────│  │  cors   │◀──│   upstream client    │◀─┼── Upstream
//!                      │  │ headers │   │  (status/body relay) │  │    Origin
//!                      │  └─────────┘   └──────────────────────┘  │
//!                      │                                           │
//!                      │  ┌─────────────────────────────────────┐ │
//!                      │  │   config  │  logging  │  metrics    │ │
//!                      │  └─────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────┘
//! ```
//!
//! OPTIONS preflights short-circuit inside the server with 204 and never
//! cross to the upstream.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cors_proxy::config::{self, validation, ConfigError, ProxyConfig};
use cors_proxy::http::HttpServer;
use cors_proxy::observability;

/// Command-line options. Defaults match the built-in configuration.
#[derive(Parser, Debug)]
#[command(name = "cors-proxy", about = "Single-target CORS forwarding proxy")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listening port override (binds all interfaces).
    #[arg(long)]
    port: Option<u16>,

    /// Upstream base URL override.
    #[arg(long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(port) = args.port {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(upstream) = args.upstream {
        config.upstream.base_url = upstream;
    }
    validation::validate_config(&config).map_err(ConfigError::Validation)?;

    observability::logging::init_tracing(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
