//! Round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 LOAD BALANCER                 │
//!     Client Request   │  ┌──────────┐    ┌──────────┐    ┌─────────┐ │
//!     ─────────────────┼─▶│   http   │───▶│ balancer │───▶│ backend │─┼──▶ Origin 0..N
//!                      │  │  server  │    │  (round  │    │  relay  │ │
//!     Client Response  │  │catch-all │    │  robin)  │    │         │ │
//!     ◀────────────────┼──│          │◀───│          │◀───│         │◀┼─── Origin
//!                      │  └──────────┘    └──────────┘    └─────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! Startup is fail-fast: a bad origin or an empty backend list exits before
//! the listener binds. After that the process serves until it is killed.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use http_balancer::config::{load_config, validate_config, BackendConfig, BalancerConfig, ConfigError};
use http_balancer::observability::logging;
use http_balancer::{Balancer, HttpServer};

#[derive(Parser)]
#[command(name = "http-balancer")]
#[command(version)]
#[command(about = "Round-robin HTTP load balancer")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend origin URL (repeatable, replaces configured backends)
    #[arg(short, long = "backend", value_name = "URL")]
    backends: Vec<String>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BalancerConfig::default(),
    };

    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if !cli.backends.is_empty() {
        config.backends = cli.backends.into_iter().map(BackendConfig::new).collect();
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init(&config.observability);

    tracing::info!("http-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            tracing::error!(error = %e, "Invalid configuration");
        }
        return Err(ConfigError::Validation(errors).into());
    }

    let balancer = Balancer::from_config(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to build balancer");
    })?;

    for backend in balancer.backends() {
        tracing::info!(backend = %backend.address(), "Backend registered");
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(port = balancer.listen_port(), "Server started");

    HttpServer::new(balancer).run(listener).await?;

    Ok(())
}
