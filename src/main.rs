//! HTTP audit gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                 AUDIT GATEWAY                  │
//!   Client Request     │  ┌──────────┐   ┌───────────┐   ┌──────────┐  │
//!   ───────────────────┼─▶│  audit   │──▶│ trace +   │──▶│ forward  │──┼──▶ Upstream
//!                      │  │middleware│   │ timeout   │   │ handler  │  │    (e.g. Todo app)
//!   Client Response    │  │          │   │           │   │          │  │
//!   ◀──────────────────┼──│ (record) │◀──│           │◀──│          │◀─┼───
//!                      │  └────┬─────┘   └───────────┘   └──────────┘  │
//!                      │       ▼                                        │
//!                      │  one audit log event per exchange              │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use audit_gateway::config::{load_config, GatewayConfig};
use audit_gateway::lifecycle::{signals, Shutdown};
use audit_gateway::observability::{logging, metrics};
use audit_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "audit-gateway")]
#[command(about = "HTTP gateway that audits every request/response exchange", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("audit-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        audit_enabled = config.audit.enabled,
        layout = ?config.audit.layout,
        request_timeout_secs = config.timeouts.request_secs,
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
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
