//! Gateway entry point.
//!
//! ```text
//!                          ┌───────────────────────────────────────────┐
//!                          │                 GATEWAY                    │
//!     Client Request       │  ┌──────────┐   ┌─────────┐   ┌─────────┐ │
//!     ─────────────────────┼─▶│ listener │──▶│  auth   │──▶│eligibil-│ │
//!                          │  │ (TLS opt)│   │  chain  │   │ity gate │ │
//!                          │  └──────────┘   └─────────┘   └────┬────┘ │
//!                          │                                    ▼      │
//!                          │                             ┌──────────┐  │
//!                          │                             │  header  │  │
//!                          │                             │  merge   │  │
//!                          │                             └────┬─────┘  │
//!     Client Response      │  ┌──────────┐   ┌─────────┐     ▼        │
//!     ◀────────────────────┼──│ response │◀──│ client  │◀─forward─────┼──── Upstream
//!                          │  └──────────┘   │ filters │              │     (query engine)
//!                          │                 └─────────┘              │
//!                          └───────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use query_gateway::config::load_config;
use query_gateway::http::HttpServer;
use query_gateway::lifecycle::{signals, startup, Shutdown};
use query_gateway::net::load_tls_config;
use query_gateway::observability::metrics;

#[derive(Parser)]
#[command(name = "query-gateway")]
#[command(about = "Authenticating gateway for a query-serving endpoint", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "query_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("query-gateway v0.1.0 starting");

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        providers = ?config.auth.providers,
        modifiers = config.modifiers.len(),
        client_filters = config.client_filters.len(),
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

    // Pipelines are built once, before the listener accepts anything.
    let filter = Arc::new(startup::build_authentication_filter(&config)?);
    let injector = Arc::new(startup::build_header_injector(&config));

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config.clone(), filter, injector)?;

    match &config.listener.tls {
        Some(tls) => {
            let rustls_config = load_tls_config(
                std::path::Path::new(&tls.cert_path),
                std::path::Path::new(&tls.key_path),
            )
            .await?;
            let addr = config.listener.bind_address.parse()?;
            server.run_tls(addr, rustls_config, shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
