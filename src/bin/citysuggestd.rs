//! citysuggestd: city autocomplete daemon.
//!
//! Serves the [`CityResolver`](citysuggest::CityResolver) over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use citysuggest::server::config::{Config, Secrets};
use citysuggest::server::{build_resolver, router};

/// City autocomplete service.
#[derive(Parser)]
#[command(name = "citysuggestd")]
#[command(version = citysuggest::PKG_VERSION)]
#[command(about = "City autocomplete daemon with an LLM fallback")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Override the configured listen address.
    #[arg(long, env = "CITYSUGGEST_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,citysuggest=debug".into()),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    let secrets = Secrets::load()?;

    let resolver = build_resolver(&config, &secrets).await?;

    let addr: SocketAddr = config.server.address.parse().map_err(|e| {
        citysuggest::CitySuggestError::Configuration(format!("Invalid address: {e}"))
    })?;

    info!(
        version = citysuggest::version_string(),
        %addr,
        max_suggestions = resolver.max_suggestions(),
        cooldown_secs = resolver.throttle().cooldown().as_secs(),
        "citysuggestd starting"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(Arc::new(resolver)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("citysuggestd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
