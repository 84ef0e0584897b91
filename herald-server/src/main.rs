//! Herald Server
//!
//! Relays DNSimple webhook events to Slack, dropping retried deliveries of
//! events that were already relayed.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use herald_core::admission::AdmissionController;
use herald_core::dedup::DedupCache;
use herald_core::processors::CacheSweeper;
use herald_core::relay::{RelayDispatcher, SlackNotifier};
use server::{build_router, run_server};
use state::AppState;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Program name reported by the liveness probe.
pub const WHAT: &str = "herald";

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Herald - webhook relay with duplicate suppression
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting {} v{}", WHAT, env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(
        args.config.as_deref(),
        SocketAddr::new(args.host, args.port),
    );
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(path) = &args.config {
        tracing::info!("Configuration loaded from {:?}", path);
    }

    // Build the admission pipeline
    let cache = Arc::new(DedupCache::with_ttl(loaded_config.dedup.ttl));
    let notifier = Arc::new(SlackNotifier::from_config(&loaded_config.slack));
    let admission = AdmissionController::new(cache.clone(), RelayDispatcher::new(notifier));
    tracing::info!(ttl = ?loaded_config.dedup.ttl, "Dedup cache ready");

    // Spawn the cache sweeper
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(
        CacheSweeper::new(cache, loaded_config.dedup.sweep_interval).run(shutdown_rx),
    );

    // Build the router
    let router = build_router(AppState::new(admission));

    // Run the server
    let result = run_server(router, loaded_config.server.listen).await;
    if let Err(e) = &result {
        tracing::error!("Server error: {}", e);
    }

    // Stop background processors
    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
