//! Configuration Exporter
//!
//! Pulls the hardware inventory from the collector on demand, hands it back to
//! the caller, and raises alerts for incomplete or unhealthy devices.
// This is the main entry point for the exporter. It's responsible for:
// - Initializing logging and parsing command-line arguments.
// - Building the HTTP router around the sync pipeline.
// - Serving requests until a shutdown signal arrives.

// Use jemalloc as the global allocator for better performance
#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use anyhow::{Context, Result};
use clap::Parser;
use exporter_shared::defaults::{DEFAULT_CONFIG_PATH, DEFAULT_LISTEN_ADDRESS, DEFAULT_LOG_DIR};
use exporter_shared::ConfigStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

mod alert;
mod api;
mod collector;
mod pipeline;

use pipeline::SyncPipeline;

/// Command-line arguments for the exporter
#[derive(Parser, Debug)]
#[command(name = "configuration-exporter")]
#[command(about = "Synchronizes hardware inventory and raises device status alerts", long_about = None)]
struct CliArgs {
    /// Path to the exporter configuration file (exporter.yaml)
    #[arg(long = "config", value_name = "CONFIG_FILE", default_value = DEFAULT_CONFIG_PATH)]
    config_file: PathBuf,

    /// Address and port the HTTP API listens on
    #[arg(long = "listen-address", value_name = "ADDRESS", default_value = DEFAULT_LISTEN_ADDRESS)]
    listen_address: SocketAddr,

    /// Directory for rolling log files
    #[arg(long = "log-dir", value_name = "DIR", default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
}

/// Sets up signal handlers for graceful shutdown.
/// Returns a future that completes when a shutdown signal is received.
///
/// On Unix systems, handles SIGTERM and SIGINT signals.
/// On non-Unix systems, handles Ctrl+C.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to register signal handlers: {}", e);
                error!("Falling back to Ctrl+C only");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to wait for Ctrl+C: {}", e);
                } else {
                    info!("Received Ctrl+C");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to receive Ctrl+C signal: {}", e);
        } else {
            info!("Received Ctrl+C");
        }
    }
}

/// Exporter entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Initialize logging.
    let file_appender = tracing_appender::rolling::daily(&cli_args.log_dir, "exporter.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Default directives are only used if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "configuration_exporter=info,exporter_shared=info,audit_trail=info",
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(non_blocking)
        .init();

    info!("Configuration exporter starting up");
    info!("Configuration file: {}", cli_args.config_file.display());

    // The configuration is read per request, so a broken file is reported to
    // callers instead of preventing startup.
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let pipeline = SyncPipeline::new(ConfigStore::new(cli_args.config_file), client);
    let app = api::create_router(api::AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(cli_args.listen_address)
        .await
        .with_context(|| {
            format!(
                "Failed to bind TCP listener to {}. \
                 Check if port is already in use (EADDRINUSE) or requires elevated permissions (EACCES).",
                cli_args.listen_address
            )
        })?;

    info!("Starting HTTP server on {}", cli_args.listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Exporter shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests;
