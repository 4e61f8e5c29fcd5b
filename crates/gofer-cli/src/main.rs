//! gofer CLI
//!
//! Starts the local gopher gateway and opens the browser on it, or, when a
//! gateway is already running, asks that one to show the requested URI.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gofer_core::GatewayConfig;
use tracing_subscriber::EnvFilter;

mod browser;
mod instance;
mod server;

use browser::SystemLauncher;
use instance::Election;

/// gofer - browse gopherspace from your web browser
///
/// Runs a gateway on 127.0.0.1:8000 that exits on its own after a minute
/// without any browser activity.
#[derive(Parser, Debug)]
#[command(name = "gofer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Gopher URI to open, e.g. gopher://freeshell.org/1/
    uri: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = GatewayConfig::new();

    match instance::elect(config.service_addr).await {
        Ok(Election::Primary(listener)) => {
            let initial = instance::initial_target(&config, args.uri.as_deref());
            match instance::run_primary(listener, config, initial, Arc::new(SystemLauncher)).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("Gateway failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Ok(Election::Secondary) => {
            tracing::info!(
                "gofer is already running on {}. Sending re-focus signal.",
                config.service_addr
            );
            match instance::forward(&config, args.uri.as_deref()).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: could not bind {}: {e}", config.service_addr);
            ExitCode::FAILURE
        }
    }
}
