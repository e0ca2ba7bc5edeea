//! Warden coordinating server
//!
//! Listens for devices, recognizes or provisions them, and keeps the device
//! records in a JSON configuration file.
//!
//! Usage:
//!   warden-server --config warden-server.json --listen 0.0.0.0:7420

use std::{path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use warden_server::{JsonConfigStore, Server, ServerState, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "warden-server")]
#[command(about = "Warden device identity server")]
struct Args {
    /// Path to the configuration file (created with defaults if missing)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Address to listen on, overriding the configuration file
    #[arg(short, long)]
    listen: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = Arc::new(
        JsonConfigStore::open(&args.config)
            .with_context(|| format!("Failed to open {}", args.config.display()))?,
    );
    let listen = match args.listen {
        Some(listen) => listen,
        None => store.config().await.listen_address,
    };

    let state = ServerState::from_store(store.clone())
        .await
        .context("Failed to load device records")?;
    info!(
        devices = state.devices().len().await,
        profiles = state.profiles().len(),
        config = %store.path().display(),
        "Warden server starting"
    );

    let server = Server::bind(&listen, state)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;

    tokio::select! {
        result = server.run() => result.context("Server stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
