//! Warden device client
//!
//! Usage:
//!   warden-client connect
//!   warden-client fingerprint
//!   warden-client keygen --out device.key --password <PASSWORD>

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use warden_client::{local_identity, Client, ClientConfig, IdentifyOutcome, DEFAULT_CONFIG_PATH};
use warden_crypto::{device_fingerprint, generate_keypair, seal_private_key};
use warden_protocol::Packet;
use warden_types::JsonConfig;

#[derive(Parser, Debug)]
#[command(name = "warden-client")]
#[command(about = "Warden device client")]
struct Args {
    /// Path to the configuration file (created with defaults if missing)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify to the server, then print packets it pushes until it disconnects
    Connect,
    /// Print this machine's hardware id
    Fingerprint,
    /// Generate a keypair, seal the private key and print the public key
    Keygen {
        /// Where to write the sealed private key
        #[arg(short, long)]
        out: PathBuf,

        /// Password protecting the private key
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Connect => connect(&args.config).await,
        Command::Fingerprint => {
            println!("{}", device_fingerprint());
            Ok(())
        }
        Command::Keygen { out, password } => keygen(&out, &password),
    }
}

async fn connect(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load_or_create(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let device = local_identity(config.nickname);
    info!(hardware_id = %device.key(), nickname = %device.nickname, "Local identity");

    let mut client = Client::connect(&config.server_address)
        .await
        .with_context(|| format!("Failed to connect to {}", config.server_address))?;

    match client.identify(&device).await.context("Identify failed")? {
        IdentifyOutcome::Provisional => {
            println!("Registered as {}; waiting for a profile assignment", device.key());
        }
        IdentifyOutcome::Recognized(record) => {
            println!(
                "Recognized as {} ({}), profile {}",
                record.key(),
                record.nickname,
                record.profile
            );
        }
    }

    while let Some(packet) = client.next_packet().await? {
        match packet {
            Packet::Status(message) => println!(
                "status {:?}: {} (correlation {})",
                message.status, message.note, message.correlation_id
            ),
            Packet::Identity(message) => println!(
                "identity {} ({}), profile {}",
                message.device.key(),
                message.device.nickname,
                message.device.profile
            ),
        }
    }
    info!("Server closed the connection");
    Ok(())
}

fn keygen(out: &Path, password: &str) -> Result<()> {
    let keypair = generate_keypair().context("Failed to generate keypair")?;
    seal_private_key(out, &keypair.private, password)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    let public = keypair
        .public
        .to_base64()
        .context("Failed to encode public key")?;

    info!(path = %out.display(), "Sealed private key");
    println!("{public}");
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
