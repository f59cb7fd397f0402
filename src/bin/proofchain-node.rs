#![forbid(unsafe_code)]
//! Proofchain node: serves the ledger over HTTP on a single port.

use clap::Parser;
use proofchain::config::{load_config, DEFAULT_CONFIG_PATH};
use proofchain::node::Node;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "proofchain-node", version, about = "Run a proofchain ledger node")]
struct Cli {
    /// Port to listen on (overrides network.api_port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(port) = cli.port {
        config.network.api_port = port;
        config.validate()?;
    }

    let node = Arc::new(Node::new(config)?);
    node.start().await?;
    Ok(())
}
