use crate::config::Config;
use crate::error::Result;
use crate::ledger::Ledger;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// One running ledger process: the shared ledger plus this node's identity.
pub struct Node {
    pub config: Config,
    /// Random id used as the recipient of mining rewards.
    pub node_id: String,
    pub ledger: Arc<Ledger>,
}

impl Node {
    /// Build a node whose ledger queries peers over HTTP.
    pub fn new(config: Config) -> Result<Self> {
        let ledger = Ledger::with_http_client(config.network.peer_timeout())?;
        Ok(Self::with_ledger(config, Arc::new(ledger)))
    }

    pub fn with_ledger(config: Config, ledger: Arc<Ledger>) -> Self {
        Self {
            config,
            node_id: generate_node_id(),
            ledger,
        }
    }

    /// Register bootstrap peers, bind the API port and serve until Ctrl-C.
    pub async fn start(self: Arc<Self>) -> Result<()> {
        for peer in &self.config.network.bootstrap_peers {
            if let Err(e) = self.ledger.register_peer(peer) {
                warn!(peer = %peer, error = %e, "Skipping bootstrap peer");
            }
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.network.api_port));
        let listener = TcpListener::bind(addr).await?;
        info!(
            node_id = %self.node_id,
            addr = %addr,
            peers = self.ledger.peers().len(),
            "Starting proofchain node"
        );

        let ledger = self.ledger.clone();
        let shutdown = async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested; cancelling in-flight mining");
            ledger.cancel_mining();
        };

        crate::api::run_api_server(self, listener, shutdown).await
    }
}

/// UUID v4 without dashes.
pub fn generate_node_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
