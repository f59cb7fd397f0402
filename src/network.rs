//! Peer registry and the client used to read peers' chains.
//!
//! Peers are identified only by `host[:port]`. The set only ever grows; there
//! is no removal or liveness tracking.

use crate::blockchain::Block;
use crate::error::{ChainError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Reduce a peer URL to its `host[:port]` identity.
///
/// `http://10.0.0.2:5000/chain` becomes `10.0.0.2:5000`. A bare `host:port`
/// with no scheme is taken as is.
pub fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ChainError::InvalidPeerAddress("address is empty".to_string()));
    }

    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{}", trimmed))
    }
    .map_err(|e| ChainError::InvalidPeerAddress(format!("{}: {}", trimmed, e)))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ChainError::InvalidPeerAddress(format!("{}: no host", trimmed)))?;

    // Peers are always queried over plain http, so only port 80 may be left
    // implicit. `https://a:443` must stay `a:443` or it would be fetched on 80.
    let port = if url.scheme() == "http" {
        url.port()
    } else {
        url.port_or_known_default()
    };

    Ok(match port {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Deduplicated, grow-only set of peer identities.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    peers: BTreeSet<String>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert. Returns the stored identity; inserting it again is a no-op.
    pub fn register(&mut self, address: &str) -> Result<String> {
        let peer = normalize_address(address)?;
        self.peers.insert(peer.clone());
        Ok(peer)
    }

    pub fn list_peers(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }
}

/// Body of a peer's `GET /chain` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Fetches a peer's current chain. Any failure is reported as an error and the
/// caller decides what to do with the peer.
#[async_trait]
pub trait PeerClient: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse>;
}

/// HTTP implementation querying `http://{peer}/chain`.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    client: Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse> {
        let response = self
            .client
            .get(format!("http://{}/chain", peer))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::NetworkError(format!(
                "peer {} answered with status {}",
                peer, status
            )));
        }

        Ok(response.json::<ChainResponse>().await?)
    }
}
