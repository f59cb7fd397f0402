//! Chain conflict resolution against registered peers.
//!
//! Every peer is asked for its chain; the longest one that is strictly longer
//! than ours and passes structural validation wins. Peers that are down, slow,
//! answer with an error, or send something inconsistent are skipped. A single
//! bad peer never fails the whole pass.

use crate::blockchain::{validate_chain, Block};
use crate::error::{ChainError, Result};
use crate::network::{ChainResponse, PeerClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Result of a resolve pass as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Replaced,
    Kept,
}

impl ResolveOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, ResolveOutcome::Replaced)
    }
}

/// Longest-valid-chain selector.
pub struct ChainResolver {
    client: Arc<dyn PeerClient>,
    timeout: Duration,
}

impl ChainResolver {
    pub fn new(client: Arc<dyn PeerClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Query `peers` and return the best candidate chain, if any is strictly
    /// longer than `local_len` and valid.
    ///
    /// Peers are fetched concurrently but judged in the order given, so the
    /// outcome does not depend on which peer answers first.
    pub async fn find_longest_chain(&self, local_len: usize, peers: &[String]) -> Option<Vec<Block>> {
        let responses = self.fetch_all(peers).await;

        let mut max_length = local_len;
        let mut best: Option<(String, Vec<Block>)> = None;

        for (peer, response) in peers.iter().zip(responses) {
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!(peer = %peer, error = %e, "resolve.peer_skipped");
                    continue;
                }
            };

            if response.length <= max_length {
                debug!(
                    peer = %peer,
                    length = response.length,
                    best = max_length,
                    "resolve.peer_not_longer"
                );
                continue;
            }

            match check_candidate(response) {
                Ok(chain) => {
                    max_length = chain.len();
                    best = Some((peer.clone(), chain));
                }
                Err(e) => warn!(peer = %peer, error = %e, "resolve.candidate_rejected"),
            }
        }

        best.map(|(peer, chain)| {
            info!(peer = %peer, length = chain.len(), local_len, "resolve.candidate_selected");
            chain
        })
    }

    async fn fetch_all(&self, peers: &[String]) -> Vec<Result<ChainResponse>> {
        let mut tasks = JoinSet::new();
        for (slot, peer) in peers.iter().cloned().enumerate() {
            let client = self.client.clone();
            let timeout = self.timeout;
            tasks.spawn(async move {
                let result = match tokio::time::timeout(timeout, client.fetch_chain(&peer)).await {
                    Ok(result) => result,
                    Err(_) => Err(ChainError::NetworkError(format!(
                        "peer {} did not answer within {:?}",
                        peer, timeout
                    ))),
                };
                (slot, result)
            });
        }

        let mut results: Vec<Option<Result<ChainResponse>>> = (0..peers.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, result)) => results[slot] = Some(result),
                Err(e) => warn!(error = %e, "resolve.fetch_task_failed"),
            }
        }

        results
            .into_iter()
            .map(|r| {
                r.unwrap_or_else(|| Err(ChainError::NetworkError("peer query did not complete".to_string())))
            })
            .collect()
    }
}

/// A response is usable when its reported length matches what was sent and
/// the chain validates.
fn check_candidate(response: ChainResponse) -> Result<Vec<Block>> {
    if response.length != response.chain.len() {
        return Err(ChainError::InvalidChain(format!(
            "reported length {} but sent {} blocks",
            response.length,
            response.chain.len()
        )));
    }
    validate_chain(&response.chain)?;
    Ok(response.chain)
}
