//! The ledger: chain, pending pool and peer set behind one shared handle.
//!
//! Chain and pending pool share a single mutex so that minting (drain + append)
//! and resolving (wholesale swap) never interleave. The peer set has its own
//! lock. Proof-of-work and peer queries both run with no lock held; the
//! mutex is only retaken to check that the tail is still what the work was
//! based on and then commit.

use crate::blockchain::{Block, Blockchain};
use crate::error::{ChainError, Result};
use crate::mempool::Mempool;
use crate::miner::find_proof_cancellable;
use crate::network::{HttpPeerClient, NodeSet, PeerClient};
use crate::sync::{ChainResolver, ResolveOutcome};
use crate::transaction::Transaction;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

struct LedgerState {
    chain: Blockchain,
    mempool: Mempool,
}

pub struct Ledger {
    state: Mutex<LedgerState>,
    nodes: RwLock<NodeSet>,
    resolver: ChainResolver,
    cancel_mining: AtomicBool,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new(client: Arc<dyn PeerClient>, peer_timeout: Duration) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                chain: Blockchain::new(),
                mempool: Mempool::new(),
            }),
            nodes: RwLock::new(NodeSet::new()),
            resolver: ChainResolver::new(client, peer_timeout),
            cancel_mining: AtomicBool::new(false),
        }
    }

    /// Create a ledger that queries peers over HTTP.
    pub fn with_http_client(peer_timeout: Duration) -> Result<Self> {
        let client = HttpPeerClient::new(peer_timeout)?;
        Ok(Self::new(Arc::new(client), peer_timeout))
    }

    /// Queue a transaction. Returns the index of the block it should land in.
    pub fn submit_transaction(&self, sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> u64 {
        let mut state = self.state.lock();
        state.mempool.add_transaction(Transaction::new(sender, recipient, amount));
        state.chain.next_index()
    }

    /// Mint the next block from whatever is pending.
    pub fn mint_block(&self) -> Result<Block> {
        self.mint(None)
    }

    /// Mint the next block and append `reward` after the pending transactions.
    pub fn mine(&self, reward: Transaction) -> Result<Block> {
        self.mint(Some(reward))
    }

    fn mint(&self, reward: Option<Transaction>) -> Result<Block> {
        self.mint_with(reward, |tail_proof| {
            find_proof_cancellable(tail_proof, &self.cancel_mining)
        })
    }

    /// Snapshot the tail, run `search` with no lock held, then commit only if
    /// the tail is unchanged. Otherwise search again on the new tail.
    fn mint_with<F>(&self, reward: Option<Transaction>, mut search: F) -> Result<Block>
    where
        F: FnMut(u64) -> Option<u64>,
    {
        loop {
            let (tail_proof, tail_hash) = {
                let state = self.state.lock();
                let tail = state.chain.last_block();
                (tail.proof, tail.hash())
            };

            let proof = search(tail_proof).ok_or(ChainError::MiningCancelled)?;

            let mut state = self.state.lock();
            if state.chain.last_block().hash() != tail_hash {
                debug!(proof, "mint.tail_moved");
                continue;
            }

            let mut transactions = state.mempool.drain();
            transactions.extend(reward.clone());
            let block = state.chain.push(transactions, proof).clone();

            info!(
                index = block.index,
                proof = block.proof,
                transactions = block.transactions.len(),
                "mint.block_forged"
            );
            return Ok(block);
        }
    }

    /// Stop any running and future proof-of-work searches.
    pub fn cancel_mining(&self) {
        self.cancel_mining.store(true, Ordering::Relaxed);
    }

    /// Register one peer. Returns its normalized `host[:port]` identity.
    pub fn register_peer(&self, address: &str) -> Result<String> {
        let peer = self.nodes.write().register(address)?;
        info!(peer = %peer, "peer.registered");
        Ok(peer)
    }

    /// Register several peers. Either all addresses are accepted or none is stored.
    pub fn register_peers<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<String>> {
        for address in addresses {
            crate::network::normalize_address(address.as_ref())?;
        }
        addresses
            .iter()
            .map(|address| self.register_peer(address.as_ref()))
            .collect()
    }

    /// Adopt the longest valid peer chain if it is strictly longer than ours.
    pub async fn resolve(&self) -> ResolveOutcome {
        let local_len = self.chain_len();
        let peers = self.peers();

        let Some(candidate) = self.resolver.find_longest_chain(local_len, &peers).await else {
            info!(local_len, peers = peers.len(), "resolve.kept");
            return ResolveOutcome::Kept;
        };

        self.adopt(candidate)
    }

    /// Swap in `candidate` if it is still strictly longer than the local chain.
    fn adopt(&self, candidate: Vec<Block>) -> ResolveOutcome {
        let mut state = self.state.lock();
        let previous_len = state.chain.len();
        // The local chain may have grown while peers were being queried.
        if candidate.len() <= previous_len {
            info!(
                local_len = previous_len,
                candidate_len = candidate.len(),
                "resolve.kept"
            );
            return ResolveOutcome::Kept;
        }

        if !state.chain.replace(candidate) {
            warn!(local_len = previous_len, "resolve.empty_candidate");
            return ResolveOutcome::Kept;
        }
        info!(previous_len, new_len = state.chain.len(), "resolve.replaced");
        ResolveOutcome::Replaced
    }

    pub fn chain(&self) -> Vec<Block> {
        self.state.lock().chain.blocks().to_vec()
    }

    pub fn chain_len(&self) -> usize {
        self.state.lock().chain.len()
    }

    pub fn last_block(&self) -> Block {
        self.state.lock().chain.last_block().clone()
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.lock().mempool.get_all_transactions()
    }

    pub fn peers(&self) -> Vec<String> {
        self.nodes.read().list_peers()
    }
}
