use crate::crypto::hash_block;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Proof value baked into every genesis block. Peers agree on it out of band;
/// it is never checked against the proof-of-work predicate.
pub const GENESIS_PROOF: u64 = 100;

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREV_HASH: &str = "1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Seconds since the Unix epoch at creation.
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub prev_hash: String,
}

impl Block {
    pub fn new(index: u64, transactions: Vec<Transaction>, proof: u64, prev_hash: String) -> Self {
        Block {
            index,
            timestamp: current_timestamp(),
            transactions,
            proof,
            prev_hash,
        }
    }

    pub fn genesis() -> Self {
        Self::new(1, Vec::new(), GENESIS_PROOF, GENESIS_PREV_HASH.to_string())
    }

    pub fn hash(&self) -> String {
        hash_block(self)
    }
}

/// Wall-clock seconds with sub-second precision.
pub fn current_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Append-only, never-empty sequence of blocks.
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Create a chain holding only a freshly synthesized genesis block.
    pub fn new() -> Self {
        Blockchain {
            blocks: vec![Block::genesis()],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn last_block(&self) -> &Block {
        // Construction always seeds genesis and `replace` refuses empty chains.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Index the next appended block will carry.
    pub fn next_index(&self) -> u64 {
        self.blocks.len() as u64 + 1
    }

    /// Build the successor of the current tail and append it.
    pub fn push(&mut self, transactions: Vec<Transaction>, proof: u64) -> &Block {
        let prev_hash = self.last_block().hash();
        let block = Block::new(self.next_index(), transactions, proof, prev_hash);
        self.blocks.push(block);
        self.last_block()
    }

    /// Swap in a whole new chain. Returns false and keeps the current one when
    /// `blocks` is empty.
    pub fn replace(&mut self, blocks: Vec<Block>) -> bool {
        if blocks.is_empty() {
            return false;
        }
        self.blocks = blocks;
        true
    }
}
