use crate::blockchain::core::chain::Block;
use crate::error::{ChainError, Result};
use crate::miner::verify_proof;

/// Walk every adjacent pair and check hash linkage and proof-of-work.
/// Transaction contents are not inspected.
pub fn validate_chain(chain: &[Block]) -> Result<()> {
    for pair in chain.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        let expected = prev.hash();
        if curr.prev_hash != expected {
            return Err(ChainError::InvalidChain(format!(
                "Block {} links to {}, expected {}.",
                curr.index, curr.prev_hash, expected
            )));
        }

        if !verify_proof(prev.proof, curr.proof) {
            return Err(ChainError::InvalidChain(format!(
                "Block {} carries proof {} which does not follow proof {}.",
                curr.index, curr.proof, prev.proof
            )));
        }
    }
    Ok(())
}

pub fn is_valid(chain: &[Block]) -> bool {
    validate_chain(chain).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Blockchain;
    use crate::miner::find_proof;
    use crate::transaction::Transaction;

    fn mined_chain(len: usize) -> Vec<Block> {
        let mut chain = Blockchain::new();
        while chain.len() < len {
            let proof = find_proof(chain.last_block().proof);
            chain.push(vec![Transaction::new("A", "B", chain.len() as f64)], proof);
        }
        chain.blocks().to_vec()
    }

    #[test]
    fn test_trivial_chains_are_valid() {
        assert!(is_valid(&[]));
        assert!(is_valid(&[Block::genesis()]));
    }

    #[test]
    fn test_mined_chain_is_valid() {
        assert!(is_valid(&mined_chain(4)));
    }

    #[test]
    fn test_tampered_prev_hash_is_invalid() {
        let chain = mined_chain(4);
        for i in 1..chain.len() {
            let mut tampered = chain.clone();
            tampered[i].prev_hash = "deadbeef".to_string();
            assert!(!is_valid(&tampered), "block {} prev_hash tamper went unnoticed", i);
        }
    }

    #[test]
    fn test_tampered_proof_is_invalid() {
        let chain = mined_chain(4);
        for i in 0..chain.len() {
            let mut tampered = chain.clone();
            // Pick a replacement that fails the predicate, so the last block cannot stay valid by luck.
            tampered[i].proof = (chain[i].proof + 1..)
                .find(|n| i == 0 || !verify_proof(chain[i - 1].proof, *n))
                .unwrap();
            assert!(!is_valid(&tampered), "block {} proof tamper went unnoticed", i);
        }
    }

    #[test]
    fn test_tampered_transactions_break_linkage() {
        let mut chain = mined_chain(3);
        chain[1].transactions[0].amount = 1_000.0;
        match validate_chain(&chain) {
            Err(ChainError::InvalidChain(msg)) => assert!(msg.starts_with("Block 3")),
            other => panic!("expected InvalidChain, got {:?}", other),
        }
    }
}
