//! Proof-of-work search and verification.
//!
//! A proof is valid when SHA-256 of the decimal concatenation of the previous
//! proof and the candidate starts with [`DIFFICULTY_PREFIX`]. The difficulty is
//! fixed; there is no retargeting.

use crate::crypto::sha256_hex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Leading hex digits a valid proof hash must have.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// How many candidates are tried between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

pub fn verify_proof(prev_proof: u64, candidate: u64) -> bool {
    let guess = format!("{}{}", prev_proof, candidate);
    sha256_hex(guess.as_bytes()).starts_with(DIFFICULTY_PREFIX)
}

/// Smallest non-negative proof accepted after `prev_proof`. Unbounded.
pub fn find_proof(prev_proof: u64) -> u64 {
    let mut candidate = 0;
    while !verify_proof(prev_proof, candidate) {
        candidate += 1;
    }
    candidate
}

/// Same scan as [`find_proof`], but gives up with `None` once `cancel` is set.
pub fn find_proof_cancellable(prev_proof: u64, cancel: &AtomicBool) -> Option<u64> {
    let mut candidate = 0u64;
    loop {
        if candidate % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return None;
        }
        if verify_proof(prev_proof, candidate) {
            return Some(candidate);
        }
        candidate += 1;
    }
}
