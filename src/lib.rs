//! Proofchain - a proof-of-work ledger replicated across cooperating nodes
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Block structure, the chain and structural validation
//! - [`transaction`] - Transaction records
//! - [`mempool`] - Pending transaction pool
//! - [`ledger`] - Shared ledger handle composing chain, pool and peers
//!
//! ## Consensus & Mining
//! - [`miner`] - Proof-of-work search and verification
//! - [`sync`] - Longest-valid-chain resolution against peers
//!
//! ## Cryptography
//! - [`crypto`] - Canonical block hashing
//!
//! ## Networking & Integration
//! - [`network`] - Peer registry and peer chain client
//! - [`api`] - HTTP endpoints
//! - [`node`] - Process-level node wiring
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod ledger;
pub mod mempool;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;
pub mod sync;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Networking & Integration
// ============================================================================
pub mod api;
pub mod network;
pub mod node;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
