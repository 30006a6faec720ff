// Ledger core
//
// This module contains the chain-integrity engine:
// - Cryptography utilities (keypairs, addresses, signatures)
// - Transaction structure with signing and verification
// - Block structure with hashing and proof-of-work mining
// - Blockchain structure with the pending pool and full-chain validation

pub mod block;
pub mod chain;
pub mod crypto;
pub mod transaction;

// Re-export main components for easier access
pub use block::Block;
pub use chain::{Blockchain, ChainError};
pub use crypto::{Address, CryptoError, DigitalSignature, Wallet};
pub use transaction::{Transaction, TransactionError};
