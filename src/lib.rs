//! A minimal single-process ledger that chains blocks of signed
//! value-transfer records with SHA-256 hashing and a tunable proof-of-work
//! puzzle, and can validate end to end that nothing in the chain was altered
//! after the fact.
//!
//! The externally consumed surface is small: construct a [`Blockchain`],
//! submit signed [`Transaction`]s, mine the pending pool, query balances,
//! and validate the chain.
//!
//! ```no_run
//! use minichain::{Blockchain, Transaction, Wallet};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let wallet = Wallet::new()?;
//! let friend = Wallet::new()?;
//!
//! let chain = Blockchain::new();
//!
//! let mut tx = Transaction::new(wallet.address().clone(), friend.address().clone(), 10.0);
//! tx.sign(&wallet)?;
//! chain.add_transaction(tx)?;
//!
//! chain.mine_pending_transactions(wallet.address());
//!
//! assert_eq!(chain.get_balance_of_address(friend.address()), 10.0);
//! assert!(chain.is_chain_valid());
//! # Ok(())
//! # }
//! ```
//!
//! Networking, persistence and multi-node consensus are out of scope; this
//! crate covers the local data-structure and cryptographic guarantees a
//! consensus protocol would sit on top of.

pub mod blockchain;

pub use blockchain::{
    Address, Block, Blockchain, ChainError, CryptoError, DigitalSignature, Transaction,
    TransactionError, Wallet,
};
