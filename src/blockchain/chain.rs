use chrono::{TimeZone, Utc};
use log::warn;
use thiserror::Error;

use std::sync::{Arc, Mutex};

use super::block::Block;
use super::crypto::Address;
use super::transaction::{Transaction, TransactionError};

/// Errors that can occur when submitting transactions to the chain
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Transaction must include a sender and a recipient address")]
    MissingParty,

    #[error("Cannot add invalid transaction to the chain")]
    InvalidSignature,

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Represents the blockchain: the block sequence, the pending transaction
/// pool, and the mining parameters.
///
/// Each instance is an independent value with no process-wide state. The
/// interior `Mutex`es make pool mutation and block append safe to expose to
/// concurrent callers, though the design assumes one mutator at a time.
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// The chain of blocks, starting with the genesis block
    chain: Arc<Mutex<Vec<Block>>>,

    /// Transactions accepted but not yet included in a mined block
    pending_transactions: Arc<Mutex<Vec<Transaction>>>,

    /// Mining difficulty (number of leading zeros required in hash)
    difficulty: usize,

    /// Mining reward
    mining_reward: f64,
}

const DIFFICULTY: usize = 2;
const MINING_REWARD: f64 = 100.0;

impl Blockchain {
    /// Creates a new blockchain holding only the genesis block
    pub fn new() -> Self {
        Blockchain {
            chain: Arc::new(Mutex::new(vec![Self::create_genesis_block()])),
            pending_transactions: Arc::new(Mutex::new(Vec::new())),
            difficulty: DIFFICULTY,
            mining_reward: MINING_REWARD,
        }
    }

    /// Creates the genesis block.
    ///
    /// Pure: fixed timestamp, no transactions, sentinel previous hash.
    /// Validation re-derives it for the field-wise comparison against
    /// `chain[0]`.
    pub fn create_genesis_block() -> Block {
        let timestamp = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
        Block::new(timestamp, Vec::new(), "0".to_string())
    }

    /// Gets the last block in the chain; never empty since genesis always
    /// exists
    pub fn get_latest_block(&self) -> Block {
        let chain = self.chain.lock().unwrap();
        chain.last().unwrap().clone()
    }

    /// Adds a new transaction to the pending pool.
    ///
    /// Rejects transactions missing a party or failing signature
    /// verification; the pool is unchanged on rejection. No balance check is
    /// performed, a sender may overspend. Reward transactions never pass
    /// through here; the mining cycle injects them directly, so a sentinel
    /// sender counts as an absent party.
    pub fn add_transaction(&self, transaction: Transaction) -> Result<(), ChainError> {
        if transaction.is_reward()
            || transaction.sender.0.is_empty()
            || transaction.recipient.0.is_empty()
        {
            return Err(ChainError::MissingParty);
        }

        if !transaction.is_valid()? {
            warn!(
                "Rejected transaction from {}: signature does not verify",
                transaction.sender
            );
            return Err(ChainError::InvalidSignature);
        }

        self.pending_transactions.lock().unwrap().push(transaction);

        Ok(())
    }

    /// Mines the pending transactions into a new block.
    ///
    /// Appends a reward transaction for `reward_address` to the pool, mines
    /// a block over the whole pool on top of the latest block, appends it to
    /// the chain and clears the pool. This is the only way new blocks are
    /// created; the block becomes visible only after the nonce search has
    /// satisfied the difficulty target.
    pub fn mine_pending_transactions(&self, reward_address: &Address) -> Block {
        let reward_tx = Transaction::new_reward(reward_address.clone(), self.mining_reward);

        // Snapshot and clear the pool; the block owns the snapshot
        let transactions = {
            let mut pending = self.pending_transactions.lock().unwrap();
            pending.push(reward_tx);
            std::mem::take(&mut *pending)
        };

        let mut chain = self.chain.lock().unwrap();
        let previous_hash = chain.last().unwrap().hash.clone();

        let mut block = Block::new(Utc::now(), transactions, previous_hash);
        block.mine(self.difficulty);

        chain.push(block.clone());

        block
    }

    /// Gets the balance of an address.
    ///
    /// Full walk over every transaction in every block; no incremental
    /// index is maintained.
    pub fn get_balance_of_address(&self, address: &Address) -> f64 {
        let mut balance = 0.0;

        for block in self.chain.lock().unwrap().iter() {
            for transaction in &block.transactions {
                if &transaction.sender == address {
                    balance -= transaction.amount;
                }

                if &transaction.recipient == address {
                    balance += transaction.amount;
                }
            }
        }

        balance
    }

    /// Validates the whole chain.
    ///
    /// The genesis block must equal a freshly derived one field for field;
    /// every later block must contain only valid transactions, carry a hash
    /// matching its recomputed hash, and link to its predecessor's stored
    /// hash. Short-circuits on the first violation; never panics on a
    /// tampered chain.
    pub fn is_chain_valid(&self) -> bool {
        let chain = self.chain.lock().unwrap();

        if chain.first() != Some(&Self::create_genesis_block()) {
            return false;
        }

        for i in 1..chain.len() {
            let current_block = &chain[i];
            let previous_block = &chain[i - 1];

            if !current_block.has_valid_transactions() {
                return false;
            }

            if current_block.hash != current_block.calculate_hash() {
                return false;
            }

            if current_block.previous_hash != previous_block.hash {
                return false;
            }
        }

        true
    }

    /// Gets a snapshot of the entire chain
    pub fn get_chain(&self) -> Vec<Block> {
        self.chain.lock().unwrap().clone()
    }

    /// Gets a snapshot of the pending transactions
    pub fn get_pending_transactions(&self) -> Vec<Transaction> {
        self.pending_transactions.lock().unwrap().clone()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
