use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::transaction::Transaction;

/// Represents a block in the chain.
///
/// `PartialEq` is derived so the genesis block can be compared field by
/// field against a freshly constructed one during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Timestamp when the block was created
    pub timestamp: DateTime<Utc>,

    /// List of transactions included in this block, order is part of the hash
    pub transactions: Vec<Transaction>,

    /// Hash of the previous block, `"0"` for genesis
    pub previous_hash: String,

    /// Cached hash of this block's contents
    pub hash: String,

    /// Proof-of-work counter
    pub nonce: u64,
}

impl Block {
    /// Creates a new block.
    ///
    /// The timestamp is passed in rather than sampled here so that the
    /// genesis block is reproducible. The block takes ownership of its
    /// transactions; later changes to the pending pool cannot reach a
    /// mined block.
    pub fn new(
        timestamp: DateTime<Utc>,
        transactions: Vec<Transaction>,
        previous_hash: String,
    ) -> Self {
        let mut block = Block {
            timestamp,
            transactions,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        };

        block.hash = block.calculate_hash();
        block
    }

    /// Calculates the hash of the block.
    ///
    /// The SHA-256 digest covers previous hash, timestamp, the serialized
    /// transaction list (order preserving) and the nonce, as a hexadecimal
    /// string.
    pub fn calculate_hash(&self) -> String {
        let block_data = serde_json::json!({
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
            "nonce": self.nonce,
        });

        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_string(&block_data).unwrap().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Mines the block at the given difficulty.
    ///
    /// Brute-force search: increment the nonce and rehash until the hash
    /// starts with `difficulty` zero characters. Runs to completion on the
    /// calling thread; expected iteration count grows exponentially with
    /// difficulty.
    pub fn mine(&mut self, difficulty: usize) {
        let target = "0".repeat(difficulty);

        while !self.hash.starts_with(&target) {
            self.nonce += 1;
            self.hash = self.calculate_hash();
        }

        info!(
            "Block mined: {} (difficulty {}, nonce {})",
            self.hash, difficulty, self.nonce
        );
    }

    /// Checks every contained transaction's validity.
    ///
    /// Each transaction's validity predicate is actually invoked; an
    /// unsigned non-reward transaction counts as invalid rather than
    /// aborting the walk. A single bad transaction makes the whole block's
    /// transaction set invalid.
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions
            .iter()
            .all(|tx| matches!(tx.is_valid(), Ok(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::crypto::{Address, Wallet};

    fn signed_transaction(amount: f64) -> Transaction {
        let sender_wallet = Wallet::new().unwrap();
        let recipient_wallet = Wallet::new().unwrap();

        let mut transaction = Transaction::new(
            sender_wallet.address().clone(),
            recipient_wallet.address().clone(),
            amount,
        );
        transaction.sign(&sender_wallet).unwrap();

        transaction
    }

    #[test]
    fn test_new_block() {
        let transaction = signed_transaction(10.0);

        let block = Block::new(Utc::now(), vec![transaction], "previous_hash".to_string());

        assert_eq!(block.previous_hash, "previous_hash");
        assert_eq!(block.nonce, 0);
        assert_eq!(block.hash, block.calculate_hash());
        assert_eq!(block.hash.len(), 64); // SHA-256 hash is 64 characters in hex
    }

    #[test]
    fn test_hash_changes_with_any_field() {
        let transaction = signed_transaction(10.0);
        let block = Block::new(Utc::now(), vec![transaction], "previous_hash".to_string());

        let mut tampered = block.clone();
        tampered.nonce += 1;
        assert_ne!(block.calculate_hash(), tampered.calculate_hash());

        let mut tampered = block.clone();
        tampered.previous_hash = "other".to_string();
        assert_ne!(block.calculate_hash(), tampered.calculate_hash());

        let mut tampered = block.clone();
        tampered.timestamp = tampered.timestamp + chrono::Duration::seconds(1);
        assert_ne!(block.calculate_hash(), tampered.calculate_hash());

        let mut tampered = block.clone();
        tampered.transactions[0].amount = 999.0;
        assert_ne!(block.calculate_hash(), tampered.calculate_hash());
    }

    #[test]
    fn test_mining_postcondition() {
        let transaction = signed_transaction(10.0);
        let mut block = Block::new(Utc::now(), vec![transaction], "previous_hash".to_string());

        block.mine(2);

        assert!(block.hash.starts_with("00"));
        assert_eq!(block.hash, block.calculate_hash());
    }

    #[test]
    fn test_valid_transactions_detected() {
        let transaction = signed_transaction(10.0);
        let reward = Transaction::new_reward(Address::reward(), 100.0);

        let block = Block::new(
            Utc::now(),
            vec![transaction, reward],
            "previous_hash".to_string(),
        );

        assert!(block.has_valid_transactions());
    }

    #[test]
    fn test_tampered_transaction_detected() {
        let transaction = signed_transaction(10.0);
        let mut block = Block::new(Utc::now(), vec![transaction], "previous_hash".to_string());

        block.transactions[0].amount = 999.0;

        assert!(!block.has_valid_transactions());
    }

    #[test]
    fn test_unsigned_transaction_detected() {
        let sender_wallet = Wallet::new().unwrap();
        let recipient_wallet = Wallet::new().unwrap();

        let unsigned = Transaction::new(
            sender_wallet.address().clone(),
            recipient_wallet.address().clone(),
            10.0,
        );

        let block = Block::new(Utc::now(), vec![unsigned], "previous_hash".to_string());

        assert!(!block.has_valid_transactions());
    }
}
