use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::crypto::{verify_signature, Address, CryptoError, DigitalSignature, Wallet};

/// Errors that can occur during transaction operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Cannot sign transactions for other wallets")]
    UnauthorizedSigner,

    #[error("No signature in this transaction")]
    MissingSignature,

    #[error("Transaction already signed")]
    AlreadySigned,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// A single value transfer between two addresses.
///
/// The signature is computed over the hash of the unsigned content
/// (sender, recipient, amount) and is never part of that hash, so signing
/// does not change what gets signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's address, or the reward sentinel for mining payouts
    pub sender: Address,

    /// Recipient's address
    pub recipient: Address,

    /// Amount being transferred
    pub amount: f64,

    /// Digital signature of the transaction, absent until signed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<DigitalSignature>,
}

impl Transaction {
    /// Creates a new unsigned transaction
    pub fn new(sender: Address, recipient: Address, amount: f64) -> Self {
        Transaction {
            sender,
            recipient,
            amount,
            signature: None,
        }
    }

    /// Creates a mining reward transaction.
    ///
    /// Reward transactions carry the sentinel sender and no signature; they
    /// are injected by the mining cycle, never submitted by wallets.
    pub fn new_reward(recipient: Address, amount: f64) -> Self {
        Transaction {
            sender: Address::reward(),
            recipient,
            amount,
            signature: None,
        }
    }

    /// Checks if the transaction is a mining reward
    pub fn is_reward(&self) -> bool {
        self.sender.is_reward_sentinel()
    }

    /// Calculates the canonical hash of the transaction.
    ///
    /// The hash covers sender, recipient and amount only. It is stable
    /// across process runs and independent of the signature.
    pub fn calculate_hash(&self) -> String {
        let payload = serde_json::json!({
            "sender": self.sender.0,
            "recipient": self.recipient.0,
            "amount": self.amount,
        });

        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_string(&payload).unwrap().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Signs the transaction with a wallet
    pub fn sign(&mut self, wallet: &Wallet) -> Result<(), TransactionError> {
        // A transaction is signed once and immutable afterwards
        if self.signature.is_some() {
            return Err(TransactionError::AlreadySigned);
        }

        // Only the declared sender may sign
        if wallet.address() != &self.sender {
            return Err(TransactionError::UnauthorizedSigner);
        }

        let digest = self.calculate_hash();
        let signature = wallet.sign(digest.as_bytes())?;

        self.signature = Some(signature);

        Ok(())
    }

    /// Checks whether the transaction is correctly signed.
    ///
    /// Reward transactions are always valid. A missing signature on a
    /// non-reward transaction is an error; a signature that fails to verify
    /// (or a sender that is not a decodable public key) yields `Ok(false)`.
    pub fn is_valid(&self) -> Result<bool, TransactionError> {
        if self.is_reward() {
            return Ok(true);
        }

        let signature = match &self.signature {
            Some(sig) => sig,
            None => return Err(TransactionError::MissingSignature),
        };

        let public_key = match self.sender.to_public_key() {
            Ok(key) => key,
            Err(_) => return Ok(false),
        };

        let digest = self.calculate_hash();

        match verify_signature(digest.as_bytes(), signature, &public_key) {
            Ok(valid) => Ok(valid),
            Err(_) => Ok(false),
        }
    }
}
