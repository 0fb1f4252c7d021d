//! Wallet seam and a local keypair implementation

use crate::errors::{ChainError, ChainResult};
use crate::pubkey::{Pubkey, Signature};
use crate::transaction::Transaction;
use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use std::path::Path;

/// Anything that can identify itself and sign transactions
#[async_trait]
pub trait Wallet: Send + Sync {
    /// `None` while disconnected
    fn public_key(&self) -> Option<Pubkey>;

    /// Whether the wallet exposes a signing capability
    fn can_sign(&self) -> bool {
        true
    }

    /// Return the transaction with this wallet's signature slot filled
    async fn sign_transaction(&self, transaction: Transaction) -> ChainResult<Transaction>;
}

/// Connected public key of a wallet that is also able to sign
pub fn connected_key(wallet: &dyn Wallet) -> ChainResult<Pubkey> {
    match wallet.public_key() {
        Some(key) if wallet.can_sign() => Ok(key),
        _ => Err(ChainError::WalletNotConnected),
    }
}

/// Wallet backed by an in-process ed25519 key
pub struct KeypairWallet {
    signing_key: SigningKey,
    pubkey: Pubkey,
}

impl KeypairWallet {
    pub fn new(signing_key: SigningKey) -> Self {
        let pubkey = Pubkey::new(signing_key.verifying_key().to_bytes());
        Self { signing_key, pubkey }
    }

    /// From the 64-byte secret||public layout used by Solana keypair files
    pub fn from_keypair_bytes(bytes: &[u8]) -> ChainResult<Self> {
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| ChainError::Signing(format!("keypair must be 64 bytes, got {}", bytes.len())))?;
        let signing_key =
            SigningKey::from_keypair_bytes(&bytes).map_err(|e| ChainError::Signing(e.to_string()))?;
        Ok(Self::new(signing_key))
    }

    /// Load a JSON keypair file (array of 64 integers)
    pub fn from_file(path: impl AsRef<Path>) -> ChainResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let bytes: Vec<u8> = serde_json::from_str(&contents)?;
        Self::from_keypair_bytes(&bytes)
    }

    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.pubkey)
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> ChainResult<Transaction> {
        let signature = self.signing_key.sign(&transaction.message_data());
        transaction.add_signature(&self.pubkey, Signature::new(signature.to_bytes()))?;
        Ok(transaction)
    }
}
