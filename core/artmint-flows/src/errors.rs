//! Error types for burn, inventory and mint flows

use artmint_chain::ChainError;
use thiserror::Error;

/// Flow errors
#[derive(Error, Debug)]
pub enum FlowError {
    /// No public key or no signing capability
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Amount not a positive finite number, or not representable in raw units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Token account does not exist
    #[error("Token account not found: {0}")]
    AccountNotFound(String),

    /// Balance below the requested amount (raw units)
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    /// Transaction submitted but never reached the requested commitment
    #[error("Transaction not confirmed: {0}")]
    NotConfirmed(String),

    /// Payment transfer never confirmed; minting was not attempted
    #[error("Payment not confirmed: {0}")]
    PaymentNotConfirmed(String),

    /// NFT metadata rejected before upload
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Decentralized storage upload failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// NFT creation failed
    #[error("Mint error: {0}")]
    Mint(String),

    /// Token metadata lookup failed
    #[error("Metadata source error: {0}")]
    MetadataSource(String),

    /// Chain or RPC error
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    /// Caller supplied something unusable, as opposed to an upstream failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FlowError::InvalidAmount(_)
                | FlowError::InvalidMetadata(_)
                | FlowError::Chain(ChainError::InvalidPubkey(_))
        )
    }
}

/// Result type for flow operations
pub type FlowResult<T> = Result<T, FlowError>;
