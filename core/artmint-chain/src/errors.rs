//! Error types for chain primitives and RPC access

use thiserror::Error;

/// Chain-level errors
#[derive(Error, Debug)]
pub enum ChainError {
    /// Malformed base58 key or wrong length
    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    /// Malformed base58 signature or hash
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Seeds hashed to a point on the ed25519 curve
    #[error("Invalid seeds: address must fall off the curve")]
    InvalidSeeds,

    /// Seed longer than 32 bytes
    #[error("Seed too long: {len} > 32 bytes")]
    SeedTooLong { len: usize },

    /// No bump seed produced an off-curve address
    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,

    /// Message references more accounts than a legacy message can index
    #[error("Too many accounts in message: {0}")]
    TooManyAccounts(usize),

    /// Signer is not one of the message's required signers
    #[error("Key {0} is not a required signer of this transaction")]
    NotASigner(String),

    /// Transaction is missing signatures
    #[error("Transaction is not fully signed")]
    UnsignedTransaction,

    /// Wallet has no public key or no signing capability
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Wallet refused or failed to sign
    #[error("Signing failed: {0}")]
    Signing(String),

    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Unexpected RPC response shape
    #[error("Unexpected RPC response: {0}")]
    RpcResponse(String),

    /// Transaction landed but failed on chain
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
