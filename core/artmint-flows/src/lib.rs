//! Artmint wallet flows
//!
//! Reward calculation, token inventory, burning and NFT minting, all written
//! against the `Connection` and `Wallet` seams from `artmint-chain` so they
//! run the same against a live cluster or a test double.

pub mod burn;
pub mod errors;
pub mod inventory;
pub mod metadata;
pub mod metrics;
pub mod mint;
pub mod reward;

pub use burn::{BurnFlow, BurnRequest, BurnResult, BurnStage};
pub use errors::{FlowError, FlowResult};
pub use inventory::{fetch_wallet_tokens, TokenInfo};
pub use metadata::{StaticTokenList, TokenMetadata, TokenMetadataCache, TokenMetadataSource};
pub use mint::{
    mint_with_sol, mint_with_token, MetadataStorage, MintRequest, MintResult, NftAttribute,
    NftIssuer, NftMintArgs, PaymentConfig, StorageFile,
};
pub use reward::{calculate_reward, lamports_to_sol, RewardQuote, RewardSchedule};
