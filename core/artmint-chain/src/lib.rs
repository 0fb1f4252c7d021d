//! Solana primitives for Artmint
//!
//! Keys, program address derivation, SPL token instructions, legacy
//! transaction encoding and the cluster/wallet seams the flows run against.

pub mod errors;
pub mod pubkey;
pub mod rpc;
pub mod token;
pub mod transaction;
pub mod wallet;

pub use errors::{ChainError, ChainResult};
pub use pubkey::{Hash, Pubkey, Signature};
pub use rpc::{Commitment, Connection, ParsedTokenAccount, RpcConfig, SolanaRpcClient, TokenAmount};
pub use token::{get_associated_token_address, raw_to_ui_amount, ui_amount_to_raw, TOKEN_PROGRAM_ID};
pub use transaction::{AccountMeta, Instruction, Message, Transaction};
pub use wallet::{connected_key, KeypairWallet, Wallet};

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::{
        Commitment, Connection, Hash, Pubkey, Signature, Transaction, Wallet,
        ChainError, ChainResult,
    };
}
