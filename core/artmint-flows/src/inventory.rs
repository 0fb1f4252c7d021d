//! Wallet token inventory

use crate::errors::FlowResult;
use crate::metadata::TokenMetadataCache;
use artmint_chain::{raw_to_ui_amount, Connection, Pubkey, TOKEN_PROGRAM_ID};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
pub const UNKNOWN_NAME: &str = "Unknown Token";

/// Fungible token held by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub mint: Pubkey,
    pub symbol: String,
    pub name: String,
    /// Human-readable balance
    pub balance: f64,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Tokens with a strictly positive balance owned by `owner`
///
/// A failed query is an error, not an empty wallet. Metadata lookup failures
/// only degrade the display fields.
pub async fn fetch_wallet_tokens(
    connection: &dyn Connection,
    owner: &Pubkey,
    metadata: Option<&TokenMetadataCache>,
) -> FlowResult<Vec<TokenInfo>> {
    let accounts = connection
        .get_token_accounts_by_owner(owner, &TOKEN_PROGRAM_ID)
        .await
        .map_err(|e| {
            error!("Token account query for {} failed: {}", owner, e);
            e
        })?;

    let mut tokens = Vec::with_capacity(accounts.len());
    for account in accounts.into_iter().filter(|a| a.amount.amount > 0) {
        let mut info = TokenInfo {
            mint: account.mint,
            symbol: UNKNOWN_SYMBOL.to_string(),
            name: UNKNOWN_NAME.to_string(),
            balance: raw_to_ui_amount(account.amount.amount, account.amount.decimals),
            decimals: account.amount.decimals,
            logo_uri: None,
        };

        if let Some(cache) = metadata {
            match cache.get(&account.mint).await {
                Ok(Some(meta)) => {
                    info.symbol = meta.symbol;
                    info.name = meta.name;
                    info.logo_uri = meta.logo_uri;
                }
                Ok(None) => {}
                Err(e) => warn!("Metadata lookup for {} failed: {}", account.mint, e),
            }
        }

        tokens.push(info);
    }

    info!("Wallet {} holds {} tokens", owner, tokens.len());
    Ok(tokens)
}
