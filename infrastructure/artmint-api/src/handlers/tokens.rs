//! Token inventory handler

use super::ok;
use crate::{error::ApiResult, state::AppState};
use actix_web::{web, HttpResponse};
use artmint_chain::Pubkey;
use artmint_flows::{fetch_wallet_tokens, TokenInfo};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WalletTokensResponse {
    pub wallet: Pubkey,
    pub count: usize,
    pub tokens: Vec<TokenInfo>,
}

/// Fungible tokens with a positive balance held by `wallet`
pub async fn get_wallet_tokens(
    state: web::Data<AppState>,
    wallet: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner: Pubkey = wallet.parse()?;
    let connection = state.connection()?;

    let tokens = fetch_wallet_tokens(connection, &owner, state.metadata.as_deref()).await?;
    Ok(ok(WalletTokensResponse {
        wallet: owner,
        count: tokens.len(),
        tokens,
    }))
}
