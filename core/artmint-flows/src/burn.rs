//! Token burn flow
//!
//! Validates the request against the on-chain balance, builds a single SPL
//! `Burn` instruction, has the wallet sign it and waits for `confirmed`.
//! A confirmed burn is final. The computed reward is reported but no
//! transfer pays it out; the funding source is an open product question.

use crate::errors::{FlowError, FlowResult};
use crate::metrics;
use crate::reward::{lamports_to_sol, RewardSchedule};
use artmint_chain::{
    connected_key, get_associated_token_address, token, ui_amount_to_raw, ChainError, Commitment,
    Connection, Message, Pubkey, Signature, Transaction, Wallet,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where a burn currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnStage {
    Idle,
    Validating,
    Submitted,
    Confirmed,
    Failed,
}

/// What to burn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnRequest {
    pub mint: Pubkey,
    /// Human-readable amount
    pub amount: f64,
    pub decimals: u8,
}

/// Outcome of a confirmed burn
#[derive(Debug, Clone, Serialize)]
pub struct BurnResult {
    pub signature: Signature,
    pub burned_amount: f64,
    /// Lamports
    pub reward: u64,
    pub message: String,
}

/// One burn attempt; no retries, re-run with a fresh flow
pub struct BurnFlow<'a> {
    connection: &'a dyn Connection,
    wallet: &'a dyn Wallet,
    schedule: RewardSchedule,
    stage: BurnStage,
}

impl<'a> BurnFlow<'a> {
    pub fn new(connection: &'a dyn Connection, wallet: &'a dyn Wallet, schedule: RewardSchedule) -> Self {
        Self {
            connection,
            wallet,
            schedule,
            stage: BurnStage::Idle,
        }
    }

    pub fn stage(&self) -> BurnStage {
        self.stage
    }

    pub async fn execute(&mut self, request: &BurnRequest) -> FlowResult<BurnResult> {
        self.stage = BurnStage::Validating;
        match self.run(request).await {
            Ok(result) => {
                self.stage = BurnStage::Confirmed;
                metrics::record_flow("burn", true);
                metrics::record_burn(result.burned_amount, result.reward);
                Ok(result)
            }
            Err(e) => {
                self.stage = BurnStage::Failed;
                metrics::record_flow("burn", false);
                warn!("Burn of {} {} failed: {}", request.amount, request.mint, e);
                Err(e)
            }
        }
    }

    async fn run(&mut self, request: &BurnRequest) -> FlowResult<BurnResult> {
        let owner = require_wallet(self.wallet)?;
        let raw_amount = positive_raw_amount(request.amount, request.decimals)?;

        let token_account = get_associated_token_address(&owner, &request.mint)?;
        let balance = self
            .connection
            .get_token_account_balance(&token_account)
            .await?
            .ok_or_else(|| FlowError::AccountNotFound(token_account.to_string()))?;

        // The raw amount must be in the mint's own units
        if balance.decimals != request.decimals {
            return Err(FlowError::InvalidAmount(format!(
                "{} uses {} decimals, request says {}",
                request.mint, balance.decimals, request.decimals
            )));
        }

        if balance.amount < raw_amount {
            return Err(FlowError::InsufficientBalance {
                have: balance.amount,
                need: raw_amount,
            });
        }

        let reward = self.schedule.reward_for(request.amount);

        let instruction = token::burn(&token_account, &request.mint, &owner, raw_amount);
        let signature = sign_and_send(self.connection, self.wallet, &owner, instruction).await?;
        self.stage = BurnStage::Submitted;
        debug!("Burn {} submitted, waiting for confirmation", signature);

        if !self.connection.confirm_transaction(&signature, Commitment::Confirmed).await? {
            return Err(FlowError::NotConfirmed(signature.to_string()));
        }

        info!(
            "Burned {} of {} ({} raw) in {}, reward {} lamports",
            request.amount, request.mint, raw_amount, signature, reward
        );
        Ok(BurnResult {
            signature,
            burned_amount: request.amount,
            reward,
            message: format!(
                "Burned {} tokens. Reward earned: {} SOL",
                request.amount,
                lamports_to_sol(reward)
            ),
        })
    }
}

/// Connected key or `WalletNotConnected`, before any network call
pub(crate) fn require_wallet(wallet: &dyn Wallet) -> FlowResult<Pubkey> {
    connected_key(wallet).map_err(|e| match e {
        ChainError::WalletNotConnected => FlowError::WalletNotConnected,
        other => FlowError::Chain(other),
    })
}

pub(crate) fn positive_raw_amount(amount: f64, decimals: u8) -> FlowResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FlowError::InvalidAmount(format!("{} is not a positive amount", amount)));
    }
    match ui_amount_to_raw(amount, decimals) {
        Some(raw) if raw > 0 => Ok(raw),
        _ => Err(FlowError::InvalidAmount(format!(
            "{} is not representable with {} decimals",
            amount, decimals
        ))),
    }
}

/// Blockhash, fee payer, wallet signature, submission
pub(crate) async fn sign_and_send(
    connection: &dyn Connection,
    wallet: &dyn Wallet,
    payer: &Pubkey,
    instruction: artmint_chain::Instruction,
) -> FlowResult<Signature> {
    let blockhash = connection.get_latest_blockhash().await?;
    let message = Message::new(&[instruction], payer, blockhash)?;
    let signed = wallet.sign_transaction(Transaction::new_unsigned(message)).await?;
    if !signed.is_signed() {
        return Err(FlowError::Chain(ChainError::UnsignedTransaction));
    }
    Ok(connection.send_transaction(&signed).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_raw_amount() {
        assert_eq!(positive_raw_amount(1.25, 2).unwrap(), 125);
        assert!(matches!(positive_raw_amount(0.0, 9), Err(FlowError::InvalidAmount(_))));
        assert!(matches!(positive_raw_amount(-3.0, 9), Err(FlowError::InvalidAmount(_))));
        assert!(matches!(positive_raw_amount(f64::INFINITY, 9), Err(FlowError::InvalidAmount(_))));
        // Rounds to zero raw units
        assert!(matches!(positive_raw_amount(0.001, 2), Err(FlowError::InvalidAmount(_))));
    }
}
