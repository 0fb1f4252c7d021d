//! Cluster connection: trait seam plus an HTTP JSON-RPC implementation

use crate::errors::{ChainError, ChainResult};
use crate::pubkey::{Hash, Pubkey, Signature};
use crate::transaction::Transaction;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Finality level requested from the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Default for Commitment {
    fn default() -> Self {
        Commitment::Confirmed
    }
}

impl std::str::FromStr for Commitment {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(ChainError::InvalidEncoding(format!("unknown commitment: {}", other))),
        }
    }
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Balance of a single token account
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAmount {
    /// Raw integer units
    pub amount: u64,
    pub decimals: u8,
}

/// Token account as returned by a parsed owner query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTokenAccount {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: TokenAmount,
}

/// Everything the flows need from a cluster
#[async_trait]
pub trait Connection: Send + Sync {
    /// All token accounts owned by `owner` under `program_id`
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> ChainResult<Vec<ParsedTokenAccount>>;

    /// Balance of a token account, `None` if the account does not exist
    async fn get_token_account_balance(&self, account: &Pubkey) -> ChainResult<Option<TokenAmount>>;

    async fn get_latest_blockhash(&self) -> ChainResult<Hash>;

    /// Submit a fully signed transaction, returning its signature
    async fn send_transaction(&self, transaction: &Transaction) -> ChainResult<Signature>;

    /// Wait until `signature` reaches `commitment`; `Ok(false)` if it never did
    async fn confirm_transaction(&self, signature: &Signature, commitment: Commitment) -> ChainResult<bool>;
}

/// JSON-RPC client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Cluster endpoint
    pub url: String,

    /// Commitment used for reads and preflight
    pub commitment: Commitment,

    /// Delay between signature status polls
    pub confirm_poll_interval_ms: u64,

    /// Status polls before giving up on confirmation
    pub confirm_max_attempts: u32,

    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://api.devnet.solana.com".to_string(),
            commitment: Commitment::Confirmed,
            confirm_poll_interval_ms: 500,
            confirm_max_attempts: 120, // ~60s, roughly a blockhash lifetime
            request_timeout_secs: 30,
        }
    }
}

impl RpcConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiTokenAmount {
    amount: String,
    decimals: u8,
}

impl UiTokenAmount {
    fn into_token_amount(self) -> ChainResult<TokenAmount> {
        let amount = self
            .amount
            .parse::<u64>()
            .map_err(|e| ChainError::RpcResponse(format!("bad token amount {}: {}", self.amount, e)))?;
        Ok(TokenAmount { amount, decimals: self.decimals })
    }
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: Pubkey,
    account: AccountData,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    data: ParsedData,
}

#[derive(Debug, Deserialize)]
struct ParsedData {
    parsed: ParsedInfo,
}

#[derive(Debug, Deserialize)]
struct ParsedInfo {
    info: TokenAccountInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAccountInfo {
    mint: Pubkey,
    owner: Pubkey,
    token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: Hash,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    confirmation_status: Option<Commitment>,
    err: Option<Value>,
}

/// Solana JSON-RPC over HTTP
pub struct SolanaRpcClient {
    config: RpcConfig,
    http: reqwest::Client,
}

impl SolanaRpcClient {
    pub fn new(config: RpcConfig) -> ChainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ChainResult<T> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!("RPC {} -> {}", method, self.config.url);

        let response = self
            .http
            .post(&self.config.url)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        let envelope: RpcEnvelope<T> = response.json().await?;
        unwrap_envelope(method, envelope)
    }

    async fn get_signature_status(&self, signature: &Signature) -> ChainResult<Option<SignatureStatus>> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature.to_string()]]))
            .await?;
        Ok(statuses.value.into_iter().next().flatten())
    }
}

fn unwrap_envelope<T>(method: &str, envelope: RpcEnvelope<T>) -> ChainResult<T> {
    if let Some(error) = envelope.error {
        return Err(ChainError::Rpc { code: error.code, message: error.message });
    }
    envelope
        .result
        .ok_or_else(|| ChainError::RpcResponse(format!("{}: missing result", method)))
}

/// Node reports a missing token account as an invalid-param error
fn is_missing_account(error: &ChainError) -> bool {
    matches!(error, ChainError::Rpc { message, .. } if message.contains("could not find account"))
}

#[async_trait]
impl Connection for SolanaRpcClient {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> ChainResult<Vec<ParsedTokenAccount>> {
        let accounts: WithContext<Vec<KeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "programId": program_id.to_string() },
                    { "encoding": "jsonParsed", "commitment": self.config.commitment.as_str() }
                ]),
            )
            .await?;

        accounts
            .value
            .into_iter()
            .map(|keyed| {
                let info = keyed.account.data.parsed.info;
                Ok(ParsedTokenAccount {
                    address: keyed.pubkey,
                    mint: info.mint,
                    owner: info.owner,
                    amount: info.token_amount.into_token_amount()?,
                })
            })
            .collect()
    }

    async fn get_token_account_balance(&self, account: &Pubkey) -> ChainResult<Option<TokenAmount>> {
        let result: ChainResult<WithContext<UiTokenAmount>> = self
            .call(
                "getTokenAccountBalance",
                json!([account.to_string(), { "commitment": self.config.commitment.as_str() }]),
            )
            .await;

        match result {
            Ok(balance) => Ok(Some(balance.value.into_token_amount()?)),
            Err(e) if is_missing_account(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_latest_blockhash(&self) -> ChainResult<Hash> {
        let latest: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.config.commitment.as_str() }]),
            )
            .await?;
        Ok(latest.value.blockhash)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> ChainResult<Signature> {
        let encoded = transaction.to_base64()?;
        let signature: String = self
            .call(
                "sendTransaction",
                json!([
                    encoded,
                    { "encoding": "base64", "preflightCommitment": self.config.commitment.as_str() }
                ]),
            )
            .await?;
        signature.parse()
    }

    async fn confirm_transaction(&self, signature: &Signature, commitment: Commitment) -> ChainResult<bool> {
        let interval = Duration::from_millis(self.config.confirm_poll_interval_ms);

        for attempt in 0..self.config.confirm_max_attempts {
            if let Some(status) = self.get_signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(ChainError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                if status.confirmation_status.map_or(false, |level| level >= commitment) {
                    debug!("{} reached {} after {} polls", signature, commitment.as_str(), attempt + 1);
                    return Ok(true);
                }
            }
            tokio::time::sleep(interval).await;
        }

        warn!(
            "{} not {} after {} polls",
            signature,
            commitment.as_str(),
            self.config.confirm_max_attempts
        );
        Ok(false)
    }
}
