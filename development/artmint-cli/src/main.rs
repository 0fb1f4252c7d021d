//! Artmint command-line wallet tools

use anyhow::{anyhow, bail, Context, Result};
use artmint_chain::{Commitment, Connection, KeypairWallet, Pubkey, RpcConfig, SolanaRpcClient};
use artmint_flows::metadata::DEFAULT_METADATA_TTL;
use artmint_flows::{
    fetch_wallet_tokens, BurnFlow, BurnRequest, RewardSchedule, StaticTokenList, TokenMetadataCache,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Artmint CLI
#[derive(Parser, Debug)]
#[command(name = "artmint")]
#[command(about = "Token inventory, burn rewards and burns on Solana", long_about = None)]
struct Cli {
    /// Solana JSON-RPC endpoint
    #[arg(long, env = "ARTMINT_RPC_URL", default_value = "https://api.devnet.solana.com")]
    rpc_url: String,

    /// Commitment for reads (processed, confirmed, finalized)
    #[arg(long, env = "ARTMINT_COMMITMENT", default_value = "confirmed")]
    commitment: Commitment,

    /// JSON token list for symbol/name lookups
    #[arg(long, env = "ARTMINT_TOKEN_LIST", value_name = "FILE")]
    token_list: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List tokens with a positive balance
    Tokens {
        /// Wallet address (base58)
        wallet: Pubkey,
    },

    /// Reward a burn of AMOUNT tokens would earn
    Quote {
        amount: f64,
    },

    /// Burn tokens from the keypair's associated token account
    Burn {
        /// Solana keypair JSON file
        #[arg(long, value_name = "PATH")]
        keypair: PathBuf,

        /// Token mint address
        #[arg(long)]
        mint: Pubkey,

        /// Amount in human units
        #[arg(long)]
        amount: f64,

        /// Mint decimals; looked up from the wallet's holdings when omitted, must match the mint
        #[arg(long)]
        decimals: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artmint_cli=info,artmint_flows=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Tokens { wallet } => list_tokens(&cli, wallet).await,
        Commands::Quote { amount } => quote(&cli, *amount),
        Commands::Burn {
            keypair,
            mint,
            amount,
            decimals,
        } => burn(&cli, keypair, mint, *amount, *decimals).await,
    }
}

fn connect(cli: &Cli) -> Result<SolanaRpcClient> {
    let config = RpcConfig {
        commitment: cli.commitment,
        ..RpcConfig::with_url(cli.rpc_url.clone())
    };
    debug!("Connecting to {} at {}", config.url, config.commitment.as_str());
    SolanaRpcClient::new(config).context("failed to build RPC client")
}

fn metadata_cache(cli: &Cli) -> Result<Option<TokenMetadataCache>> {
    let Some(path) = &cli.token_list else {
        return Ok(None);
    };
    let list = StaticTokenList::from_file(path)
        .with_context(|| format!("failed to load token list {}", path.display()))?;
    Ok(Some(TokenMetadataCache::new(Arc::new(list), DEFAULT_METADATA_TTL)))
}

async fn list_tokens(cli: &Cli, wallet: &Pubkey) -> Result<()> {
    let client = connect(cli)?;
    let cache = metadata_cache(cli)?;
    let tokens = fetch_wallet_tokens(&client, wallet, cache.as_ref())
        .await
        .with_context(|| format!("failed to fetch tokens for {}", wallet))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    if tokens.is_empty() {
        println!("No tokens held by {}", wallet);
    }
    for token in &tokens {
        println!(
            "{:<10} {:>20} {:<44} {}",
            token.symbol, token.balance, token.mint, token.name
        );
    }
    Ok(())
}

fn quote(cli: &Cli, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("amount must be a non-negative number, got {}", amount);
    }
    let quote = RewardSchedule::default().quote(amount);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        println!(
            "Burning {} tokens earns {} lamports ({} SOL){}{}",
            quote.amount,
            quote.reward_lamports,
            quote.reward_sol,
            if quote.bonus_applied { ", bulk bonus applied" } else { "" },
            if quote.capped { ", capped" } else { "" },
        );
    }
    Ok(())
}

async fn burn(cli: &Cli, keypair: &Path, mint: &Pubkey, amount: f64, decimals: Option<u8>) -> Result<()> {
    let wallet = KeypairWallet::from_file(keypair)
        .with_context(|| format!("failed to load keypair {}", keypair.display()))?;
    let client = connect(cli)?;

    let decimals = match decimals {
        Some(decimals) => decimals,
        None => held_decimals(&client, &wallet.pubkey(), mint).await?,
    };

    info!("Burning {} of {} from {}", amount, mint, wallet.pubkey());
    let mut flow = BurnFlow::new(&client, &wallet, RewardSchedule::default());
    let result = flow
        .execute(&BurnRequest {
            mint: *mint,
            amount,
            decimals,
        })
        .await
        .context("burn failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message);
        println!("Signature: {}", result.signature);
    }
    Ok(())
}

async fn held_decimals(connection: &dyn Connection, owner: &Pubkey, mint: &Pubkey) -> Result<u8> {
    let tokens = fetch_wallet_tokens(connection, owner, None).await?;
    tokens
        .iter()
        .find(|t| t.mint == *mint)
        .map(|t| t.decimals)
        .ok_or_else(|| anyhow!("{} holds no {}; pass --decimals", owner, mint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_burn() {
        let cli = Cli::try_parse_from([
            "artmint",
            "--rpc-url",
            "http://localhost:8899",
            "burn",
            "--keypair",
            "id.json",
            "--mint",
            "So11111111111111111111111111111111111111112",
            "--amount",
            "12.5",
        ])
        .unwrap();

        match cli.command {
            Commands::Burn { amount, decimals, .. } => {
                assert_eq!(amount, 12.5);
                assert!(decimals.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_wallet() {
        assert!(Cli::try_parse_from(["artmint", "tokens", "not-base58!"]).is_err());
    }
}
