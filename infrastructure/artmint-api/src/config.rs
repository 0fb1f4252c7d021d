//! API server configuration

use artmint_chain::Commitment;
use serde::{Deserialize, Serialize};
use std::env;

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Solana JSON-RPC endpoint; token routes answer 500 without it
    pub rpc_url: Option<String>,

    /// Commitment used for RPC reads
    pub commitment: Commitment,

    /// Shared secret for gallery admin routes; admin routes answer 500 without it
    pub admin_key: Option<String>,

    /// Artworks kept in the gallery
    pub gallery_capacity: usize,

    /// Seconds a live artwork stays live
    pub live_seconds: u64,

    /// JSON token list used for symbol/name lookups
    pub token_list_path: Option<String>,

    /// Token metadata cache lifetime in seconds
    pub metadata_ttl_seconds: u64,

    /// Take the voter origin from `Forwarded`/`X-Forwarded-For`; only safe behind a proxy that sets them
    pub trust_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rpc_url: None,
            commitment: Commitment::Confirmed,
            admin_key: None,
            gallery_capacity: 100,
            live_seconds: 300,
            token_list_path: None,
            metadata_ttl_seconds: 300,
            trust_proxy: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("ARTMINT_API_HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("ARTMINT_API_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        config.rpc_url = non_empty_var("ARTMINT_RPC_URL");

        if let Ok(commitment) = env::var("ARTMINT_COMMITMENT") {
            if let Ok(commitment) = commitment.parse() {
                config.commitment = commitment;
            }
        }

        config.admin_key = non_empty_var("ARTMINT_ADMIN_KEY");

        if let Ok(capacity) = env::var("ARTMINT_GALLERY_CAPACITY") {
            config.gallery_capacity = capacity
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .unwrap_or(config.gallery_capacity);
        }

        if let Ok(seconds) = env::var("ARTMINT_LIVE_SECONDS") {
            config.live_seconds = seconds.parse().unwrap_or(config.live_seconds);
        }

        config.token_list_path = non_empty_var("ARTMINT_TOKEN_LIST");

        if let Ok(ttl) = env::var("ARTMINT_METADATA_TTL_SECONDS") {
            config.metadata_ttl_seconds = ttl.parse().unwrap_or(config.metadata_ttl_seconds);
        }

        if let Ok(trust) = env::var("ARTMINT_TRUST_PROXY") {
            config.trust_proxy = matches!(trust.trim(), "1" | "true" | "yes");
        }

        config
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
