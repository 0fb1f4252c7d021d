//! Application state

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use artmint_chain::{Connection, RpcConfig, SolanaRpcClient, Wallet};
use artmint_flows::{MetadataStorage, NftIssuer, RewardSchedule, StaticTokenList, TokenMetadataCache};
use artmint_gallery::{GalleryConfig, GalleryStore, InMemoryGalleryStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Collaborators for server-side minting
///
/// The authority wallet pays fees and becomes creator and update authority.
#[derive(Clone)]
pub struct MintingBackend {
    pub storage: Arc<dyn MetadataStorage>,
    pub issuer: Arc<dyn NftIssuer>,
    pub authority: Arc<dyn Wallet>,
}

/// Application state shared across handlers
pub struct AppState {
    /// Gallery store
    pub gallery: Arc<dyn GalleryStore>,

    /// Cluster connection, absent when no RPC URL is configured
    pub connection: Option<Arc<dyn Connection>>,

    /// Token symbol/name lookups
    pub metadata: Option<Arc<TokenMetadataCache>>,

    /// Burn reward constants
    pub rewards: RewardSchedule,

    /// Absent unless a deployment wires in storage and an issuer
    pub minting: Option<MintingBackend>,

    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Create new application state
    pub fn new(config: &Config) -> ApiResult<Self> {
        if config.gallery_capacity == 0 {
            return Err(ApiError::Internal("gallery capacity must be at least 1".to_string()));
        }

        let gallery: Arc<dyn GalleryStore> = Arc::new(InMemoryGalleryStore::new(GalleryConfig {
            capacity: config.gallery_capacity,
            live_duration: Duration::from_secs(config.live_seconds),
        }));

        let connection = match &config.rpc_url {
            Some(url) => {
                let rpc_config = RpcConfig {
                    commitment: config.commitment,
                    ..RpcConfig::with_url(url.clone())
                };
                let client = SolanaRpcClient::new(rpc_config)?;
                info!("Using Solana RPC at {}", url);
                Some(Arc::new(client) as Arc<dyn Connection>)
            }
            None => {
                warn!("ARTMINT_RPC_URL not set, token endpoints are unavailable");
                None
            }
        };

        let metadata = match &config.token_list_path {
            Some(path) => {
                let list = StaticTokenList::from_file(path)?;
                info!("Loaded {} token list entries from {}", list.len(), path);
                Some(Arc::new(TokenMetadataCache::new(
                    Arc::new(list),
                    Duration::from_secs(config.metadata_ttl_seconds),
                )))
            }
            None => None,
        };

        if config.admin_key.is_none() {
            warn!("ARTMINT_ADMIN_KEY not set, gallery admin endpoints are unavailable");
        }

        Ok(Self {
            gallery,
            connection,
            metadata,
            rewards: RewardSchedule::default(),
            minting: None,
            config: config.clone(),
        })
    }

    pub fn with_gallery(mut self, gallery: Arc<dyn GalleryStore>) -> Self {
        self.gallery = gallery;
        self
    }

    pub fn with_connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_minting(mut self, backend: MintingBackend) -> Self {
        self.minting = Some(backend);
        self
    }

    pub fn connection(&self) -> ApiResult<&dyn Connection> {
        self.connection
            .as_deref()
            .ok_or(ApiError::MissingConfig("ARTMINT_RPC_URL"))
    }

    pub fn live_duration(&self) -> Duration {
        Duration::from_secs(self.config.live_seconds)
    }
}
