//! Token display metadata with a time-boxed cache

use crate::errors::{FlowError, FlowResult};
use artmint_chain::Pubkey;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default cache lifetime for a metadata entry
pub const DEFAULT_METADATA_TTL: Duration = Duration::from_secs(300);

/// Display fields for a fungible token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub logo_uri: Option<String>,
}

/// Where token display metadata comes from
#[async_trait]
pub trait TokenMetadataSource: Send + Sync {
    async fn lookup(&self, mint: &Pubkey) -> FlowResult<Option<TokenMetadata>>;
}

#[derive(Debug, Deserialize)]
struct TokenListEntry {
    mint: Pubkey,
    #[serde(flatten)]
    metadata: TokenMetadata,
}

/// Fixed token list loaded from a JSON file
#[derive(Debug, Default)]
pub struct StaticTokenList {
    entries: HashMap<Pubkey, TokenMetadata>,
}

impl StaticTokenList {
    pub fn new(entries: HashMap<Pubkey, TokenMetadata>) -> Self {
        Self { entries }
    }

    /// Parse `[{ "mint", "symbol", "name", "logo_uri" }, ...]`
    pub fn from_json(json: &str) -> FlowResult<Self> {
        let list: Vec<TokenListEntry> = serde_json::from_str(json)?;
        Ok(Self {
            entries: list.into_iter().map(|e| (e.mint, e.metadata)).collect(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FlowError::MetadataSource(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TokenMetadataSource for StaticTokenList {
    async fn lookup(&self, mint: &Pubkey) -> FlowResult<Option<TokenMetadata>> {
        Ok(self.entries.get(mint).cloned())
    }
}

struct CachedEntry {
    fetched_at: Instant,
    metadata: Option<TokenMetadata>,
}

/// TTL cache in front of a metadata source
///
/// Concurrent refreshes of the same mint are last-write-wins; nothing
/// invalidates an entry before its TTL runs out.
pub struct TokenMetadataCache {
    source: Arc<dyn TokenMetadataSource>,
    ttl: Duration,
    entries: RwLock<HashMap<Pubkey, CachedEntry>>,
}

impl TokenMetadataCache {
    pub fn new(source: Arc<dyn TokenMetadataSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Metadata for `mint`, from cache when fresh
    pub async fn get(&self, mint: &Pubkey) -> FlowResult<Option<TokenMetadata>> {
        let fresh = {
            let entries = self.entries.read();
            entries
                .get(mint)
                .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
                .map(|entry| entry.metadata.clone())
        };
        if let Some(metadata) = fresh {
            return Ok(metadata);
        }

        debug!("Token metadata cache miss for {}", mint);
        let metadata = self.source.lookup(mint).await?;
        self.entries.write().insert(
            *mint,
            CachedEntry {
                fetched_at: Instant::now(),
                metadata: metadata.clone(),
            },
        );
        Ok(metadata)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenMetadataSource for CountingSource {
        async fn lookup(&self, _mint: &Pubkey) -> FlowResult<Option<TokenMetadata>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(TokenMetadata {
                symbol: "ART".to_string(),
                name: "Art Token".to_string(),
                logo_uri: None,
            }))
        }
    }

    #[test]
    fn test_token_list_parsing() {
        let mint = Pubkey::new([5u8; 32]);
        let json = format!(
            r#"[{{"mint": "{}", "symbol": "ART", "name": "Art Token", "logo_uri": "https://example.com/art.png"}},
                {{"mint": "11111111111111111111111111111111", "symbol": "SYS", "name": "System"}}]"#,
            mint
        );
        let list = StaticTokenList::from_json(&json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries[&mint].logo_uri.as_deref(), Some("https://example.com/art.png"));
        assert!(list.entries[&Pubkey::default()].logo_uri.is_none());
    }

    #[test]
    fn test_token_list_rejects_bad_mint() {
        let json = r#"[{"mint": "nope", "symbol": "X", "name": "X"}]"#;
        assert!(StaticTokenList::from_json(json).is_err());
    }

    #[tokio::test]
    async fn test_token_list_from_file() {
        use std::io::Write;

        let mint = Pubkey::new([8u8; 32]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"mint": "{}", "symbol": "BONK", "name": "Bonk"}}]"#, mint).unwrap();

        let list = StaticTokenList::from_file(file.path()).unwrap();
        let found = list.lookup(&mint).await.unwrap().unwrap();
        assert_eq!(found.symbol, "BONK");
        assert!(list.lookup(&Pubkey::new([9u8; 32])).await.unwrap().is_none());

        let missing = StaticTokenList::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(FlowError::MetadataSource(_))));
    }

    #[tokio::test]
    async fn test_cache_serves_fresh_entries() {
        let source = Arc::new(CountingSource { calls: AtomicUsize::new(0) });
        let cache = TokenMetadataCache::new(source.clone(), Duration::from_secs(60));
        let mint = Pubkey::new([1u8; 32]);

        cache.get(&mint).await.unwrap();
        let second = cache.get(&mint).await.unwrap().unwrap();
        assert_eq!(second.symbol, "ART");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_refreshes_after_ttl() {
        let source = Arc::new(CountingSource { calls: AtomicUsize::new(0) });
        let cache = TokenMetadataCache::new(source.clone(), Duration::ZERO);
        let mint = Pubkey::new([1u8; 32]);

        cache.get(&mint).await.unwrap();
        cache.get(&mint).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
