//! Gallery storage seam and the in-memory implementation

use crate::artwork::{Artwork, NewArtwork, VoteKind, VoteOutcome, VoterKey};
use crate::errors::{GalleryError, GalleryResult};
use crate::metrics;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Gallery sizing and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Most-recent entries kept, at least 1; older ones are evicted
    pub capacity: usize,
    /// How long a live entry stays live
    pub live_duration: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            live_duration: Duration::from_secs(300),
        }
    }
}

/// Where gallery entries live
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Newest first
    async fn list(&self) -> Vec<Artwork>;

    async fn get(&self, id: Uuid) -> GalleryResult<Artwork>;

    /// Validate, store as newest and evict whatever overflows capacity
    async fn append(&self, artwork: NewArtwork) -> GalleryResult<Artwork>;

    /// Remove one entry along with its votes
    async fn evict(&self, id: Uuid) -> GalleryResult<Artwork>;

    async fn vote(&self, id: Uuid, voter: VoterKey, kind: VoteKind) -> GalleryResult<(Artwork, VoteOutcome)>;

    async fn record_view(&self, id: Uuid) -> GalleryResult<Artwork>;

    async fn set_live(&self, id: Uuid, live: bool) -> GalleryResult<()>;

    /// Drop every entry and vote
    async fn clear(&self);

    async fn len(&self) -> usize;
}

#[derive(Default)]
struct GalleryState {
    // Front is newest
    artworks: VecDeque<Artwork>,
    votes: HashMap<Uuid, HashMap<VoterKey, VoteKind>>,
}

impl GalleryState {
    fn find_mut(&mut self, id: Uuid) -> GalleryResult<&mut Artwork> {
        self.artworks
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(GalleryError::NotFound(id))
    }
}

/// Process-local gallery, reset on restart
///
/// Every mutation takes the write lock for its whole read-modify-write.
pub struct InMemoryGalleryStore {
    config: GalleryConfig,
    state: RwLock<GalleryState>,
}

impl InMemoryGalleryStore {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            state: RwLock::new(GalleryState::default()),
        }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }
}

impl Default for InMemoryGalleryStore {
    fn default() -> Self {
        Self::new(GalleryConfig::default())
    }
}

#[async_trait]
impl GalleryStore for InMemoryGalleryStore {
    async fn list(&self) -> Vec<Artwork> {
        self.state.read().artworks.iter().cloned().collect()
    }

    async fn get(&self, id: Uuid) -> GalleryResult<Artwork> {
        self.state
            .read()
            .artworks
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(GalleryError::NotFound(id))
    }

    async fn append(&self, artwork: NewArtwork) -> GalleryResult<Artwork> {
        artwork.validate()?;
        let artwork = artwork.into_artwork();

        let mut state = self.state.write();
        state.artworks.push_front(artwork.clone());
        while state.artworks.len() > self.config.capacity {
            if let Some(evicted) = state.artworks.pop_back() {
                state.votes.remove(&evicted.id);
                debug!("Evicted artwork {} to stay within {}", evicted.id, self.config.capacity);
            }
        }
        metrics::record_op("append");
        metrics::set_size(state.artworks.len());

        info!("Added artwork {} \"{}\" by {}", artwork.id, artwork.title, artwork.artist);
        Ok(artwork)
    }

    async fn evict(&self, id: Uuid) -> GalleryResult<Artwork> {
        let mut state = self.state.write();
        let index = state
            .artworks
            .iter()
            .position(|a| a.id == id)
            .ok_or(GalleryError::NotFound(id))?;
        let removed = state.artworks.remove(index).ok_or(GalleryError::NotFound(id))?;
        state.votes.remove(&id);
        metrics::record_op("evict");
        metrics::set_size(state.artworks.len());

        info!("Removed artwork {}", id);
        Ok(removed)
    }

    async fn vote(&self, id: Uuid, voter: VoterKey, kind: VoteKind) -> GalleryResult<(Artwork, VoteOutcome)> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let artwork = state
            .artworks
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(GalleryError::NotFound(id))?;
        let previous = state.votes.entry(id).or_default().insert(voter, kind);

        let outcome = match previous {
            Some(prior) if prior == kind => VoteOutcome::Unchanged,
            Some(prior) => {
                match prior {
                    VoteKind::Like => artwork.likes = artwork.likes.saturating_sub(1),
                    VoteKind::Dislike => artwork.dislikes = artwork.dislikes.saturating_sub(1),
                }
                VoteOutcome::Changed
            }
            None => VoteOutcome::Counted,
        };
        if outcome != VoteOutcome::Unchanged {
            match kind {
                VoteKind::Like => artwork.likes += 1,
                VoteKind::Dislike => artwork.dislikes += 1,
            }
            metrics::record_op("vote");
        }

        Ok((artwork.clone(), outcome))
    }

    async fn record_view(&self, id: Uuid) -> GalleryResult<Artwork> {
        let mut state = self.state.write();
        let artwork = state.find_mut(id)?;
        artwork.views += 1;
        Ok(artwork.clone())
    }

    async fn set_live(&self, id: Uuid, live: bool) -> GalleryResult<()> {
        let mut state = self.state.write();
        state.find_mut(id)?.is_live = live;
        Ok(())
    }

    async fn clear(&self) {
        let mut state = self.state.write();
        state.artworks.clear();
        state.votes.clear();
        metrics::record_op("clear");
        metrics::set_size(0);
        info!("Gallery cleared");
    }

    async fn len(&self) -> usize {
        self.state.read().artworks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(title: &str) -> NewArtwork {
        NewArtwork {
            title: title.to_string(),
            artist: "tester".to_string(),
            image_url: "https://cdn.example.com/a.png".to_string(),
            prompt: None,
            wallet_address: None,
            is_live: false,
        }
    }

    #[tokio::test]
    async fn test_vote_replacement() {
        let store = InMemoryGalleryStore::default();
        let art = store.append(submission("Dunes")).await.unwrap();
        let voter = VoterKey::new("wallet:abc");

        let (after_like, outcome) = store.vote(art.id, voter.clone(), VoteKind::Like).await.unwrap();
        assert_eq!(outcome, VoteOutcome::Counted);
        assert_eq!((after_like.likes, after_like.dislikes), (1, 0));

        let (after_dislike, outcome) = store.vote(art.id, voter, VoteKind::Dislike).await.unwrap();
        assert_eq!(outcome, VoteOutcome::Changed);
        assert_eq!((after_dislike.likes, after_dislike.dislikes), (0, 1));
    }

    #[tokio::test]
    async fn test_repeat_vote_is_noop() {
        let store = InMemoryGalleryStore::default();
        let art = store.append(submission("Dunes")).await.unwrap();
        let voter = VoterKey::new("origin:127.0.0.1");

        store.vote(art.id, voter.clone(), VoteKind::Like).await.unwrap();
        let (after, outcome) = store.vote(art.id, voter, VoteKind::Like).await.unwrap();
        assert_eq!(outcome, VoteOutcome::Unchanged);
        assert_eq!(after.likes, 1);

        // A different voter still counts
        let (after, _) = store.vote(art.id, VoterKey::new("origin:10.0.0.2"), VoteKind::Like).await.unwrap();
        assert_eq!(after.likes, 2);
    }

    #[tokio::test]
    async fn test_capacity_eviction_keeps_newest_first() {
        let store = InMemoryGalleryStore::default();
        let first = store.append(submission("art 0")).await.unwrap();
        store.vote(first.id, VoterKey::new("v"), VoteKind::Like).await.unwrap();
        for i in 1..=100 {
            store.append(submission(&format!("art {}", i))).await.unwrap();
        }

        let listed = store.list().await;
        assert_eq!(listed.len(), 100);
        assert_eq!(listed[0].title, "art 100");
        assert_eq!(listed[99].title, "art 1");
        assert_eq!(store.get(first.id).await, Err(GalleryError::NotFound(first.id)));
        assert!(store.state.read().votes.get(&first.id).is_none());
    }

    #[tokio::test]
    async fn test_views_and_unknown_ids() {
        let store = InMemoryGalleryStore::default();
        let art = store.append(submission("Dunes")).await.unwrap();

        store.record_view(art.id).await.unwrap();
        assert_eq!(store.record_view(art.id).await.unwrap().views, 2);

        let missing = Uuid::new_v4();
        assert!(matches!(store.record_view(missing).await, Err(GalleryError::NotFound(_))));
        assert!(matches!(
            store.vote(missing, VoterKey::new("v"), VoteKind::Like).await,
            Err(GalleryError::NotFound(_))
        ));
        // Failed vote must not leave a tally behind
        assert!(store.state.read().votes.get(&missing).is_none());
    }

    #[tokio::test]
    async fn test_evict_and_clear() {
        let store = InMemoryGalleryStore::default();
        let a = store.append(submission("a")).await.unwrap();
        store.append(submission("b")).await.unwrap();

        assert_eq!(store.evict(a.id).await.unwrap().id, a.id);
        assert_eq!(store.len().await, 1);
        assert!(store.evict(a.id).await.is_err());

        store.clear().await;
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_submission_rejected() {
        let store = InMemoryGalleryStore::default();
        let result = store.append(submission("")).await;
        assert!(matches!(result, Err(GalleryError::InvalidArtwork(_))));
        assert_eq!(store.len().await, 0);
    }
}
