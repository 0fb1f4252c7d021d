//! Live-status expiry

use crate::errors::GalleryError;
use crate::store::GalleryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Flip `id` to not-live once `after` has elapsed
///
/// Entries evicted in the meantime are skipped quietly.
pub fn schedule_live_expiry(store: Arc<dyn GalleryStore>, id: Uuid, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        match store.set_live(id, false).await {
            Ok(()) => debug!("Artwork {} is no longer live", id),
            Err(GalleryError::NotFound(_)) => debug!("Artwork {} gone before live expiry", id),
            Err(e) => warn!("Live expiry for {} failed: {}", id, e),
        }
    })
}
