//! Demo gallery for Artmint
//!
//! Volatile list of recently generated artwork with per-voter like/dislike
//! tallies, view counts and a timed "live" badge. Handlers talk to it through
//! the `GalleryStore` trait.

pub mod artwork;
pub mod errors;
pub mod lifecycle;
pub mod metrics;
pub mod store;

pub use artwork::{Artwork, NewArtwork, VoteKind, VoteOutcome, VoterKey};
pub use errors::{GalleryError, GalleryResult};
pub use lifecycle::schedule_live_expiry;
pub use store::{GalleryConfig, GalleryStore, InMemoryGalleryStore};
