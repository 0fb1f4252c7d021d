//! Error types for the gallery store

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalleryError {
    #[error("Artwork not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid artwork: {0}")]
    InvalidArtwork(String),
}

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;
