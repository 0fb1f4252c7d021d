//! Gallery entries and votes

use crate::errors::{GalleryError, GalleryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_ARTIST_LEN: usize = 64;
pub const MAX_PROMPT_LEN: usize = 1_000;

/// Artwork shown in the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub prompt: Option<String>,
    pub wallet_address: Option<String>,
    pub is_live: bool,
    pub likes: u64,
    pub dislikes: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

/// Submission for a new gallery entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtwork {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub is_live: bool,
}

impl NewArtwork {
    pub fn validate(&self) -> GalleryResult<()> {
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
            return Err(GalleryError::InvalidArtwork(format!(
                "title must be 1..={} characters",
                MAX_TITLE_LEN
            )));
        }
        let artist = self.artist.trim();
        if artist.is_empty() || artist.chars().count() > MAX_ARTIST_LEN {
            return Err(GalleryError::InvalidArtwork(format!(
                "artist must be 1..={} characters",
                MAX_ARTIST_LEN
            )));
        }
        if !(self.image_url.starts_with("https://")
            || self.image_url.starts_with("http://")
            || self.image_url.starts_with("data:image/"))
        {
            return Err(GalleryError::InvalidArtwork("image_url must be an http(s) or data:image URL".to_string()));
        }
        if let Some(prompt) = &self.prompt {
            if prompt.chars().count() > MAX_PROMPT_LEN {
                return Err(GalleryError::InvalidArtwork(format!(
                    "prompt exceeds {} characters",
                    MAX_PROMPT_LEN
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn into_artwork(self) -> Artwork {
        Artwork {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            artist: self.artist.trim().to_string(),
            image_url: self.image_url,
            prompt: self.prompt,
            wallet_address: self.wallet_address,
            is_live: self.is_live,
            likes: 0,
            dislikes: 0,
            views: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

/// Identity a vote is counted against
///
/// Wallet address when the voter supplied one, otherwise whatever identifies
/// the request origin (typically the peer IP).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterKey(String);

impl VoterKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_request(wallet_address: Option<&str>, origin: &str) -> Self {
        match wallet_address.map(str::trim).filter(|w| !w.is_empty()) {
            Some(wallet) => Self(format!("wallet:{}", wallet)),
            None => Self(format!("origin:{}", origin)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a vote did to the tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// First vote from this voter
    Counted,
    /// Prior vote of the other kind replaced
    Changed,
    /// Same vote resubmitted, nothing changed
    Unchanged,
}
