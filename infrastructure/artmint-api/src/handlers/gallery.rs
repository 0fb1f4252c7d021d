//! Gallery handlers

use super::{created, ok};
use crate::{error::{ApiError, ApiResult}, state::AppState};
use actix_web::{web, HttpRequest, HttpResponse};
use artmint_gallery::{schedule_live_expiry, Artwork, NewArtwork, VoteKind, VoteOutcome, VoterKey};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Header carrying the admin key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Create artwork request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArtworkRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,

    #[validate(length(min = 1, max = 64))]
    pub artist: String,

    #[validate(length(min = 1))]
    pub image_url: String,

    #[validate(length(max = 1000))]
    pub prompt: Option<String>,

    #[validate(length(min = 32, max = 44))]
    pub wallet_address: Option<String>,

    #[serde(default)]
    pub is_live: bool,
}

/// Vote request
#[derive(Debug, Deserialize, Validate)]
pub struct VoteRequest {
    pub vote_type: VoteKind,

    #[validate(length(min = 32, max = 44))]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub artwork: Artwork,
    pub outcome: VoteOutcome,
}

#[derive(Debug, Serialize)]
pub struct GalleryListResponse {
    pub count: usize,
    pub artworks: Vec<Artwork>,
}

/// All artworks, newest first
pub async fn list_artworks(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let artworks = state.gallery.list().await;
    Ok(ok(GalleryListResponse {
        count: artworks.len(),
        artworks,
    }))
}

/// Add an artwork; live entries lose the badge after the configured duration
pub async fn create_artwork(
    state: web::Data<AppState>,
    req: web::Json<CreateArtworkRequest>,
) -> ApiResult<HttpResponse> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let req = req.into_inner();
    let artwork = state
        .gallery
        .append(NewArtwork {
            title: req.title,
            artist: req.artist,
            image_url: req.image_url,
            prompt: req.prompt,
            wallet_address: req.wallet_address,
            is_live: req.is_live,
        })
        .await?;

    if artwork.is_live {
        schedule_live_expiry(state.gallery.clone(), artwork.id, state.live_duration());
    }

    Ok(created(artwork))
}

pub async fn get_artwork(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    Ok(ok(state.gallery.get(*id).await?))
}

/// Like or dislike; one counted vote per wallet, or per origin without one
pub async fn vote_artwork(
    http: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<VoteRequest>,
) -> ApiResult<HttpResponse> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let origin = voter_origin(&http, state.config.trust_proxy);
    let voter = VoterKey::from_request(req.wallet_address.as_deref(), &origin);

    let (artwork, outcome) = state.gallery.vote(*id, voter, req.vote_type).await?;
    Ok(ok(VoteResponse { artwork, outcome }))
}

/// Peer IP, or the proxy-reported client address when the proxy is trusted
fn voter_origin(http: &HttpRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(addr) = http.connection_info().realip_remote_addr() {
            return addr.to_string();
        }
    }
    http.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn view_artwork(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    Ok(ok(state.gallery.record_view(*id).await?))
}

/// Admin: remove one artwork
pub async fn delete_artwork(
    http: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_admin(&http, &state)?;
    let removed = state.gallery.evict(*id).await?;
    info!("Admin removed artwork {}", removed.id);
    Ok(ok(removed))
}

/// Admin: empty the gallery
pub async fn reset_gallery(
    http: HttpRequest,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    require_admin(&http, &state)?;
    state.gallery.clear().await;
    info!("Admin reset the gallery");
    Ok(ok(serde_json::json!({ "reset": true })))
}

fn require_admin(http: &HttpRequest, state: &AppState) -> ApiResult<()> {
    let expected = state
        .config
        .admin_key
        .as_deref()
        .ok_or(ApiError::MissingConfig("ARTMINT_ADMIN_KEY"))?;

    let supplied = http
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if supplied != Some(expected) {
        warn!("Rejected admin request to {}", http.path());
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}
