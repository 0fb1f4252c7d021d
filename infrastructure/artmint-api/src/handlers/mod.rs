//! API handlers

use crate::error::ApiError;
use actix_web::{web, HttpResponse};
use serde::Serialize;

mod gallery;
mod health;
mod nft;
mod rewards;
mod tokens;

pub use gallery::*;
pub use health::*;
pub use nft::*;
pub use rewards::*;
pub use tokens::*;

/// Largest accepted JSON body; mint requests carry the image inline
pub const MAX_JSON_BODY: usize = 10 * 1024 * 1024;

/// `{ "success": true, "data": ... }`
#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    data: T,
}

pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope { success: true, data })
}

pub(crate) fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope { success: true, data })
}

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Extractor failures use the same envelope as handler errors
        .app_data(
            web::JsonConfig::default()
                .limit(MAX_JSON_BODY)
                .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
        )
        .route("/api/v1/health", web::get().to(health_check))
        // Gallery endpoints
        .service(
            web::scope("/api/v1/gallery")
                .route("", web::get().to(list_artworks))
                .route("", web::post().to(create_artwork))
                .route("/reset", web::post().to(reset_gallery))
                .route("/{id}", web::get().to(get_artwork))
                .route("/{id}", web::delete().to(delete_artwork))
                .route("/{id}/vote", web::post().to(vote_artwork))
                .route("/{id}/view", web::post().to(view_artwork))
        )
        // Token endpoints
        .service(
            web::scope("/api/v1/tokens")
                .route("/{wallet}", web::get().to(get_wallet_tokens))
        )
        // Reward endpoints
        .service(
            web::scope("/api/v1/rewards")
                .route("/quote", web::get().to(get_reward_quote))
        )
        // NFT endpoints
        .service(
            web::scope("/api/v1/nft")
                .route("/mint", web::post().to(mint_nft))
        );
}
