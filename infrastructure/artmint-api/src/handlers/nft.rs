//! NFT mint handler

use super::ok;
use crate::{error::{ApiError, ApiResult}, state::AppState};
use actix_web::{web, HttpResponse};
use artmint_flows::{mint_with_sol, MintRequest, NftAttribute};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use validator::Validate;

/// Server-side mint request
#[derive(Debug, Deserialize, Validate)]
pub struct MintNftRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,

    #[validate(length(max = 10))]
    pub symbol: String,

    #[serde(default)]
    pub description: String,

    /// Image bytes, base64
    #[validate(length(min = 1))]
    pub image_base64: String,

    #[serde(default = "default_content_type")]
    pub image_content_type: String,

    #[serde(default)]
    pub attributes: Vec<NftAttribute>,

    #[serde(default)]
    #[validate(range(max = 10000))]
    pub seller_fee_basis_points: u16,
}

fn default_content_type() -> String {
    "image/png".to_string()
}

/// SOL-paid mint signed by the server's authority wallet
///
/// Answers 501 on deployments without a minting backend.
pub async fn mint_nft(
    state: web::Data<AppState>,
    req: web::Json<MintNftRequest>,
) -> ApiResult<HttpResponse> {
    let backend = state
        .minting
        .as_ref()
        .ok_or_else(|| ApiError::NotImplemented("server-side minting is not configured".to_string()))?;

    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let req = req.into_inner();
    let image = STANDARD
        .decode(req.image_base64.as_bytes())
        .map_err(|e| ApiError::BadRequest(format!("image_base64: {}", e)))?;

    let request = MintRequest {
        name: req.name,
        symbol: req.symbol,
        description: req.description,
        image,
        image_content_type: req.image_content_type,
        attributes: req.attributes,
        seller_fee_basis_points: req.seller_fee_basis_points,
    };

    let result = mint_with_sol(
        backend.authority.as_ref(),
        backend.storage.as_ref(),
        backend.issuer.as_ref(),
        &request,
    )
    .await?;
    Ok(ok(result))
}
