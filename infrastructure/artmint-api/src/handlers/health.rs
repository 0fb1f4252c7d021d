//! Health handler

use super::ok;
use crate::{error::ApiResult, state::AppState};
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub rpc_configured: bool,
    pub minting_enabled: bool,
    pub gallery_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Liveness plus which integrations are wired
pub async fn health_check(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    Ok(ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        rpc_configured: state.connection.is_some(),
        minting_enabled: state.minting.is_some(),
        gallery_size: state.gallery.len().await,
        timestamp: chrono::Utc::now(),
    }))
}
