//! Error handling for API

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use artmint_chain::ChainError;
use artmint_flows::FlowError;
use artmint_gallery::GalleryError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong admin key
    #[error("Unauthorized")]
    Unauthorized,

    /// Required configuration absent for this endpoint
    #[error("Server misconfigured: {0} is not set")]
    MissingConfig(&'static str),

    /// Capability not available on this deployment
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Gallery(#[from] GalleryError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// `{ "success": false, "error": "..." }`
#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Flow(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Gallery(GalleryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Gallery(GalleryError::InvalidArtwork(_)) => StatusCode::BAD_REQUEST,
            ApiError::Chain(ChainError::InvalidPubkey(_)) => StatusCode::BAD_REQUEST,
            ApiError::MissingConfig(_) | ApiError::Internal(_) | ApiError::Flow(_) | ApiError::Chain(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorEnvelope {
            success: false,
            error: self.to_string(),
        })
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::MissingConfig("ARTMINT_RPC_URL").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(GalleryError::NotFound(Uuid::nil())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(FlowError::InvalidAmount("-1".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(FlowError::Storage("arweave down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ChainError::InvalidPubkey("x".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
