//! Reward quote handler

use super::ok;
use crate::{error::{ApiError, ApiResult}, state::AppState};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    /// Tokens to burn, human units
    pub amount: f64,
}

/// Reward a burn of `amount` would earn
pub async fn get_reward_quote(
    state: web::Data<AppState>,
    query: web::Query<QuoteQuery>,
) -> ApiResult<HttpResponse> {
    if !query.amount.is_finite() || query.amount < 0.0 {
        return Err(ApiError::Validation(format!("amount must be a non-negative number, got {}", query.amount)));
    }
    Ok(ok(state.rewards.quote(query.amount)))
}
