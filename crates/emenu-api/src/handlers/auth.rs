//! Token login handler

use axum::{extract::State, Json};

use crate::dto::{LoginRequest, TokenResponse};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login handler - POST /api-auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required", None));
    }

    let token = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(ApiResponse::success(token.into())))
}
