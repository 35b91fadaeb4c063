// ============================================================================
// eMenu API - Public Menu Handlers
// File: crates/emenu-api/src/handlers/public_menu.rs
// ============================================================================
//! Read-only menu endpoints. Never inspect credentials.

use axum::{extract::State, Json};

use crate::dto::{PublicMenuDetail, PublicMenuSummary};
use crate::error::ApiError;
use crate::extract::{IdPath, QueryPairs};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /public/menu/ - filtered, ordered list of non-empty menus
pub async fn list(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<Json<ApiResponse<Vec<PublicMenuSummary>>>, ApiError> {
    let menu_query = query.menu_query()?;
    let pagination = query.pagination()?;

    let menus = state.menus.list_public(&menu_query, pagination).await?;
    Ok(Json(ApiResponse::success(
        menus.into_iter().map(PublicMenuSummary::from).collect(),
    )))
}

/// GET /public/menu/{id}/
pub async fn detail(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<PublicMenuDetail>>, ApiError> {
    let detail = state.menus.get_detail(id).await?;
    Ok(Json(ApiResponse::success(detail.into())))
}
