//! Menu CRUD for authenticated users.

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;

use emenu_core::services::Principal;

use crate::dto::{MenuPatchRequest, MenuRequest, PrivateMenuResponse};
use crate::error::ApiError;
use crate::extract::{ApiJson, IdPath, QueryPairs};
use crate::response::ApiResponse;
use crate::state::AppState;

type MenuResult = Result<Json<ApiResponse<PrivateMenuResponse>>, ApiError>;

pub async fn list(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<Json<ApiResponse<Vec<PrivateMenuResponse>>>, ApiError> {
    let menus = state.menus.list_private(query.pagination()?).await?;
    Ok(Json(ApiResponse::success(
        menus.into_iter().map(PrivateMenuResponse::from).collect(),
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<MenuRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrivateMenuResponse>>), ApiError> {
    let menu = state.menus.create(payload.into_draft()?).await?;
    info!("Menu {} created by {}", menu.id, principal.username);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(menu.into()))))
}

pub async fn get(State(state): State<AppState>, IdPath(id): IdPath) -> MenuResult {
    let menu = state.menus.get(id).await?;
    Ok(Json(ApiResponse::success(menu.into())))
}

pub async fn replace(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(payload): ApiJson<MenuRequest>,
) -> MenuResult {
    let menu = state.menus.replace(id, payload.into_draft()?).await?;
    Ok(Json(ApiResponse::success(menu.into())))
}

pub async fn patch(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(payload): ApiJson<MenuPatchRequest>,
) -> MenuResult {
    let menu = state.menus.patch(id, payload.into()).await?;
    Ok(Json(ApiResponse::success(menu.into())))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.menus.delete(id).await?;
    info!("Menu {} deleted by {}", id, principal.username);
    Ok(StatusCode::NO_CONTENT)
}
