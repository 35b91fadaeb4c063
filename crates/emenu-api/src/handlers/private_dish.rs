//! Dish CRUD for authenticated users.

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;

use emenu_core::services::Principal;

use crate::dto::{DishPatchRequest, DishRequest, DishResponse};
use crate::error::ApiError;
use crate::extract::{ApiJson, IdPath, QueryPairs};
use crate::response::ApiResponse;
use crate::state::AppState;

type DishResult = Result<Json<ApiResponse<DishResponse>>, ApiError>;

pub async fn list(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<Json<ApiResponse<Vec<DishResponse>>>, ApiError> {
    let dishes = state.dishes.list(query.pagination()?).await?;
    Ok(Json(ApiResponse::success(
        dishes.into_iter().map(DishResponse::from).collect(),
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(payload): ApiJson<DishRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DishResponse>>), ApiError> {
    let dish = state.dishes.create(payload.into_draft()?).await?;
    info!("Dish {} created by {}", dish.id, principal.username);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dish.into()))))
}

pub async fn get(State(state): State<AppState>, IdPath(id): IdPath) -> DishResult {
    let dish = state.dishes.get(id).await?;
    Ok(Json(ApiResponse::success(dish.into())))
}

pub async fn replace(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(payload): ApiJson<DishRequest>,
) -> DishResult {
    let dish = state.dishes.replace(id, payload.into_draft()?).await?;
    Ok(Json(ApiResponse::success(dish.into())))
}

pub async fn patch(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(payload): ApiJson<DishPatchRequest>,
) -> DishResult {
    let dish = state.dishes.patch(id, payload.into()).await?;
    Ok(Json(ApiResponse::success(dish.into())))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.dishes.delete(id).await?;
    info!("Dish {} deleted by {}", id, principal.username);
    Ok(StatusCode::NO_CONTENT)
}
