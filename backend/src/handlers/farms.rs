//! HTTP handlers for farm management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::farms::{CreateFarmInput, Farm, FarmService, UpdateFarmInput};
use crate::AppState;

/// Register a farm
pub async fn create_farm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateFarmInput>,
) -> AppResult<Json<Farm>> {
    let service = FarmService::new(state.db);
    let farm = service.create(current_user.0.user_id, input).await?;
    Ok(Json(farm))
}

/// List the current user's farms
pub async fn list_farms(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Farm>>> {
    let service = FarmService::new(state.db);
    let farms = service.list(current_user.0.user_id).await?;
    Ok(Json(farms))
}

/// Get a farm by ID
pub async fn get_farm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
) -> AppResult<Json<Farm>> {
    let service = FarmService::new(state.db);
    let farm = service.get_owned(farm_id, current_user.0.user_id).await?;
    Ok(Json(farm))
}

/// Update a farm
pub async fn update_farm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<UpdateFarmInput>,
) -> AppResult<Json<Farm>> {
    let service = FarmService::new(state.db);
    // Ownership check before the patch
    service.get_owned(farm_id, current_user.0.user_id).await?;
    let farm = service.update(farm_id, input).await?;
    Ok(Json(farm))
}
