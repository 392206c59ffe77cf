//! HTTP handlers for the alert feed

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alerts::{Alert, AlertService};
use crate::services::farms::FarmService;
use crate::AppState;

/// Query parameters for the alert feed
#[derive(Debug, Deserialize)]
pub struct AlertFeedQuery {
    pub unread_only: Option<bool>,
    pub limit: Option<i32>,
}

/// Get alerts for a farm
pub async fn list_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
    Query(query): Query<AlertFeedQuery>,
) -> AppResult<Json<Vec<Alert>>> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = AlertService::new(state.db);
    let alerts = service
        .list(
            farm_id,
            query.unread_only.unwrap_or(false),
            query.limit.unwrap_or(50),
        )
        .await?;
    Ok(Json(alerts))
}

/// Unread alert count response
#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

/// Get unread alert count for a farm
pub async fn get_unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
) -> AppResult<Json<UnreadCountResponse>> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = AlertService::new(state.db);
    let unread = service.unread_count(farm_id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark an alert as read
pub async fn mark_alert_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = AlertService::new(state.db);
    service.mark_as_read(alert_id, current_user.0.user_id).await?;
    Ok(Json(()))
}
