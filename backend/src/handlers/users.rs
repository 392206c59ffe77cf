//! HTTP handlers for the current user's profile and alert preference

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::users::{User, UserService};
use crate::AppState;

/// Get the current user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// Input for updating the alert preference
#[derive(Debug, Deserialize)]
pub struct AlertPreferenceInput {
    pub receive_alerts: bool,
}

/// Toggle whether the current user receives alert notifications
pub async fn update_alert_preference(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AlertPreferenceInput>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service
        .set_receive_alerts(current_user.0.user_id, input.receive_alerts)
        .await?;
    Ok(Json(user))
}
