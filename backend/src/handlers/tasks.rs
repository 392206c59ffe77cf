//! HTTP handlers for remediation task management

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::farms::FarmService;
use crate::services::tasks::{FarmTask, TaskService, TaskStatus};
use crate::AppState;

/// Query parameters for the task list
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
}

/// List tasks for a farm
pub async fn list_tasks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<Vec<FarmTask>>> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = TaskService::new(state.db);
    let tasks = service.list(farm_id, query.status).await?;
    Ok(Json(tasks))
}

/// Input for a task status transition
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusInput {
    pub status: TaskStatus,
}

/// Transition a task's status
pub async fn update_task_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(input): Json<UpdateTaskStatusInput>,
) -> AppResult<Json<FarmTask>> {
    let service = TaskService::new(state.db);
    let task = service
        .update_status(task_id, current_user.0.user_id, input.status)
        .await?;
    Ok(Json(task))
}
