//! Task service for remediation to-dos
//!
//! Tasks are auto-created by the alert engine; their lifecycle afterwards
//! (start, complete) is managed through this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Task service
#[derive(Clone)]
pub struct TaskService {
    db: PgPool,
}

/// Task priority enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Task status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

/// A remediation task for a farm
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FarmTask {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub farm_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
}

impl TaskService {
    /// Create a new TaskService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a task
    pub async fn create(&self, task: NewTask) -> AppResult<FarmTask> {
        let created = sqlx::query_as::<_, FarmTask>(
            r#"
            INSERT INTO tasks (farm_id, title, description, priority, status, due_date)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            RETURNING id, farm_id, title, description, priority, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(task.farm_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.due_date)
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    /// List tasks for a farm, optionally filtered by status
    pub async fn list(
        &self,
        farm_id: Uuid,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<FarmTask>> {
        let tasks = if let Some(status) = status {
            sqlx::query_as::<_, FarmTask>(
                r#"
                SELECT id, farm_id, title, description, priority, status, due_date,
                       created_at, updated_at
                FROM tasks
                WHERE farm_id = $1 AND status = $2
                ORDER BY due_date ASC
                "#,
            )
            .bind(farm_id)
            .bind(status)
            .fetch_all(&self.db)
            .await?
        } else {
            sqlx::query_as::<_, FarmTask>(
                r#"
                SELECT id, farm_id, title, description, priority, status, due_date,
                       created_at, updated_at
                FROM tasks
                WHERE farm_id = $1
                ORDER BY due_date ASC
                "#,
            )
            .bind(farm_id)
            .fetch_all(&self.db)
            .await?
        };

        Ok(tasks)
    }

    /// Transition a task's status. Valid transitions:
    /// pending → in_progress → done, plus pending → done directly.
    pub async fn update_status(
        &self,
        task_id: Uuid,
        owner_id: Uuid,
        status: TaskStatus,
    ) -> AppResult<FarmTask> {
        let current = sqlx::query_as::<_, FarmTask>(
            r#"
            SELECT t.id, t.farm_id, t.title, t.description, t.priority, t.status, t.due_date,
                   t.created_at, t.updated_at
            FROM tasks t
            JOIN farms f ON f.id = t.farm_id
            WHERE t.id = $1 AND f.owner_id = $2
            "#,
        )
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

        let allowed = matches!(
            (current.status, status),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::Pending, TaskStatus::Done)
                | (TaskStatus::InProgress, TaskStatus::Done)
        );

        if !allowed {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot move task from {:?} to {:?}",
                current.status, status
            )));
        }

        let updated = sqlx::query_as::<_, FarmTask>(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, farm_id, title, description, priority, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(status)
        .fetch_one(&self.db)
        .await?;

        Ok(updated)
    }
}
