//! User service for account lookups and alert preferences

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// A user account on the platform
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub receive_alerts: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Find a user by ID, returning None when absent
    pub async fn find(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, receive_alerts, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        self.find(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Toggle whether the user receives alert notifications
    pub async fn set_receive_alerts(&self, user_id: Uuid, receive: bool) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET receive_alerts = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, receive_alerts, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(receive)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user)
    }
}
