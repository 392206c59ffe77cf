//! Farm service for managing monitored farms

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::validation::validate_coordinates;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Farm service
#[derive(Clone)]
pub struct FarmService {
    db: PgPool,
}

/// A monitored farm
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Farm {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// One-way latch; set true by the deforestation-risk rule, never reset
    pub is_deforested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a farm
#[derive(Debug, Deserialize)]
pub struct CreateFarmInput {
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Input for updating a farm
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFarmInput {
    pub name: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub is_deforested: Option<bool>,
}

impl FarmService {
    /// Create a new FarmService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a farm for an owner
    pub async fn create(&self, owner_id: Uuid, input: CreateFarmInput) -> AppResult<Farm> {
        validate_coordinates(input.latitude, input.longitude).map_err(|msg| {
            AppError::Validation {
                field: "coordinates".to_string(),
                message: msg.to_string(),
                message_pt: "Coordenadas fora do intervalo válido".to_string(),
            }
        })?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Farm name cannot be empty".to_string(),
                message_pt: "O nome da fazenda não pode ser vazio".to_string(),
            });
        }

        let farm = sqlx::query_as::<_, Farm>(
            r#"
            INSERT INTO farms (owner_id, name, latitude, longitude)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, name, latitude, longitude, is_deforested,
                      created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(input.name.trim())
        .bind(input.latitude)
        .bind(input.longitude)
        .fetch_one(&self.db)
        .await?;

        Ok(farm)
    }

    /// List farms for an owner
    pub async fn list(&self, owner_id: Uuid) -> AppResult<Vec<Farm>> {
        let farms = sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, owner_id, name, latitude, longitude, is_deforested,
                   created_at, updated_at
            FROM farms
            WHERE owner_id = $1
            ORDER BY name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(farms)
    }

    /// Find a farm by ID, returning None when absent
    pub async fn find(&self, farm_id: Uuid) -> AppResult<Option<Farm>> {
        let farm = sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, owner_id, name, latitude, longitude, is_deforested,
                   created_at, updated_at
            FROM farms
            WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(farm)
    }

    /// Get a farm by ID, scoped to its owner
    pub async fn get_owned(&self, farm_id: Uuid, owner_id: Uuid) -> AppResult<Farm> {
        let farm = sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, owner_id, name, latitude, longitude, is_deforested,
                   created_at, updated_at
            FROM farms
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(farm_id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))?;

        Ok(farm)
    }

    /// Update a farm. The deforestation flag is a one-way latch: once set it
    /// cannot be cleared through this patch.
    pub async fn update(&self, farm_id: Uuid, input: UpdateFarmInput) -> AppResult<Farm> {
        if let (Some(lat), Some(lon)) = (input.latitude, input.longitude) {
            validate_coordinates(lat, lon).map_err(|msg| AppError::Validation {
                field: "coordinates".to_string(),
                message: msg.to_string(),
                message_pt: "Coordenadas fora do intervalo válido".to_string(),
            })?;
        }

        let farm = sqlx::query_as::<_, Farm>(
            r#"
            UPDATE farms SET
                name = COALESCE($2, name),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude),
                is_deforested = is_deforested OR COALESCE($5, false),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, name, latitude, longitude, is_deforested,
                      created_at, updated_at
            "#,
        )
        .bind(farm_id)
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.is_deforested)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))?;

        Ok(farm)
    }
}
