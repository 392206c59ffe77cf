//! Reading service for satellite time series
//!
//! Readings are immutable once created; each accepted reading is handed to
//! the alert engine exactly once, at creation time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use shared::models::ReadingPayload;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Reading service
#[derive(Clone)]
pub struct ReadingService {
    db: PgPool,
}

/// One satellite-derived measurement snapshot for a farm
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reading {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub date: DateTime<Utc>,
    pub ndvi: f64,
    pub ndwi: f64,
    pub temperature: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ReadingService {
    /// Create a new ReadingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Store one reading for a farm
    pub async fn create(&self, farm_id: Uuid, payload: ReadingPayload) -> AppResult<Reading> {
        payload
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let date = payload.date.unwrap_or_else(Utc::now);

        let reading = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO readings (farm_id, date, ndvi, ndwi, temperature, cloud_cover)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, farm_id, date, ndvi, ndwi, temperature, cloud_cover, created_at
            "#,
        )
        .bind(farm_id)
        .bind(date)
        .bind(payload.ndvi)
        .bind(payload.ndwi)
        .bind(payload.temperature)
        .bind(payload.cloud_cover)
        .fetch_one(&self.db)
        .await?;

        Ok(reading)
    }

    /// Store a batch of historical readings for a farm
    pub async fn backfill(
        &self,
        farm_id: Uuid,
        payloads: Vec<ReadingPayload>,
    ) -> AppResult<Vec<Reading>> {
        let mut stored = Vec::with_capacity(payloads.len());
        for payload in payloads {
            stored.push(self.create(farm_id, payload).await?);
        }
        Ok(stored)
    }

    /// Get readings for a farm within a date range, newest first
    pub async fn get_for_range(
        &self,
        farm_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, farm_id, date, ndvi, ndwi, temperature, cloud_cover, created_at
            FROM readings
            WHERE farm_id = $1
              AND date >= $2::date
              AND date < ($3::date + INTERVAL '1 day')
            ORDER BY date DESC
            "#,
        )
        .bind(farm_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(readings)
    }

    /// Get the latest reading for a farm
    pub async fn get_latest(&self, farm_id: Uuid) -> AppResult<Option<Reading>> {
        let reading = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, farm_id, date, ndvi, ndwi, temperature, cloud_cover, created_at
            FROM readings
            WHERE farm_id = $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(farm_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(reading)
    }
}
