//! HTTP handlers for satellite reading ingestion and time series

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{ReadingBackfill, ReadingPayload};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::farms::FarmService;
use crate::services::readings::{Reading, ReadingService};
use crate::AppState;

/// Ingest one satellite reading for a farm.
///
/// The reading is committed and evaluation runs as a detached task; the
/// response never waits on the alert engine.
pub async fn ingest_reading(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
    Json(payload): Json<ReadingPayload>,
) -> AppResult<(StatusCode, Json<Reading>)> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = ReadingService::new(state.db);
    let reading = service.create(farm_id, payload).await?;

    state.engine.spawn_evaluation(reading.clone());

    Ok((StatusCode::ACCEPTED, Json(reading)))
}

/// Ingest a batch of historical readings for a farm.
///
/// Each stored reading spawns its own evaluation.
pub async fn backfill_readings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<ReadingBackfill>,
) -> AppResult<(StatusCode, Json<Vec<Reading>>)> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = ReadingService::new(state.db);
    let readings = service.backfill(farm_id, input.readings).await?;

    for reading in &readings {
        state.engine.spawn_evaluation(reading.clone());
    }

    Ok((StatusCode::ACCEPTED, Json(readings)))
}

/// Query parameters for readings by date range
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Get readings for a farm within a date range
pub async fn list_readings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<Reading>>> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = ReadingService::new(state.db);
    let readings = service
        .get_for_range(farm_id, query.start_date, query.end_date)
        .await?;
    Ok(Json(readings))
}

/// Get the latest reading for a farm
pub async fn get_latest_reading(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(farm_id): Path<Uuid>,
) -> AppResult<Json<Option<Reading>>> {
    let farms = FarmService::new(state.db.clone());
    farms.get_owned(farm_id, current_user.0.user_id).await?;

    let service = ReadingService::new(state.db);
    let reading = service.get_latest(farm_id).await?;
    Ok(Json(reading))
}
