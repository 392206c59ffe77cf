//! HTTP handlers for the dashboard weather passthrough

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::ClimateSummary;

use crate::error::{AppError, AppResult};
use crate::external::weather::{ForecastProvider, WeatherClient};
use crate::middleware::CurrentUser;
use crate::AppState;

/// Query parameters for the forecast passthrough
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Get the aggregated 5-day climate summary for a location
pub async fn get_climate_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ClimateSummary>> {
    let weather = &state.config.weather;
    if weather.api_key.is_empty() {
        return Err(AppError::Configuration(
            "Weather API key not configured".to_string(),
        ));
    }

    let client = WeatherClient::with_base_url(weather.api_key.clone(), weather.api_endpoint.clone());
    let summary = client
        .climate_summary(query.latitude, query.longitude)
        .await?;
    Ok(Json(summary))
}
