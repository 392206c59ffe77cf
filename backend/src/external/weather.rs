//! Weather API client for fetching forecast data
//!
//! Integrates with an OpenWeatherMap-style 5-day/3-hour forecast API and
//! aggregates the raw items into the platform's `ClimateSummary`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{ClimateSummary, DailyOutlook};
use shared::types::GpsCoordinates;

use crate::error::{AppError, AppResult};

/// Provider of aggregated climate summaries for a location.
///
/// The alert engine treats any error as "forecast unavailable" and degrades
/// to satellite-only rules.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn climate_summary(&self, latitude: Decimal, longitude: Decimal)
        -> AppResult<ClimateSummary>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    weather: Vec<OWMWeather>,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
        }
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch the raw 5-day forecast by GPS coordinates
    async fn get_forecast(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<OWMForecastResponse> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url, latitude, longitude, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse forecast response: {}", e)))
    }

    /// Collapse the 3-hourly forecast items into per-day aggregates
    fn aggregate(
        data: OWMForecastResponse,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<ClimateSummary> {
        let current_temp = data
            .list
            .first()
            .map(|item| item.main.temp)
            .ok_or(AppError::WeatherServiceUnavailable)?;

        // BTreeMap keeps the days chronologically ordered
        let mut days: BTreeMap<NaiveDate, DailyOutlook> = BTreeMap::new();

        for item in &data.list {
            let date = DateTime::from_timestamp(item.dt, 0)
                .ok_or_else(|| {
                    AppError::ExternalService("Invalid timestamp in forecast".to_string())
                })?
                .date_naive();
            let rain = item
                .rain
                .as_ref()
                .and_then(|r| r.three_hour)
                .unwrap_or(0.0);
            let conditions = item
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_default();

            days.entry(date)
                .and_modify(|day| {
                    day.high_celsius = day.high_celsius.max(item.main.temp_max);
                    day.low_celsius = day.low_celsius.min(item.main.temp_min);
                    day.precipitation_mm += rain;
                })
                .or_insert(DailyOutlook {
                    date,
                    high_celsius: item.main.temp_max,
                    low_celsius: item.main.temp_min,
                    precipitation_mm: rain,
                    conditions,
                });
        }

        let daily: Vec<DailyOutlook> = days.into_values().collect();

        let max_temp_week = daily
            .iter()
            .map(|d| d.high_celsius)
            .fold(f64::NEG_INFINITY, f64::max);
        let total_rain_week = daily.iter().map(|d| d.precipitation_mm).sum();
        let conditions = daily
            .first()
            .map(|d| d.conditions.clone())
            .unwrap_or_default();

        Ok(ClimateSummary {
            location: GpsCoordinates::new(latitude, longitude),
            current_temp,
            conditions,
            max_temp_week,
            total_rain_week,
            daily,
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherClient {
    async fn climate_summary(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<ClimateSummary> {
        let data = self.get_forecast(latitude, longitude).await?;
        Self::aggregate(data, latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(dt: i64, temp_max: f64, temp_min: f64, rain: Option<f64>) -> OWMForecastItem {
        OWMForecastItem {
            dt,
            main: OWMMain {
                temp: (temp_max + temp_min) / 2.0,
                temp_min,
                temp_max,
            },
            weather: vec![OWMWeather {
                description: "céu limpo".to_string(),
            }],
            rain: rain.map(|mm| OWMRain {
                three_hour: Some(mm),
            }),
        }
    }

    fn coords() -> (Decimal, Decimal) {
        (
            Decimal::from_str("-21.1775").unwrap(),
            Decimal::from_str("-47.8103").unwrap(),
        )
    }

    #[test]
    fn aggregate_takes_max_of_daily_highs() {
        // Two days: highs 31 and 39
        let data = OWMForecastResponse {
            list: vec![
                item(1_700_000_000, 31.0, 22.0, None),
                item(1_700_086_400, 39.0, 24.0, None),
            ],
        };
        let (lat, lon) = coords();
        let summary = WeatherClient::aggregate(data, lat, lon).unwrap();
        assert_eq!(summary.max_temp_week, 39.0);
        assert_eq!(summary.daily.len(), 2);
    }

    #[test]
    fn aggregate_sums_precipitation_across_window() {
        let data = OWMForecastResponse {
            list: vec![
                item(1_700_000_000, 30.0, 20.0, Some(2.5)),
                item(1_700_010_800, 30.0, 20.0, Some(1.5)),
                item(1_700_086_400, 28.0, 19.0, None),
            ],
        };
        let (lat, lon) = coords();
        let summary = WeatherClient::aggregate(data, lat, lon).unwrap();
        assert_eq!(summary.total_rain_week, 4.0);
        assert!(!summary.is_dry_week());
    }

    #[test]
    fn aggregate_with_no_rain_is_dry_week() {
        let data = OWMForecastResponse {
            list: vec![item(1_700_000_000, 33.0, 21.0, None)],
        };
        let (lat, lon) = coords();
        let summary = WeatherClient::aggregate(data, lat, lon).unwrap();
        assert_eq!(summary.total_rain_week, 0.0);
        assert!(summary.is_dry_week());
    }

    #[test]
    fn aggregate_empty_list_is_unavailable() {
        let data = OWMForecastResponse { list: vec![] };
        let (lat, lon) = coords();
        assert!(WeatherClient::aggregate(data, lat, lon).is_err());
    }
}
