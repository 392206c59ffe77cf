//! Climate outlook models
//!
//! Aggregated 5-day weather outlook for a farm's coordinates. Derived from a
//! forecast provider on every evaluation and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Aggregated 5-day climate summary for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateSummary {
    pub location: GpsCoordinates,
    /// Temperature at fetch time, in °C
    pub current_temp: f64,
    /// Short human-readable description of the coming days
    pub conditions: String,
    /// Maximum of the 5-day daily highs, in °C
    pub max_temp_week: f64,
    /// Sum of the 5-day precipitation, in mm
    pub total_rain_week: f64,
    pub daily: Vec<DailyOutlook>,
}

/// One day of the aggregated outlook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOutlook {
    pub date: NaiveDate,
    pub high_celsius: f64,
    pub low_celsius: f64,
    pub precipitation_mm: f64,
    pub conditions: String,
}

impl ClimateSummary {
    /// True when the outlook has no rain at all over the aggregation window.
    pub fn is_dry_week(&self) -> bool {
        self.total_rain_week == 0.0
    }
}
