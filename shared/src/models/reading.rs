//! Satellite reading payloads
//!
//! Wire contract between the vegetation-index ingestion collaborator and the
//! backend. A payload becomes an immutable reading row once accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One satellite-derived measurement snapshot for a farm
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReadingPayload {
    /// Acquisition timestamp; defaults to ingestion time when absent
    pub date: Option<DateTime<Utc>>,

    /// Normalized difference vegetation index
    #[validate(range(min = -1.0, max = 1.0))]
    pub ndvi: f64,

    /// Normalized difference water index
    #[validate(range(min = -1.0, max = 1.0))]
    pub ndwi: f64,

    /// Land surface temperature in °C, when the optical pass produced one
    #[validate(range(min = -60.0, max = 70.0))]
    pub temperature: Option<f64>,

    /// Fraction of the scene obstructed by clouds
    #[validate(range(min = 0.0, max = 1.0))]
    pub cloud_cover: Option<f64>,
}

/// Batch of payloads for historical backfill
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReadingBackfill {
    #[validate]
    pub readings: Vec<ReadingPayload>,
}
