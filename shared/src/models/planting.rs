//! Planting window models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Date window and confidence derived from onset statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlantingWindowEstimate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 0.0 (unpredictable onset) to 1.0 (identical onset every year)
    pub confidence_level: f64,
}

/// Planting window for a village, optionally specific to a crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantingWindow {
    pub id: Uuid,
    pub village_id: Uuid,
    pub crop_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub confidence_level: f64,
    pub calculated_at: DateTime<Utc>,
    /// Computed from weather data served out of an expired cache entry
    pub is_stale: bool,
}

impl PlantingWindow {
    pub fn window_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}
