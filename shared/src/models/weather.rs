//! Weather history models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::GpsCoordinates;

/// One day of historical weather at a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    /// Corrected precipitation (mm/day); `None` when the source flagged it missing
    pub precipitation_mm: Option<f64>,
    /// Mean air temperature at 2 m (°C)
    pub temperature_c: Option<f64>,
    /// All-sky surface shortwave radiation (kWh/m²/day)
    pub solar_radiation: Option<f64>,
}

/// Multi-year daily weather history for one coordinate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherHistory {
    pub location: GpsCoordinates,
    pub source: String,
    pub days: Vec<DailyWeather>,
}

impl WeatherHistory {
    /// Distinct calendar years that have at least one precipitation value
    pub fn years_with_precipitation(&self) -> BTreeSet<i32> {
        self.days
            .iter()
            .filter(|d| d.precipitation_mm.is_some())
            .map(|d| d.date.year())
            .collect()
    }
}
