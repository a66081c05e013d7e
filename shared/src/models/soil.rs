//! Site condition models: soil and climate

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::weather::WeatherHistory;

/// Topsoil properties at a point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SoilProperties {
    /// Clay content (%)
    pub clay_content: f64,
    /// Sand content (%)
    pub sand_content: f64,
    /// pH in H2O
    pub ph_level: f64,
    /// Soil organic carbon (g/kg)
    pub organic_carbon: f64,
}

/// Long-term climate summary at a point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClimateProperties {
    pub annual_rainfall_mm: f64,
    pub mean_temperature_c: f64,
}

impl ClimateProperties {
    /// Average annual rainfall and mean temperature over a history
    ///
    /// Returns `None` when the history lacks either precipitation or temperature.
    pub fn from_history(history: &WeatherHistory) -> Option<Self> {
        let mut yearly_totals: BTreeMap<i32, f64> = BTreeMap::new();
        for day in &history.days {
            if let Some(mm) = day.precipitation_mm.filter(|mm| mm.is_finite() && *mm >= 0.0) {
                *yearly_totals.entry(day.date.year()).or_insert(0.0) += mm;
            }
        }

        let temperatures: Vec<f64> = history
            .days
            .iter()
            .filter_map(|d| d.temperature_c)
            .filter(|t| t.is_finite())
            .collect();

        if yearly_totals.is_empty() || temperatures.is_empty() {
            return None;
        }

        let annual_rainfall_mm = yearly_totals.values().sum::<f64>() / yearly_totals.len() as f64;
        let mean_temperature_c = temperatures.iter().sum::<f64>() / temperatures.len() as f64;

        Some(Self {
            annual_rainfall_mm,
            mean_temperature_c,
        })
    }
}

/// Everything the scorer needs to know about one site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SiteConditions {
    pub soil: SoilProperties,
    pub elevation: Option<f64>,
    pub climate: Option<ClimateProperties>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::DailyWeather;
    use crate::types::GpsCoordinates;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, mm: Option<f64>, t: Option<f64>) -> DailyWeather {
        DailyWeather {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            precipitation_mm: mm,
            temperature_c: t,
            solar_radiation: None,
        }
    }

    #[test]
    fn test_climate_from_history_averages_years() {
        let history = WeatherHistory {
            location: GpsCoordinates::new(-13.98, 33.78),
            source: "test".to_string(),
            days: vec![
                day(2020, 1, 1, Some(600.0), Some(20.0)),
                day(2020, 6, 1, Some(200.0), Some(24.0)),
                day(2021, 1, 1, Some(1000.0), None),
                day(2021, 2, 1, Some(-999.0), Some(22.0)),
            ],
        };

        let climate = ClimateProperties::from_history(&history).unwrap();
        assert!((climate.annual_rainfall_mm - 900.0).abs() < 1e-9);
        assert!((climate.mean_temperature_c - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_climate_from_history_without_temperature() {
        let history = WeatherHistory {
            location: GpsCoordinates::new(0.0, 0.0),
            source: "test".to_string(),
            days: vec![day(2020, 1, 1, Some(5.0), None)],
        };
        assert!(ClimateProperties::from_history(&history).is_none());
    }
}
