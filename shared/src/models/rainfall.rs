//! Rainfall series and onset statistics

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::weather::WeatherHistory;

/// A single daily precipitation reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RainfallObservation {
    pub year: i32,
    /// 1-based day of year (1..=366)
    pub day_of_year: u32,
    pub precipitation_mm: f64,
}

impl RainfallObservation {
    pub fn new(year: i32, day_of_year: u32, precipitation_mm: f64) -> Self {
        Self {
            year,
            day_of_year,
            precipitation_mm,
        }
    }
}

/// Multi-year daily precipitation for one coordinate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RainfallSeries {
    pub observations: Vec<RainfallObservation>,
}

impl RainfallSeries {
    pub fn new(observations: Vec<RainfallObservation>) -> Self {
        Self { observations }
    }

    /// Build a series from a fetched weather history, dropping days without precipitation
    pub fn from_history(history: &WeatherHistory) -> Self {
        let observations = history
            .days
            .iter()
            .filter_map(|day| {
                day.precipitation_mm.map(|mm| RainfallObservation {
                    year: day.date.year(),
                    day_of_year: day.date.ordinal(),
                    precipitation_mm: mm,
                })
            })
            .collect();

        Self { observations }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Rainy season onset for a single year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearOnset {
    pub year: i32,
    pub onset_day: u32,
    pub annual_total_mm: f64,
}

/// Aggregate onset statistics across the analysed years
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonOnsetStatistics {
    pub onset_days_by_year: Vec<YearOnset>,
    pub mean_onset_day: f64,
    /// Population standard deviation of onset days
    pub onset_std_dev: f64,
    pub coefficient_of_variation: f64,
    pub years_analyzed: usize,
    /// Years excluded because their annual total was zero
    pub dry_years: Vec<i32>,
    /// Older years beyond the analysis window
    pub years_ignored: Vec<i32>,
    /// Readings skipped as missing (negative or non-finite)
    pub missing_observations: usize,
}
