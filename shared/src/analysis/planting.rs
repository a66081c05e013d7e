//! Planting window calculation from onset statistics

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::models::{PlantingWindowEstimate, SeasonOnsetStatistics};

/// Length of the recommended planting window
pub const PLANTING_WINDOW_DAYS: i64 = 30;

/// Tunables for window calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantingSettings {
    pub window_days: i64,
}

impl Default for PlantingSettings {
    fn default() -> Self {
        Self {
            window_days: PLANTING_WINDOW_DAYS,
        }
    }
}

/// Planting window in `target_year` with the default window length
pub fn calculate_planting_window(
    stats: &SeasonOnsetStatistics,
    target_year: i32,
) -> AdvisoryResult<PlantingWindowEstimate> {
    calculate_planting_window_with(stats, target_year, &PlantingSettings::default())
}

/// Planting window in `target_year`
///
/// The window opens on the mean onset day and stays open for `window_days`. Confidence
/// is `1 - coefficient_of_variation`, clamped to [0, 1].
pub fn calculate_planting_window_with(
    stats: &SeasonOnsetStatistics,
    target_year: i32,
    settings: &PlantingSettings,
) -> AdvisoryResult<PlantingWindowEstimate> {
    if !stats.mean_onset_day.is_finite() {
        return Err(AdvisoryError::MissingInput("mean_onset_day".to_string()));
    }
    if !(1.0..367.0).contains(&stats.mean_onset_day) {
        return Err(AdvisoryError::InvariantViolation(format!(
            "mean onset day {} outside 1..=366",
            stats.mean_onset_day
        )));
    }

    let year_end = NaiveDate::from_ymd_opt(target_year, 12, 31).ok_or_else(|| {
        AdvisoryError::InvariantViolation(format!("year {} is not representable", target_year))
    })?;

    // A leap-day mean falls on 31 December in a common year
    let onset_day = (stats.mean_onset_day.floor() as u32).min(year_end.ordinal());
    let start_date = NaiveDate::from_yo_opt(target_year, onset_day).ok_or_else(|| {
        AdvisoryError::InvariantViolation(format!(
            "day {} of {} is not representable",
            onset_day, target_year
        ))
    })?;
    let end_date = start_date
        .checked_add_signed(Duration::days(settings.window_days))
        .ok_or_else(|| AdvisoryError::InvariantViolation("end date overflow".to_string()))?;

    if start_date >= end_date {
        return Err(AdvisoryError::InvariantViolation(format!(
            "planting window start {} is not before end {}",
            start_date, end_date
        )));
    }

    Ok(PlantingWindowEstimate {
        start_date,
        end_date,
        confidence_level: confidence_from_variation(stats.coefficient_of_variation),
    })
}

/// Lower onset variability gives higher confidence
pub fn confidence_from_variation(coefficient_of_variation: f64) -> f64 {
    if coefficient_of_variation.is_finite() {
        (1.0 - coefficient_of_variation).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
