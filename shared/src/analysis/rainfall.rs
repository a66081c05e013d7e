//! Rainy season onset analysis over multi-year daily precipitation
//!
//! For each year the onset is the first day-of-year at which cumulative rainfall
//! reaches a fixed fraction of that year's total. Onset days are then aggregated into
//! a mean and a coefficient of variation. Day-of-year is treated as a linear scale:
//! onset always falls within one season, never across the year boundary.

use std::collections::BTreeMap;

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::models::{RainfallSeries, SeasonOnsetStatistics, YearOnset};

/// Fraction of annual rainfall that marks the onset of the rainy season
pub const ONSET_THRESHOLD_FRACTION: f64 = 0.2;

/// Number of distinct years the analysis expects
pub const REQUIRED_YEARS: usize = 10;

/// Tunables for onset analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainfallSettings {
    pub onset_threshold_fraction: f64,
    pub required_years: usize,
}

impl Default for RainfallSettings {
    fn default() -> Self {
        Self {
            onset_threshold_fraction: ONSET_THRESHOLD_FRACTION,
            required_years: REQUIRED_YEARS,
        }
    }
}

/// Analyse a rainfall series with the default settings
pub fn analyze_rainfall(series: &RainfallSeries) -> AdvisoryResult<SeasonOnsetStatistics> {
    analyze_rainfall_with(series, &RainfallSettings::default())
}

/// Analyse a rainfall series
///
/// When more years than required are present, only the most recent ones are used.
pub fn analyze_rainfall_with(
    series: &RainfallSeries,
    settings: &RainfallSettings,
) -> AdvisoryResult<SeasonOnsetStatistics> {
    let (yearly, missing_observations) = group_by_year(series);

    if yearly.len() < settings.required_years {
        return Err(AdvisoryError::InsufficientData {
            found: yearly.len(),
            required: settings.required_years,
        });
    }

    let skip = yearly.len() - settings.required_years;
    let years_ignored: Vec<i32> = yearly.keys().take(skip).copied().collect();

    let mut onset_days_by_year = Vec::with_capacity(settings.required_years);
    let mut dry_years = Vec::new();

    for (&year, days) in yearly.iter().skip(skip) {
        let annual_total_mm: f64 = days.values().sum();
        if annual_total_mm <= 0.0 {
            dry_years.push(year);
            continue;
        }

        let onset_day = onset_day(days, annual_total_mm * settings.onset_threshold_fraction)
            .ok_or_else(|| {
                AdvisoryError::InvariantViolation(format!(
                    "cumulative rainfall for {} never reached the onset threshold",
                    year
                ))
            })?;

        onset_days_by_year.push(YearOnset {
            year,
            onset_day,
            annual_total_mm,
        });
    }

    if onset_days_by_year.is_empty() {
        return Err(AdvisoryError::InsufficientData {
            found: 0,
            required: settings.required_years,
        });
    }

    let count = onset_days_by_year.len() as f64;
    let mean_onset_day = onset_days_by_year
        .iter()
        .map(|o| o.onset_day as f64)
        .sum::<f64>()
        / count;
    let variance = onset_days_by_year
        .iter()
        .map(|o| (o.onset_day as f64 - mean_onset_day).powi(2))
        .sum::<f64>()
        / count;
    let onset_std_dev = variance.sqrt();

    Ok(SeasonOnsetStatistics {
        years_analyzed: onset_days_by_year.len(),
        onset_days_by_year,
        mean_onset_day,
        onset_std_dev,
        coefficient_of_variation: onset_std_dev / mean_onset_day,
        dry_years,
        years_ignored,
        missing_observations,
    })
}

/// Group valid readings by year and day; returns the grouping and the skipped count
fn group_by_year(series: &RainfallSeries) -> (BTreeMap<i32, BTreeMap<u32, f64>>, usize) {
    let mut yearly: BTreeMap<i32, BTreeMap<u32, f64>> = BTreeMap::new();
    let mut missing = 0;

    for obs in &series.observations {
        let valid_day = (1..=366).contains(&obs.day_of_year);
        let valid_value = obs.precipitation_mm.is_finite() && obs.precipitation_mm >= 0.0;
        if !valid_day || !valid_value {
            missing += 1;
            continue;
        }
        yearly
            .entry(obs.year)
            .or_default()
            .insert(obs.day_of_year, obs.precipitation_mm);
    }

    (yearly, missing)
}

/// First day at which the running total reaches `threshold`
fn onset_day(days: &BTreeMap<u32, f64>, threshold: f64) -> Option<u32> {
    let mut cumulative = 0.0;
    days.iter().find_map(|(&day, &mm)| {
        cumulative += mm;
        (cumulative >= threshold).then_some(day)
    })
}
