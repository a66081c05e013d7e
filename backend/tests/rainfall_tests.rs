//! Tests for rainfall onset analysis
//!
//! Property and unit tests for:
//! - Onset detection at the cumulative rainfall threshold
//! - Onset statistics bounds (mean day, coefficient of variation)
//! - History length requirements

use proptest::prelude::*;
use shared::analysis::{analyze_rainfall, analyze_rainfall_with, RainfallSettings};
use shared::{AdvisoryError, RainfallObservation, RainfallSeries};

// ============================================================================
// Helpers and Strategies
// ============================================================================

/// One year with a single storm on `onset_day` and light rain afterwards
fn season(year: i32, onset_day: u32) -> Vec<RainfallObservation> {
    let mut observations = vec![RainfallObservation::new(year, onset_day, 1000.0)];
    for day in (onset_day + 1)..=365 {
        observations.push(RainfallObservation::new(year, day, 1.0));
    }
    observations
}

fn series_from_onsets(first_year: i32, onsets: &[u32]) -> RainfallSeries {
    let observations = onsets
        .iter()
        .enumerate()
        .flat_map(|(i, day)| season(first_year + i as i32, *day))
        .collect();
    RainfallSeries::new(observations)
}

fn onset_days_strategy(min_years: usize, max_years: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=300, min_years..=max_years)
}

// ============================================================================
// Onset Detection Tests
// ============================================================================

mod onset_detection {
    use super::*;

    #[test]
    fn constant_onset_has_zero_variation() {
        let series = series_from_onsets(2014, &[50; 10]);
        let stats = analyze_rainfall(&series).unwrap();

        assert_eq!(stats.years_analyzed, 10);
        assert!((stats.mean_onset_day - 50.0).abs() < 1e-9);
        assert_eq!(stats.onset_std_dev, 0.0);
        assert_eq!(stats.coefficient_of_variation, 0.0);
    }

    #[test]
    fn onset_is_first_day_reaching_threshold() {
        // 10 mm/day for 100 days: 20% of 1000 mm is reached on day 20
        let mut observations = Vec::new();
        for year in 2010..2020 {
            for day in 1..=100 {
                observations.push(RainfallObservation::new(year, day, 10.0));
            }
        }
        let stats = analyze_rainfall(&RainfallSeries::new(observations)).unwrap();

        assert!(stats.onset_days_by_year.iter().all(|y| y.onset_day == 20));
        assert!(stats
            .onset_days_by_year
            .iter()
            .all(|y| (y.annual_total_mm - 1000.0).abs() < 1e-9));
    }

    #[test]
    fn readings_out_of_order_are_sorted_by_day() {
        let mut observations = series_from_onsets(2010, &[60; 10]).observations;
        observations.reverse();
        let stats = analyze_rainfall(&RainfallSeries::new(observations)).unwrap();

        assert!((stats.mean_onset_day - 60.0).abs() < 1e-9);
    }

    #[test]
    fn known_variation() {
        // Onsets 40 and 60 alternating: mean 50, population std 10
        let onsets: Vec<u32> = (0..10).map(|i| if i % 2 == 0 { 40 } else { 60 }).collect();
        let stats = analyze_rainfall(&series_from_onsets(2010, &onsets)).unwrap();

        assert!((stats.mean_onset_day - 50.0).abs() < 1e-9);
        assert!((stats.onset_std_dev - 10.0).abs() < 1e-9);
        assert!((stats.coefficient_of_variation - 0.2).abs() < 1e-9);
    }

    #[test]
    fn custom_threshold_fraction() {
        // Half the rainfall is needed: with 10 mm/day over 100 days that is day 50
        let mut observations = Vec::new();
        for year in 2010..2020 {
            for day in 1..=100 {
                observations.push(RainfallObservation::new(year, day, 10.0));
            }
        }
        let settings = RainfallSettings {
            onset_threshold_fraction: 0.5,
            ..RainfallSettings::default()
        };
        let stats = analyze_rainfall_with(&RainfallSeries::new(observations), &settings).unwrap();

        assert!((stats.mean_onset_day - 50.0).abs() < 1e-9);
    }
}

// ============================================================================
// History Requirements
// ============================================================================

mod history_requirements {
    use super::*;

    #[test]
    fn nine_years_is_insufficient() {
        let series = series_from_onsets(2015, &[50; 9]);
        let err = analyze_rainfall(&series).unwrap_err();

        assert_eq!(
            err,
            AdvisoryError::InsufficientData {
                found: 9,
                required: 10
            }
        );
    }

    #[test]
    fn empty_series_is_insufficient() {
        let err = analyze_rainfall(&RainfallSeries::default()).unwrap_err();
        assert!(matches!(err, AdvisoryError::InsufficientData { found: 0, .. }));
    }

    #[test]
    fn only_most_recent_years_are_used() {
        // 2008 and 2009 have a late onset and must not move the mean
        let mut onsets = vec![200, 200];
        onsets.extend([50; 10]);
        let stats = analyze_rainfall(&series_from_onsets(2008, &onsets)).unwrap();

        assert_eq!(stats.years_analyzed, 10);
        assert_eq!(stats.years_ignored, vec![2008, 2009]);
        assert!((stats.mean_onset_day - 50.0).abs() < 1e-9);
    }

    #[test]
    fn dry_year_is_reported() {
        let mut observations = series_from_onsets(2010, &[50; 10]).observations;
        for day in 1..=365 {
            observations.push(RainfallObservation::new(2020, day, 0.0));
        }
        let stats = analyze_rainfall(&RainfallSeries::new(observations)).unwrap();

        assert_eq!(stats.dry_years, vec![2020]);
    }

    #[test]
    fn invalid_readings_count_as_missing() {
        let mut observations = series_from_onsets(2010, &[50; 10]).observations;
        observations.push(RainfallObservation::new(2015, 10, -999.0));
        observations.push(RainfallObservation::new(2015, 11, f64::NAN));
        let stats = analyze_rainfall(&RainfallSeries::new(observations)).unwrap();

        assert_eq!(stats.missing_observations, 2);
        assert!((stats.mean_onset_day - 50.0).abs() < 1e-9);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod rainfall_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Mean onset day always lies within the calendar year
        #[test]
        fn prop_mean_onset_within_year(onsets in onset_days_strategy(10, 15)) {
            let stats = analyze_rainfall(&series_from_onsets(2000, &onsets)).unwrap();
            prop_assert!(stats.mean_onset_day >= 1.0 && stats.mean_onset_day <= 366.0,
                "mean onset {} outside the year", stats.mean_onset_day);
        }

        /// Coefficient of variation is never negative
        #[test]
        fn prop_variation_non_negative(onsets in onset_days_strategy(10, 15)) {
            let stats = analyze_rainfall(&series_from_onsets(2000, &onsets)).unwrap();
            prop_assert!(stats.coefficient_of_variation >= 0.0);
            prop_assert!(stats.onset_std_dev >= 0.0);
        }

        /// Mean equals the average onset of the ten most recent years
        #[test]
        fn prop_mean_matches_recent_onsets(onsets in onset_days_strategy(10, 15)) {
            let stats = analyze_rainfall(&series_from_onsets(2000, &onsets)).unwrap();
            let recent = &onsets[onsets.len() - 10..];
            let expected = recent.iter().map(|d| *d as f64).sum::<f64>() / 10.0;

            prop_assert_eq!(stats.years_analyzed, 10);
            prop_assert!((stats.mean_onset_day - expected).abs() < 1e-9);
        }

        /// Short histories are always rejected
        #[test]
        fn prop_short_history_rejected(onsets in onset_days_strategy(1, 9)) {
            let result = analyze_rainfall(&series_from_onsets(2000, &onsets));
            let is_insufficient = matches!(result, Err(AdvisoryError::InsufficientData { .. }));
            prop_assert!(is_insufficient);
        }
    }
}
