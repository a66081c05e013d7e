//! Tests for crop ranking and suitability grid generation
//!
//! Verifies ranking order and determinism, grid node counts and ordering,
//! and partial grids when site conditions run out.

use proptest::prelude::*;
use std::ops::ControlFlow;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::analysis::{expected_grid_points, generate_suitability_grid, grid_nodes, rank_crops};
use shared::{
    AdvisoryError, ClimateProperties, CropRequirements, GridBounds, SiteConditions,
    SoilProperties,
};
use uuid::Uuid;

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn crop(name: &str, min_ph: f64, max_ph: f64) -> CropRequirements {
    CropRequirements {
        id: Uuid::new_v4(),
        name: name.to_string(),
        name_chichewa: name.to_string(),
        scientific_name: String::new(),
        min_ph,
        max_ph,
        min_clay_content: 10.0,
        max_clay_content: 40.0,
        min_organic_carbon: 5.0,
        min_rainfall: 500.0,
        max_rainfall: 1200.0,
        min_temperature: 18.0,
        max_temperature: 32.0,
        min_elevation: 0.0,
        max_elevation: 2000.0,
        growing_season_days: 120,
    }
}

fn soil(ph_level: f64) -> SoilProperties {
    SoilProperties {
        clay_content: 25.0,
        sand_content: 45.0,
        ph_level,
        organic_carbon: 12.0,
    }
}

fn site() -> SiteConditions {
    SiteConditions {
        soil: soil(6.0),
        elevation: Some(1000.0),
        climate: None,
    }
}

fn bounds(min_lat: &str, max_lat: &str, min_lon: &str, max_lon: &str) -> GridBounds {
    GridBounds::new(dec(min_lat), dec(max_lat), dec(min_lon), dec(max_lon))
}

// =============================================================================
// Ranking
// =============================================================================

mod ranking {
    use super::*;

    #[test]
    fn best_match_first() {
        let crops = vec![
            crop("Tobacco", 4.5, 5.5),
            crop("Maize", 5.5, 7.5),
            crop("Cassava", 6.0, 8.0),
        ];
        let ranked = rank_crops(&crops, &soil(6.5), Some(1000.0), None).unwrap();

        assert_eq!(ranked[0].crop_name, "Maize");
        assert_eq!(ranked[2].crop_name, "Tobacco");
    }

    #[test]
    fn ties_ordered_by_name() {
        let crops = vec![crop("Sorghum", 5.5, 7.5), crop("Beans", 5.5, 7.5)];
        let ranked = rank_crops(&crops, &soil(6.5), Some(1000.0), None).unwrap();

        assert_eq!(ranked[0].overall_score, ranked[1].overall_score);
        assert_eq!(ranked[0].crop_name, "Beans");
        assert_eq!(ranked[1].crop_name, "Sorghum");
    }

    #[test]
    fn empty_catalog_rejected() {
        let err = rank_crops(&[], &soil(6.5), Some(1000.0), None).unwrap_err();
        assert_eq!(err, AdvisoryError::NoCropsAvailable);
    }

    #[test]
    fn invalid_crop_fails_whole_ranking() {
        let crops = vec![crop("Maize", 5.5, 7.5), crop("Broken", 7.0, 5.0)];
        let err = rank_crops(&crops, &soil(6.5), Some(1000.0), None).unwrap_err();
        assert!(matches!(err, AdvisoryError::InvalidRange { .. }));
    }

    #[test]
    fn climate_is_applied_to_every_crop() {
        let crops = vec![crop("Maize", 5.5, 7.5), crop("Beans", 6.0, 7.0)];
        let climate = ClimateProperties {
            annual_rainfall_mm: 850.0,
            mean_temperature_c: 25.0,
        };
        let ranked = rank_crops(&crops, &soil(6.5), Some(1000.0), Some(&climate)).unwrap();

        assert!(ranked.iter().all(|s| s.climate_score.is_some()));
    }
}

// =============================================================================
// Suitability Grid
// =============================================================================

mod suitability_grid {
    use super::*;

    #[test]
    fn node_count_and_order() {
        let b = bounds("-14.0", "-13.98", "33.70", "33.73");
        let nodes: Vec<_> = grid_nodes(&b, dec("0.01")).unwrap().collect();

        // 2 rows x 3 columns, upper bounds excluded
        assert_eq!(nodes.len(), 6);
        assert_eq!(expected_grid_points(&b, dec("0.01")).unwrap(), 6);
        assert_eq!(nodes[0].lat, dec("-14.0"));
        assert_eq!(nodes[0].lon, dec("33.70"));
        assert_eq!(nodes[2].lon, dec("33.72"));
        assert_eq!(nodes[3].lat, dec("-13.99"));
    }

    #[test]
    fn uneven_span_rounds_up() {
        let b = bounds("0", "0.25", "0", "0.1");
        // ceil(0.25 / 0.1) = 3 rows, 1 column
        assert_eq!(expected_grid_points(&b, dec("0.1")).unwrap(), 3);
    }

    #[test]
    fn zero_resolution_rejected() {
        let b = bounds("-14.0", "-13.9", "33.7", "33.8");
        let err = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, Decimal::ZERO, |_| {
            ControlFlow::Continue(Some(site()))
        })
        .unwrap_err();
        assert!(matches!(err, AdvisoryError::InvalidResolution(_)));
    }

    #[test]
    fn negative_resolution_rejected() {
        let b = bounds("-14.0", "-13.9", "33.7", "33.8");
        assert!(matches!(
            expected_grid_points(&b, dec("-0.01")),
            Err(AdvisoryError::InvalidResolution(_))
        ));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let b = bounds("-13.9", "-14.0", "33.7", "33.8");
        assert!(matches!(
            expected_grid_points(&b, dec("0.01")),
            Err(AdvisoryError::InvalidBounds(_))
        ));
    }

    #[test]
    fn degenerate_bounds_give_empty_grid() {
        let b = bounds("-14.0", "-14.0", "33.7", "33.8");
        let grid = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, dec("0.01"), |_| {
            ControlFlow::Continue(Some(site()))
        })
        .unwrap();

        assert!(grid.points.is_empty());
        assert_eq!(grid.expected_points, 0);
        assert!(grid.complete);
    }

    #[test]
    fn full_grid_is_complete() {
        let b = bounds("-14.0", "-13.95", "33.70", "33.75");
        let grid = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, dec("0.01"), |_| {
            ControlFlow::Continue(Some(site()))
        })
        .unwrap();

        assert_eq!(grid.points.len(), 25);
        assert!(grid.complete);
        assert!((grid.points[0].lat - -14.0).abs() < 1e-9);
        assert!((grid.points[24].lon - 33.74).abs() < 1e-9);
    }

    #[test]
    fn exhausted_provider_gives_partial_prefix() {
        let b = bounds("-14.0", "-13.95", "33.70", "33.75");
        let mut remaining = 7;
        let grid = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, dec("0.01"), |_| {
            if remaining == 0 {
                return ControlFlow::Break(());
            }
            remaining -= 1;
            ControlFlow::Continue(Some(site()))
        })
        .unwrap();

        assert_eq!(grid.points.len(), 7);
        assert_eq!(grid.expected_points, 25);
        assert!(grid.skipped.is_empty());
        assert!(!grid.complete);
        // Row-major prefix: second row starts at index 5
        assert!((grid.points[5].lat - -13.99).abs() < 1e-9);
    }

    #[test]
    fn unavailable_middle_node_is_skipped() {
        // 2x2 grid; the first node has no site data but the rest are still scored
        let b = bounds("-14.0", "-13.98", "33.70", "33.72");
        let grid = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, dec("0.01"), |node| {
            if node.lat == dec("-14.0") && node.lon == dec("33.71") {
                ControlFlow::Continue(None)
            } else {
                ControlFlow::Continue(Some(site()))
            }
        })
        .unwrap();

        assert!(grid.complete);
        assert_eq!(grid.expected_points, 4);
        assert_eq!(grid.points.len(), 3);
        assert_eq!(grid.skipped.len(), 1);
        assert_eq!(grid.skipped[0].lon, dec("33.71"));
        assert!((grid.points[1].lat - -13.99).abs() < 1e-9);
        assert!((grid.points[1].lon - 33.70).abs() < 1e-9);
    }

    #[test]
    fn first_node_failure_keeps_remaining_nodes() {
        let b = bounds("-14.0", "-13.98", "33.70", "33.72");
        let mut visited = 0;
        let grid = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, dec("0.01"), |_| {
            visited += 1;
            if visited == 1 {
                ControlFlow::Continue(None)
            } else {
                ControlFlow::Continue(Some(site()))
            }
        })
        .unwrap();

        assert_eq!(visited, 4);
        assert_eq!(grid.points.len(), 3);
        assert!(grid.complete);
    }
}

// =============================================================================
// Property Tests
// =============================================================================

mod ranking_properties {
    use super::*;

    fn crops_strategy() -> impl Strategy<Value = Vec<CropRequirements>> {
        prop::collection::vec((3.0f64..8.0, 0.1f64..3.0), 1..8).prop_map(|ranges| {
            ranges
                .into_iter()
                .enumerate()
                .map(|(i, (min, width))| crop(&format!("Crop {}", i), min, min + width))
                .collect()
        })
    }

    /// Hundredths of a degree within Malawi's latitude band
    fn cents_strategy(min: i64, max: i64) -> impl Strategy<Value = Decimal> {
        (min..max).prop_map(|v| Decimal::new(v, 2))
    }

    fn resolution_strategy() -> impl Strategy<Value = Decimal> {
        prop_oneof![
            Just(Decimal::new(1, 2)),
            Just(Decimal::new(5, 2)),
            Just(Decimal::new(1, 1)),
            Just(Decimal::new(25, 2)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ranking is sorted by overall score, highest first
        #[test]
        fn prop_ranking_descending(crops in crops_strategy(), ph in 3.0f64..9.0) {
            let ranked = rank_crops(&crops, &soil(ph), Some(1000.0), None).unwrap();

            prop_assert_eq!(ranked.len(), crops.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].overall_score >= pair[1].overall_score);
            }
        }

        /// Ranking the same inputs twice gives the same order
        #[test]
        fn prop_ranking_deterministic(crops in crops_strategy(), ph in 3.0f64..9.0) {
            let first = rank_crops(&crops, &soil(ph), None, None).unwrap();
            let mut reversed = crops.clone();
            reversed.reverse();
            let second = rank_crops(&reversed, &soil(ph), None, None).unwrap();

            let first_names: Vec<_> = first.iter().map(|s| s.crop_name.clone()).collect();
            let second_names: Vec<_> = second.iter().map(|s| s.crop_name.clone()).collect();
            prop_assert_eq!(first_names, second_names);
        }

        /// Node count is ceil(lat span / res) * ceil(lon span / res)
        #[test]
        fn prop_grid_count_matches_spans(
            min_lat in cents_strategy(-1700, -940),
            lat_span in cents_strategy(0, 60),
            min_lon in cents_strategy(3260, 3540),
            lon_span in cents_strategy(0, 60),
            resolution in resolution_strategy()
        ) {
            let b = GridBounds::new(min_lat, min_lat + lat_span, min_lon, min_lon + lon_span);
            let rows = (lat_span / resolution).ceil();
            let cols = (lon_span / resolution).ceil();
            let expected = (rows * cols).to_usize().unwrap();

            let nodes: Vec<_> = grid_nodes(&b, resolution).unwrap().collect();
            prop_assert_eq!(nodes.len(), expected);
            prop_assert_eq!(expected_grid_points(&b, resolution).unwrap(), expected);
            for node in &nodes {
                prop_assert!(node.lat >= b.min_lat && node.lat < b.max_lat);
                prop_assert!(node.lon >= b.min_lon && node.lon < b.max_lon);
            }
        }

        /// Grid scores stay within [0, 100] and the grid is complete when every node is supplied
        #[test]
        fn prop_grid_scores_bounded(
            lat_span in cents_strategy(1, 30),
            lon_span in cents_strategy(1, 30),
            ph in 3.0f64..9.0
        ) {
            let b = GridBounds::new(dec("-14.00"), dec("-14.00") + lat_span, dec("33.70"), dec("33.70") + lon_span);
            let conditions = SiteConditions { soil: soil(ph), ..site() };
            let grid = generate_suitability_grid(&crop("Maize", 5.5, 7.5), &b, dec("0.05"), |_| {
                ControlFlow::Continue(Some(conditions))
            })
            .unwrap();

            prop_assert!(grid.complete);
            prop_assert_eq!(grid.points.len(), grid.expected_points);
            for point in &grid.points {
                prop_assert!((0.0..=100.0).contains(&point.suitability_score));
            }
        }
    }
}
