//! Range scoring: maps a measured value against an acceptable [min, max] range to 0-100
//!
//! - Inside the range the score falls linearly from 100 at the midpoint to 70 at the edges.
//! - Outside the range the score falls from 50 at the edge to 0 one half-width away.

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::models::RangeFit;

/// Width of the optimal band as a fraction of the half-width, centred on the midpoint
pub const OPTIMAL_BAND_FRACTION: f64 = 0.3;

/// Lowest score a value inside the acceptable range can get
pub const IN_RANGE_FLOOR: f64 = 70.0;

/// Highest score a value outside the acceptable range can get
pub const OUT_OF_RANGE_CEILING: f64 = 50.0;

pub const MAX_SCORE: f64 = 100.0;

/// Score `value` against `[min_acceptable, max_acceptable]`
pub fn score_range(
    value: Option<f64>,
    min_acceptable: f64,
    max_acceptable: f64,
) -> AdvisoryResult<f64> {
    score_field("value", value, min_acceptable, max_acceptable).map(|(score, _)| score)
}

/// Classify `value` against the optimal band and acceptable range
pub fn classify_range(
    value: Option<f64>,
    min_acceptable: f64,
    max_acceptable: f64,
) -> AdvisoryResult<RangeFit> {
    score_field("value", value, min_acceptable, max_acceptable).map(|(_, fit)| fit)
}

/// Score and classify a named field; the name is reported in errors
pub fn score_field(
    field: &str,
    value: Option<f64>,
    min_acceptable: f64,
    max_acceptable: f64,
) -> AdvisoryResult<(f64, RangeFit)> {
    validate_range(field, min_acceptable, max_acceptable)?;

    let value = value
        .filter(|v| v.is_finite())
        .ok_or_else(|| AdvisoryError::MissingInput(field.to_string()))?;

    let mid = (min_acceptable + max_acceptable) / 2.0;
    let half_width = (max_acceptable - min_acceptable) / 2.0;

    if (min_acceptable..=max_acceptable).contains(&value) {
        let offset = (value - mid).abs();
        let score = IN_RANGE_FLOOR + (MAX_SCORE - IN_RANGE_FLOOR) * (1.0 - offset / half_width);
        let fit = if offset <= half_width * OPTIMAL_BAND_FRACTION {
            RangeFit::Optimal
        } else {
            RangeFit::Acceptable
        };
        return Ok((score.clamp(IN_RANGE_FLOOR, MAX_SCORE), fit));
    }

    let distance = (value - min_acceptable)
        .abs()
        .min((value - max_acceptable).abs())
        / half_width;
    let score = OUT_OF_RANGE_CEILING - OUT_OF_RANGE_CEILING * distance;

    Ok((score.clamp(0.0, OUT_OF_RANGE_CEILING), RangeFit::OutOfRange))
}

/// Reject inverted, empty or non-finite ranges
pub fn validate_range(field: &str, min: f64, max: f64) -> AdvisoryResult<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(AdvisoryError::InvalidRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_midpoint_scores_100() {
        assert!(approx(score_range(Some(6.5), 5.5, 7.5).unwrap(), 100.0));
    }

    #[test]
    fn test_range_edges_score_70() {
        assert!(approx(score_range(Some(5.5), 5.5, 7.5).unwrap(), 70.0));
        assert!(approx(score_range(Some(7.5), 5.5, 7.5).unwrap(), 70.0));
    }

    #[test]
    fn test_linear_inside_range() {
        // Halfway between mid (50) and edge (100): 70 + 30 * 0.5
        assert!(approx(score_range(Some(75.0), 0.0, 100.0).unwrap(), 85.0));
    }

    #[test]
    fn test_outside_range_penalty() {
        // Half-width is 50; 25 below min is half a half-width away
        assert!(approx(score_range(Some(-25.0), 0.0, 100.0).unwrap(), 25.0));
        // Just outside is capped at 50
        assert!(score_range(Some(100.0001), 0.0, 100.0).unwrap() <= 50.0);
        // Far away floors at 0
        assert!(approx(score_range(Some(1000.0), 0.0, 100.0).unwrap(), 0.0));
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            score_range(None, 0.0, 1.0),
            Err(AdvisoryError::MissingInput("value".to_string()))
        );
        assert!(matches!(
            score_range(Some(f64::NAN), 0.0, 1.0),
            Err(AdvisoryError::MissingInput(_))
        ));
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            score_range(Some(1.0), 2.0, 2.0),
            Err(AdvisoryError::InvalidRange { .. })
        ));
        assert!(matches!(
            score_range(Some(1.0), 3.0, 2.0),
            Err(AdvisoryError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_invalid_range_reported_before_missing_value() {
        assert!(matches!(
            score_field("ph", None, 7.0, 5.0),
            Err(AdvisoryError::InvalidRange { ref field, .. }) if field == "ph"
        ));
    }

    #[test]
    fn test_classification_bands() {
        // Half-width 50, optimal band ±15 around 50
        assert_eq!(classify_range(Some(50.0), 0.0, 100.0).unwrap(), RangeFit::Optimal);
        assert_eq!(classify_range(Some(65.0), 0.0, 100.0).unwrap(), RangeFit::Optimal);
        assert_eq!(classify_range(Some(66.0), 0.0, 100.0).unwrap(), RangeFit::Acceptable);
        assert_eq!(classify_range(Some(0.0), 0.0, 100.0).unwrap(), RangeFit::Acceptable);
        assert_eq!(classify_range(Some(-1.0), 0.0, 100.0).unwrap(), RangeFit::OutOfRange);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Moving toward the midpoint never lowers the score
            #[test]
            fn prop_closer_to_mid_scores_higher(
                min in -100.0f64..100.0,
                width in 0.1f64..100.0,
                a in -2.0f64..3.0,
                b in -2.0f64..3.0
            ) {
                let max = min + width;
                let mid = (min + max) / 2.0;
                let (near, far) = if (a - 0.5).abs() <= (b - 0.5).abs() { (a, b) } else { (b, a) };
                let near_score = score_range(Some(min + width * near), min, max).unwrap();
                let far_score = score_range(Some(min + width * far), min, max).unwrap();

                prop_assert!(near_score + 1e-9 >= far_score,
                    "{} (near {}) scored below {} (far); mid {}", near_score, near, far_score, mid);
            }
        }
    }
}
