//! Crop suitability models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a measured value falls relative to a requirement range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RangeFit {
    /// Inside the central optimal band
    Optimal,
    /// Inside the acceptable range but outside the optimal band
    Acceptable,
    /// Outside the acceptable range
    OutOfRange,
}

impl std::fmt::Display for RangeFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeFit::Optimal => write!(f, "Optimal"),
            RangeFit::Acceptable => write!(f, "Acceptable"),
            RangeFit::OutOfRange => write!(f, "Out of range"),
        }
    }
}

/// Suitability factor scored against a crop requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityFactor {
    SoilPh,
    ClayContent,
    OrganicCarbon,
    Elevation,
    Rainfall,
    Temperature,
}

/// Per-factor breakdown of a suitability score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorAssessment {
    pub factor: SuitabilityFactor,
    pub measured: f64,
    pub min_acceptable: f64,
    /// `None` for one-sided requirements (organic carbon)
    pub max_acceptable: Option<f64>,
    pub score: f64,
    pub fit: RangeFit,
}

/// Suitability of one crop at one site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityScore {
    pub crop_id: Uuid,
    pub crop_name: String,
    /// Weighted overall score, 0-100
    pub overall_score: f64,
    pub soil_score: f64,
    pub elevation_score: f64,
    pub climate_score: Option<f64>,
    /// Elevation was unavailable and the default was substituted
    pub elevation_defaulted: bool,
    pub factors: Vec<FactorAssessment>,
}

/// Node of a suitability grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridNode {
    pub lat: Decimal,
    pub lon: Decimal,
}

/// Scored grid node for map rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityGridPoint {
    pub lat: f64,
    pub lon: f64,
    pub suitability_score: f64,
}

/// Grid of suitability scores, row-major (latitude, then longitude)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityGrid {
    pub points: Vec<SuitabilityGridPoint>,
    /// Nodes visited without site conditions
    pub skipped: Vec<GridNode>,
    pub expected_points: usize,
    /// False when the caller stopped the walk before the last node
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&RangeFit::OutOfRange).unwrap(),
            "\"out_of_range\""
        );
        assert_eq!(
            serde_json::to_string(&SuitabilityFactor::SoilPh).unwrap(),
            "\"soil_ph\""
        );
    }

    #[test]
    fn test_grid_node_decimals_serialize_as_strings() {
        let node = GridNode {
            lat: Decimal::new(-1399, 2),
            lon: Decimal::new(3370, 2),
        };
        let value = serde_json::to_value(node).unwrap();
        assert_eq!(value["lat"], "-13.99");
        assert_eq!(value["lon"], "33.70");
    }
}
