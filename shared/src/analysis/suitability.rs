//! Multi-factor crop suitability scoring
//!
//! Soil, elevation and (optionally) climate sub-scores are each built from range scores
//! and combined with fixed weights into an overall 0-100 score.

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::models::{
    ClimateProperties, CropRequirements, FactorAssessment, RangeFit, SoilProperties,
    SuitabilityFactor, SuitabilityScore,
};

use super::range::{score_field, MAX_SCORE};

// Soil sub-score weights
pub const PH_WEIGHT: f64 = 0.40;
pub const CLAY_WEIGHT: f64 = 0.35;
pub const ORGANIC_CARBON_WEIGHT: f64 = 0.25;

// Climate sub-score weights
pub const RAINFALL_WEIGHT: f64 = 0.60;
pub const TEMPERATURE_WEIGHT: f64 = 0.40;

// Overall weights when climate data is supplied
pub const SOIL_WEIGHT_WITH_CLIMATE: f64 = 0.40;
pub const ELEVATION_WEIGHT_WITH_CLIMATE: f64 = 0.30;
pub const CLIMATE_WEIGHT: f64 = 0.30;

// Overall weights without climate data
pub const SOIL_WEIGHT: f64 = 0.60;
pub const ELEVATION_WEIGHT: f64 = 0.40;

/// Elevation substituted when none is known (sea level)
///
/// Malawi farmland sits well above sea level, so the default pulls elevation scores down.
/// Callers see this through `SuitabilityScore::elevation_defaulted`.
pub const DEFAULT_ELEVATION_M: f64 = 0.0;

/// Score one crop against one site
pub fn score_crop(
    crop: &CropRequirements,
    soil: &SoilProperties,
    elevation: Option<f64>,
    climate: Option<&ClimateProperties>,
) -> AdvisoryResult<SuitabilityScore> {
    let mut factors = Vec::with_capacity(6);

    let ph = assess(
        &mut factors,
        SuitabilityFactor::SoilPh,
        "ph_level",
        soil.ph_level,
        crop.min_ph,
        crop.max_ph,
    )?;
    let clay = assess(
        &mut factors,
        SuitabilityFactor::ClayContent,
        "clay_content",
        soil.clay_content,
        crop.min_clay_content,
        crop.max_clay_content,
    )?;
    let carbon = organic_carbon_score(soil.organic_carbon, crop.min_organic_carbon)?;
    factors.push(FactorAssessment {
        factor: SuitabilityFactor::OrganicCarbon,
        measured: soil.organic_carbon,
        min_acceptable: crop.min_organic_carbon,
        max_acceptable: None,
        score: carbon.0,
        fit: carbon.1,
    });

    let soil_score = PH_WEIGHT * ph + CLAY_WEIGHT * clay + ORGANIC_CARBON_WEIGHT * carbon.0;

    let known_elevation = elevation.filter(|e| e.is_finite());
    let elevation_score = assess(
        &mut factors,
        SuitabilityFactor::Elevation,
        "elevation",
        known_elevation.unwrap_or(DEFAULT_ELEVATION_M),
        crop.min_elevation,
        crop.max_elevation,
    )?;

    let climate_score = match climate {
        Some(climate) => {
            let rainfall = assess(
                &mut factors,
                SuitabilityFactor::Rainfall,
                "annual_rainfall_mm",
                climate.annual_rainfall_mm,
                crop.min_rainfall,
                crop.max_rainfall,
            )?;
            let temperature = assess(
                &mut factors,
                SuitabilityFactor::Temperature,
                "mean_temperature_c",
                climate.mean_temperature_c,
                crop.min_temperature,
                crop.max_temperature,
            )?;
            Some(RAINFALL_WEIGHT * rainfall + TEMPERATURE_WEIGHT * temperature)
        }
        None => None,
    };

    let overall = match climate_score {
        Some(climate_score) => {
            SOIL_WEIGHT_WITH_CLIMATE * soil_score
                + ELEVATION_WEIGHT_WITH_CLIMATE * elevation_score
                + CLIMATE_WEIGHT * climate_score
        }
        None => SOIL_WEIGHT * soil_score + ELEVATION_WEIGHT * elevation_score,
    };

    Ok(SuitabilityScore {
        crop_id: crop.id,
        crop_name: crop.name.clone(),
        overall_score: overall.clamp(0.0, MAX_SCORE),
        soil_score,
        elevation_score,
        climate_score,
        elevation_defaulted: known_elevation.is_none(),
        factors,
    })
}

/// Range-score a factor and record it in the breakdown
fn assess(
    factors: &mut Vec<FactorAssessment>,
    factor: SuitabilityFactor,
    field: &str,
    measured: f64,
    min: f64,
    max: f64,
) -> AdvisoryResult<f64> {
    let (score, fit) = score_field(field, Some(measured), min, max)?;
    factors.push(FactorAssessment {
        factor,
        measured,
        min_acceptable: min,
        max_acceptable: Some(max),
        score,
        fit,
    });
    Ok(score)
}

/// One-sided organic carbon check: full marks at or above the minimum,
/// scaled linearly down to 0 at no carbon
pub fn organic_carbon_score(measured: f64, min_required: f64) -> AdvisoryResult<(f64, RangeFit)> {
    if !min_required.is_finite() {
        return Err(AdvisoryError::InvalidRange {
            field: "organic_carbon".to_string(),
            min: min_required,
            max: f64::INFINITY,
        });
    }
    if !measured.is_finite() {
        return Err(AdvisoryError::MissingInput("organic_carbon".to_string()));
    }

    if min_required <= 0.0 || measured >= min_required {
        return Ok((MAX_SCORE, RangeFit::Optimal));
    }

    let score = (MAX_SCORE * measured / min_required).clamp(0.0, MAX_SCORE);
    Ok((score, RangeFit::OutOfRange))
}
