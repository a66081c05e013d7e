//! Validation utilities for the Mlimi Wanzeru advisory platform

use crate::analysis::range::validate_range;
use crate::error::AdvisoryResult;
use crate::models::{CropRequirements, SoilProperties};

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Validate WGS84 latitude/longitude
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Rough bounding box of Malawi, used to flag points far outside the service area
pub const MALAWI_BOUNDS: (f64, f64, f64, f64) = (-17.2, 32.6, -9.3, 36.0);

/// Check whether a point lies within Malawi's bounding box
pub fn is_within_malawi(latitude: f64, longitude: f64) -> bool {
    let (min_lat, min_lon, max_lat, max_lon) = MALAWI_BOUNDS;
    (min_lat..=max_lat).contains(&latitude) && (min_lon..=max_lon).contains(&longitude)
}

// ============================================================================
// Crop Catalog Validations
// ============================================================================

/// Validate every requirement range of a crop record
pub fn validate_crop_requirements(crop: &CropRequirements) -> AdvisoryResult<()> {
    validate_range("ph_level", crop.min_ph, crop.max_ph)?;
    validate_range("clay_content", crop.min_clay_content, crop.max_clay_content)?;
    validate_range("annual_rainfall_mm", crop.min_rainfall, crop.max_rainfall)?;
    validate_range("mean_temperature_c", crop.min_temperature, crop.max_temperature)?;
    validate_range("elevation", crop.min_elevation, crop.max_elevation)?;
    Ok(())
}

// ============================================================================
// Soil Validations
// ============================================================================

/// Validate soil measurements are physically plausible
pub fn validate_soil_properties(soil: &SoilProperties) -> Result<(), &'static str> {
    if !(0.0..=14.0).contains(&soil.ph_level) {
        return Err("Soil pH must be between 0 and 14");
    }
    if !(0.0..=100.0).contains(&soil.clay_content) || !(0.0..=100.0).contains(&soil.sand_content)
    {
        return Err("Soil texture fractions must be between 0 and 100%");
    }
    if soil.clay_content + soil.sand_content > 100.0 {
        return Err("Clay and sand fractions cannot exceed 100% combined");
    }
    if soil.organic_carbon < 0.0 {
        return Err("Organic carbon cannot be negative");
    }
    Ok(())
}
