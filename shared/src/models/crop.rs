//! Crop catalog models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Growing requirements for a crop
///
/// Static reference data; the core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropRequirements {
    pub id: Uuid,
    pub name: String,
    pub name_chichewa: String,
    pub scientific_name: String,

    // Soil requirements
    pub min_ph: f64,
    pub max_ph: f64,
    /// Clay content (%)
    pub min_clay_content: f64,
    pub max_clay_content: f64,
    /// Soil organic carbon (g/kg)
    pub min_organic_carbon: f64,

    // Climate requirements
    /// Seasonal rainfall (mm)
    pub min_rainfall: f64,
    pub max_rainfall: f64,
    /// Mean temperature (°C)
    pub min_temperature: f64,
    pub max_temperature: f64,

    // Elevation requirements (m)
    pub min_elevation: f64,
    pub max_elevation: f64,

    pub growing_season_days: i32,
}
