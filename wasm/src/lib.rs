//! WebAssembly module for Mlimi Wanzeru
//!
//! Provides client-side computation for:
//! - Range scoring of soil and climate measurements
//! - Crop suitability scoring and ranking
//! - Rainfall onset analysis and planting windows for offline use
//!
//! Structured inputs and outputs cross the boundary as JSON strings.

use serde::Deserialize;
use shared::analysis::{
    analyze_rainfall, calculate_planting_window, rank_crops, score_crop, score_range,
};
use shared::{
    ClimateProperties, CropRequirements, RainfallSeries, SeasonOnsetStatistics, SoilProperties,
    SuitabilityScore,
};
use wasm_bindgen::prelude::*;

/// One crop scored against one site
#[derive(Debug, Deserialize)]
struct SuitabilityInput {
    crop: CropRequirements,
    soil: SoilProperties,
    #[serde(default)]
    elevation: Option<f64>,
    #[serde(default)]
    climate: Option<ClimateProperties>,
}

/// A catalog of crops ranked for one site
#[derive(Debug, Deserialize)]
struct RankingInput {
    crops: Vec<CropRequirements>,
    soil: SoilProperties,
    #[serde(default)]
    elevation: Option<f64>,
    #[serde(default)]
    climate: Option<ClimateProperties>,
}

/// Score a measurement against an acceptable range (0-100)
#[wasm_bindgen]
pub fn score_value_in_range(value: Option<f64>, min: f64, max: f64) -> Result<f64, JsValue> {
    score_range(value, min, max).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Suitability of one crop at one site
#[wasm_bindgen]
pub fn calculate_crop_suitability(input_json: &str) -> Result<String, JsValue> {
    let score = crop_suitability(input_json).map_err(|e| JsValue::from_str(&e))?;
    if score.elevation_defaulted {
        warn(&format!(
            "No elevation given for {}; scored at sea level",
            score.crop_name
        ));
    }
    to_json(&score).map_err(|e| JsValue::from_str(&e))
}

/// Every crop of a catalog scored at one site, best first
#[wasm_bindgen]
pub fn rank_crops_json(input_json: &str) -> Result<String, JsValue> {
    let ranked = ranked_crops(input_json).map_err(|e| JsValue::from_str(&e))?;
    if ranked.first().is_some_and(|s| s.elevation_defaulted) {
        warn("No elevation given; crops scored at sea level");
    }
    to_json(&ranked).map_err(|e| JsValue::from_str(&e))
}

/// Onset statistics for a rainfall series
#[wasm_bindgen]
pub fn analyze_rainfall_json(series_json: &str) -> Result<String, JsValue> {
    rainfall_statistics(series_json).map_err(|e| JsValue::from_str(&e))
}

/// Planting window for the current year, as read from the browser clock
#[wasm_bindgen]
pub fn planting_window_json(stats_json: &str) -> Result<String, JsValue> {
    let year = js_sys::Date::new_0().get_full_year() as i32;
    planting_window_for_year(stats_json, year).map_err(|e| JsValue::from_str(&e))
}

fn crop_suitability(input_json: &str) -> Result<SuitabilityScore, String> {
    let input: SuitabilityInput = serde_json::from_str(input_json)
        .map_err(|e| format!("Invalid suitability input JSON: {}", e))?;

    score_crop(
        &input.crop,
        &input.soil,
        input.elevation,
        input.climate.as_ref(),
    )
    .map_err(|e| e.to_string())
}

fn ranked_crops(input_json: &str) -> Result<Vec<SuitabilityScore>, String> {
    let input: RankingInput = serde_json::from_str(input_json)
        .map_err(|e| format!("Invalid ranking input JSON: {}", e))?;

    rank_crops(
        &input.crops,
        &input.soil,
        input.elevation,
        input.climate.as_ref(),
    )
    .map_err(|e| e.to_string())
}

fn rainfall_statistics(series_json: &str) -> Result<String, String> {
    let series: RainfallSeries = serde_json::from_str(series_json)
        .map_err(|e| format!("Invalid rainfall series JSON: {}", e))?;

    let stats = analyze_rainfall(&series).map_err(|e| e.to_string())?;
    to_json(&stats)
}

fn planting_window_for_year(stats_json: &str, year: i32) -> Result<String, String> {
    let stats: SeasonOnsetStatistics = serde_json::from_str(stats_json)
        .map_err(|e| format!("Invalid onset statistics JSON: {}", e))?;

    let window = calculate_planting_window(&stats, year).map_err(|e| e.to_string())?;
    to_json(&window)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
