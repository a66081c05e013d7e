//! HTTP handlers for advisory endpoints: crop catalog, planting calendar, crop suitability

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{CropRequirements, GridBounds, PlantingWindow};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::crop_suitability::{CropSuitabilityReport, SuitabilityMap};
use crate::services::planting_calendar::DistrictPlantingCalendar;
use crate::services::{CropService, CropSuitabilityService, PlantingCalendarService};
use crate::AppState;

/// List the crop catalog
pub async fn list_crops(State(state): State<AppState>) -> AppResult<Json<Vec<CropRequirements>>> {
    let service = CropService::new(state.db);
    let crops = service.list_crops().await?;
    Ok(Json(crops))
}

/// Get a crop by ID
pub async fn get_crop(
    State(state): State<AppState>,
    Path(crop_id): Path<Uuid>,
) -> AppResult<Json<CropRequirements>> {
    let service = CropService::new(state.db);
    let crop = service.get_crop(crop_id).await?;
    Ok(Json(crop))
}

/// Query parameters for a village planting calendar
#[derive(Debug, Deserialize)]
pub struct PlantingCalendarQuery {
    /// Village ID
    pub location: Uuid,
    pub crop: Option<Uuid>,
    pub force_refresh: Option<bool>,
}

/// Get the planting window for a village
pub async fn get_planting_calendar(
    State(state): State<AppState>,
    Query(query): Query<PlantingCalendarQuery>,
) -> AppResult<Json<PlantingWindow>> {
    let service = PlantingCalendarService::new(state.db, &state.config);
    let window = service
        .get_planting_window_for_village(
            query.location,
            query.crop,
            query.force_refresh.unwrap_or(false),
        )
        .await?;
    Ok(Json(window))
}

/// Query parameters for a district planting calendar
#[derive(Debug, Deserialize)]
pub struct DistrictCalendarQuery {
    pub crop: Option<Uuid>,
}

/// Get planting windows for every village of a district
pub async fn get_district_planting_calendar(
    State(state): State<AppState>,
    Path(district_id): Path<Uuid>,
    Query(query): Query<DistrictCalendarQuery>,
) -> AppResult<Json<DistrictPlantingCalendar>> {
    let service = PlantingCalendarService::new(state.db, &state.config);
    let calendar = service
        .get_planting_windows_for_district(district_id, query.crop)
        .await?;
    Ok(Json(calendar))
}

/// Query parameters for crop suitability
#[derive(Debug, Deserialize)]
pub struct CropSuitabilityQuery {
    /// Village ID
    pub location: Uuid,
}

/// Rank all crops for a village
pub async fn get_crop_suitability(
    State(state): State<AppState>,
    Query(query): Query<CropSuitabilityQuery>,
) -> AppResult<Json<CropSuitabilityReport>> {
    let service = CropSuitabilityService::new(state.db, &state.config);
    let report = service.rank_for_village(query.location).await?;
    Ok(Json(report))
}

/// Query parameters for a suitability map
#[derive(Debug, Deserialize)]
pub struct SuitabilityMapQuery {
    pub crop: Uuid,
    /// `min_lat,min_lon,max_lat,max_lon`
    pub bounds: String,
    pub resolution: Option<Decimal>,
}

/// Suitability grid for one crop over a bounding box
pub async fn get_crop_suitability_map(
    State(state): State<AppState>,
    Query(query): Query<SuitabilityMapQuery>,
) -> AppResult<Json<SuitabilityMap>> {
    let bounds = GridBounds::parse(&query.bounds).map_err(|msg| AppError::Validation {
        field: "bounds".to_string(),
        message: msg.to_string(),
    })?;

    let service = CropSuitabilityService::new(state.db, &state.config);
    let map = service
        .suitability_map(query.crop, bounds, query.resolution)
        .await?;
    Ok(Json(map))
}
