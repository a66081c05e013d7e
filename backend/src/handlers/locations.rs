//! HTTP handlers for location lookup endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{District, GpsCoordinates, ResolvedLocation, Village};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::services::LocationService;
use crate::AppState;

/// List all districts
pub async fn list_districts(State(state): State<AppState>) -> AppResult<Json<Vec<District>>> {
    let service = LocationService::new(state.db);
    let districts = service.list_districts().await?;
    Ok(Json(districts))
}

/// List the villages of a district
pub async fn list_district_villages(
    State(state): State<AppState>,
    Path(district_id): Path<Uuid>,
) -> AppResult<Json<Vec<Village>>> {
    let service = LocationService::new(state.db);
    let villages = service.list_villages(district_id).await?;
    Ok(Json(villages))
}

/// Get a village by ID
pub async fn get_village(
    State(state): State<AppState>,
    Path(village_id): Path<Uuid>,
) -> AppResult<Json<Village>> {
    let service = LocationService::new(state.db);
    let village = service.get_village(village_id).await?;
    Ok(Json(village))
}

/// Query parameters for reverse geocoding
#[derive(Debug, Deserialize, Validate)]
pub struct ReverseGeocodeQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lon: f64,
}

/// Resolve GPS coordinates to district and nearest village
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<ReverseGeocodeQuery>,
) -> AppResult<Json<ResolvedLocation>> {
    query.validate()?;

    let service = LocationService::new(state.db);
    let resolved = service
        .reverse_geocode(GpsCoordinates::new(query.lat, query.lon))
        .await?;
    Ok(Json(resolved))
}
