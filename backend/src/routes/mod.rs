//! Route definitions for the Mlimi Wanzeru advisory API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/locations", location_routes())
        .nest("/advisory", advisory_routes())
}

/// District and village lookup routes
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/districts", get(handlers::list_districts))
        .route(
            "/districts/:district_id/villages",
            get(handlers::list_district_villages),
        )
        .route("/villages/:village_id", get(handlers::get_village))
        .route("/reverse", get(handlers::reverse_geocode))
}

/// Crop catalog, planting calendar and suitability routes
fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route("/crops", get(handlers::list_crops))
        .route("/crops/:crop_id", get(handlers::get_crop))
        .route("/planting-calendar", get(handlers::get_planting_calendar))
        .route(
            "/planting-calendar/district/:district_id",
            get(handlers::get_district_planting_calendar),
        )
        .route("/crop-suitability", get(handlers::get_crop_suitability))
        .route(
            "/crop-suitability-map",
            get(handlers::get_crop_suitability_map),
        )
}
