//! Crop suitability service: ranked crops per village and suitability maps

use rust_decimal::Decimal;
use serde::Serialize;
use shared::analysis::{
    expected_grid_points, generate_suitability_grid, grid_nodes, rank_crops, to_degrees,
};
use shared::{
    ClimateProperties, GpsCoordinates, GridBounds, SiteConditions, SoilProperties,
    SuitabilityGrid, SuitabilityScore,
};
use sqlx::PgPool;
use std::ops::ControlFlow;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::{Config, GridConfig};
use crate::error::{AppError, AppResult};
use crate::services::{CropService, LocationService, SoilService, WeatherService};

#[derive(Clone)]
pub struct CropSuitabilityService {
    soil: SoilService,
    weather: WeatherService,
    locations: LocationService,
    crops: CropService,
    grid: GridConfig,
}

/// Ranked crops for a village with the site data they were scored against
#[derive(Debug, Clone, Serialize)]
pub struct CropSuitabilityReport {
    pub village_id: Uuid,
    pub village_name: String,
    pub soil: SoilProperties,
    pub elevation: Option<f64>,
    pub climate: Option<ClimateProperties>,
    /// Some input came from an expired cache entry
    pub is_stale: bool,
    pub crops: Vec<SuitabilityScore>,
}

/// Suitability map response
#[derive(Debug, Clone, Serialize)]
pub struct SuitabilityMap {
    pub crop_id: Uuid,
    pub crop_name: String,
    pub bounds: GridBounds,
    pub resolution: Decimal,
    #[serde(flatten)]
    pub grid: SuitabilityGrid,
}

impl CropSuitabilityService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            soil: SoilService::new(db.clone(), config),
            weather: WeatherService::new(db.clone(), config),
            locations: LocationService::new(db.clone()),
            crops: CropService::new(db),
            grid: config.grid.clone(),
        }
    }

    /// Score every catalog crop at a village, best first
    pub async fn rank_for_village(&self, village_id: Uuid) -> AppResult<CropSuitabilityReport> {
        let village = self.locations.get_village(village_id).await?;
        let soil = self.soil.get_properties(village.location).await?;

        if village.elevation.is_none() {
            tracing::warn!(
                "No elevation for village {}; scoring with the sea-level default",
                village.name
            );
        }

        // Climate is optional: without it the scorer uses soil and elevation weights only
        let (climate, weather_stale) = match self.weather.get_history(village.location).await {
            Ok(history) => (ClimateProperties::from_history(&history.data), history.is_stale),
            Err(e) => {
                tracing::warn!(
                    "Weather unavailable for village {}, scoring without climate: {}",
                    village.name,
                    e
                );
                (None, false)
            }
        };

        let crops = self.crops.list_crops().await?;
        let ranked = rank_crops(&crops, &soil.data, village.elevation, climate.as_ref())?;

        tracing::info!(
            "Ranked {} crops for village {}",
            ranked.len(),
            village.name
        );

        Ok(CropSuitabilityReport {
            village_id: village.id,
            village_name: village.name,
            soil: soil.data,
            elevation: village.elevation,
            climate,
            is_stale: soil.is_stale || weather_stale,
            crops: ranked,
        })
    }

    /// Suitability grid for one crop over a bounding box
    ///
    /// Site conditions are fetched node by node until the configured deadline. A node whose
    /// soil or elevation lookup fails is skipped; nodes past the deadline are left out and
    /// the grid is marked incomplete.
    pub async fn suitability_map(
        &self,
        crop_id: Uuid,
        bounds: GridBounds,
        resolution: Option<Decimal>,
    ) -> AppResult<SuitabilityMap> {
        let resolution = resolution.unwrap_or(self.grid.default_resolution);
        let crop = self.crops.get_crop(crop_id).await?;

        let requested = expected_grid_points(&bounds, resolution)?;
        if requested > self.grid.max_points {
            return Err(AppError::GridTooLarge {
                requested,
                limit: self.grid.max_points,
            });
        }

        let deadline = Instant::now() + Duration::from_secs(self.grid.deadline_secs);
        let mut visited = Vec::with_capacity(requested);

        for node in grid_nodes(&bounds, resolution)? {
            if Instant::now() >= deadline {
                tracing::warn!(
                    "Suitability map deadline reached after {} of {} points",
                    visited.len(),
                    requested
                );
                break;
            }

            let coords = GpsCoordinates::new(to_degrees(node.lat)?, to_degrees(node.lon)?);
            visited.push(self.site_conditions(coords).await);
        }

        let mut visited = visited.into_iter();
        let grid = generate_suitability_grid(&crop, &bounds, resolution, |_| {
            visited.next().map_or(ControlFlow::Break(()), ControlFlow::Continue)
        })?;

        if !grid.skipped.is_empty() {
            tracing::warn!(
                "Suitability map for {} skipped {} points without site data",
                crop.name,
                grid.skipped.len()
            );
        }
        if !grid.complete {
            tracing::warn!(
                "Returning partial suitability map for {}: {} of {} points",
                crop.name,
                grid.points.len(),
                grid.expected_points
            );
        }

        Ok(SuitabilityMap {
            crop_id: crop.id,
            crop_name: crop.name,
            bounds,
            resolution,
            grid,
        })
    }

    /// Soil and elevation at one grid node; `None` when either lookup fails
    async fn site_conditions(&self, coords: GpsCoordinates) -> Option<SiteConditions> {
        let soil = match self.soil.get_properties(coords).await {
            Ok(soil) => soil.data,
            Err(e) => {
                tracing::warn!("Skipping grid point {}: {}", coords.location_key(), e);
                return None;
            }
        };
        let elevation = match self.locations.nearest_elevation(coords).await {
            Ok(elevation) => elevation,
            Err(e) => {
                tracing::warn!(
                    "Skipping grid point {}, elevation lookup failed: {}",
                    coords.location_key(),
                    e
                );
                return None;
            }
        };

        Some(SiteConditions {
            soil,
            elevation,
            climate: None,
        })
    }
}
