//! Soil service: cached SoilGrids properties per location

use shared::{validate_coordinates, validate_soil_properties, GpsCoordinates, SoilProperties};
use sqlx::PgPool;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::soilgrids::SoilGridsClient;
use crate::services::cache::{CacheTable, Fetched, ResponseCache};

#[derive(Clone)]
pub struct SoilService {
    cache: ResponseCache,
    client: SoilGridsClient,
}

impl SoilService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            cache: ResponseCache::new(db, CacheTable::Soil, config.soil.cache_ttl_hours),
            client: SoilGridsClient::new(
                config.soil.api_url.clone(),
                Duration::from_secs(config.soil.timeout_secs),
            ),
        }
    }

    /// Topsoil properties at a point
    pub async fn get_properties(&self, coords: GpsCoordinates) -> AppResult<Fetched<SoilProperties>> {
        validate_coordinates(coords.latitude, coords.longitude).map_err(|msg| {
            AppError::Validation {
                field: "coordinates".to_string(),
                message: msg.to_string(),
            }
        })?;

        let fetched = self
            .cache
            .get_or_fetch(coords, || self.client.fetch_properties(coords))
            .await?;

        if let Err(msg) = validate_soil_properties(&fetched.data) {
            tracing::warn!(
                "Implausible soil data at {}: {}",
                coords.location_key(),
                msg
            );
        }

        Ok(fetched)
    }
}
