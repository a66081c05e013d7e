//! Weather service: cached NASA POWER history per location

use chrono::Utc;
use shared::{validate_coordinates, GpsCoordinates, RainfallSeries, WeatherHistory};
use sqlx::PgPool;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::nasa_power::{default_year_range, NasaPowerClient};
use crate::services::cache::{CacheTable, Fetched, ResponseCache};

/// Weather service for historical daily weather
#[derive(Clone)]
pub struct WeatherService {
    cache: ResponseCache,
    client: NasaPowerClient,
    years: usize,
}

impl WeatherService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            cache: ResponseCache::new(db, CacheTable::Weather, config.weather.cache_ttl_hours),
            client: NasaPowerClient::new(
                config.weather.api_url.clone(),
                Duration::from_secs(config.weather.timeout_secs),
            ),
            years: config.advisory.required_years,
        }
    }

    /// Daily weather for the last `required_years` complete years
    pub async fn get_history(&self, coords: GpsCoordinates) -> AppResult<Fetched<WeatherHistory>> {
        validate_coordinates(coords.latitude, coords.longitude).map_err(|msg| {
            AppError::Validation {
                field: "coordinates".to_string(),
                message: msg.to_string(),
            }
        })?;

        let (start_year, end_year) = default_year_range(Utc::now().date_naive(), self.years);
        self.cache
            .get_or_fetch(coords, || self.client.fetch_daily(coords, start_year, end_year))
            .await
    }

    /// Precipitation readings for rainfall analysis
    pub async fn get_rainfall_series(
        &self,
        coords: GpsCoordinates,
    ) -> AppResult<Fetched<RainfallSeries>> {
        let history = self.get_history(coords).await?;
        Ok(history.map(|h| RainfallSeries::from_history(&h)))
    }
}
