//! Configuration management for the Mlimi Wanzeru advisory server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MW_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::analysis::{
    planting::PLANTING_WINDOW_DAYS,
    rainfall::{ONSET_THRESHOLD_FRACTION, REQUIRED_YEARS},
    PlantingSettings, RainfallSettings,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// NASA POWER weather API configuration
    pub weather: ExternalApiConfig,

    /// SoilGrids API configuration
    pub soil: ExternalApiConfig,

    /// Rainfall analysis and planting window tunables
    pub advisory: AdvisoryConfig,

    /// Suitability map limits
    pub grid: GridConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL (PostGIS enabled)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExternalApiConfig {
    /// API endpoint
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How long a cached response counts as fresh
    pub cache_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisoryConfig {
    pub onset_threshold_fraction: f64,
    pub planting_window_days: i64,
    pub required_years: usize,

    /// Stored planting windows older than this are recalculated
    pub planting_window_max_age_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    /// Default grid spacing in degrees
    pub default_resolution: Decimal,

    /// Largest grid a single request may ask for
    pub max_points: usize,

    /// Time budget for fetching grid site conditions
    pub deadline_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default(
                "weather.api_url",
                "https://power.larc.nasa.gov/api/temporal/daily/point",
            )?
            .set_default("weather.timeout_secs", 30)?
            .set_default("weather.cache_ttl_hours", 24)?
            .set_default(
                "soil.api_url",
                "https://rest.isric.org/soilgrids/v2.0/properties/query",
            )?
            .set_default("soil.timeout_secs", 30)?
            .set_default("soil.cache_ttl_hours", 24)?
            .set_default("advisory.onset_threshold_fraction", ONSET_THRESHOLD_FRACTION)?
            .set_default("advisory.planting_window_days", PLANTING_WINDOW_DAYS)?
            .set_default("advisory.required_years", REQUIRED_YEARS as i64)?
            .set_default("advisory.planting_window_max_age_days", 30)?
            .set_default("grid.default_resolution", "0.01")?
            .set_default("grid.max_points", 2500)?
            .set_default("grid.deadline_secs", 20)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MW_ prefix)
            .add_source(
                Environment::with_prefix("MW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.advisory.validate().map_err(ConfigError::Message)?;
        Ok(config)
    }
}

impl AdvisoryConfig {
    /// Reject tunables the analysis cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if !(self.onset_threshold_fraction > 0.0 && self.onset_threshold_fraction <= 1.0) {
            return Err(format!(
                "advisory.onset_threshold_fraction must be in (0, 1], got {}",
                self.onset_threshold_fraction
            ));
        }
        if self.planting_window_days <= 0 {
            return Err("advisory.planting_window_days must be positive".to_string());
        }
        if self.required_years == 0 {
            return Err("advisory.required_years must be positive".to_string());
        }
        Ok(())
    }

    pub fn rainfall_settings(&self) -> RainfallSettings {
        RainfallSettings {
            onset_threshold_fraction: self.onset_threshold_fraction,
            required_years: self.required_years,
        }
    }

    pub fn planting_settings(&self) -> PlantingSettings {
        PlantingSettings {
            window_days: self.planting_window_days,
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            onset_threshold_fraction: ONSET_THRESHOLD_FRACTION,
            planting_window_days: PLANTING_WINDOW_DAYS,
            required_years: REQUIRED_YEARS,
            planting_window_max_age_days: 30,
        }
    }
}
