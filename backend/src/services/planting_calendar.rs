//! Planting calendar service
//!
//! Runs rainfall onset analysis on a village's weather history and stores the resulting
//! planting window. Stored windows are reused until they are older than the configured
//! maximum age.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use shared::analysis::{
    analyze_rainfall_with, calculate_planting_window_with, PlantingSettings, RainfallSettings,
};
use shared::{PlantingWindow, PlantingWindowEstimate, SeasonOnsetStatistics, Village};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{CropService, LocationService, WeatherService};

#[derive(Clone)]
pub struct PlantingCalendarService {
    db: PgPool,
    weather: WeatherService,
    locations: LocationService,
    crops: CropService,
    rainfall: RainfallSettings,
    planting: PlantingSettings,
    max_age_days: i64,
}

#[derive(Debug, FromRow)]
struct PlantingWindowRow {
    id: Uuid,
    village_id: Uuid,
    crop_id: Option<Uuid>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    confidence_level: f64,
    calculated_at: DateTime<Utc>,
    is_stale: bool,
}

impl From<PlantingWindowRow> for PlantingWindow {
    fn from(row: PlantingWindowRow) -> Self {
        PlantingWindow {
            id: row.id,
            village_id: row.village_id,
            crop_id: row.crop_id,
            start_date: row.start_date,
            end_date: row.end_date,
            confidence_level: row.confidence_level,
            calculated_at: row.calculated_at,
            is_stale: row.is_stale,
        }
    }
}

/// Planting window for one village of a district
#[derive(Debug, Clone, Serialize)]
pub struct VillagePlantingWindow {
    pub village_id: Uuid,
    pub village_name: String,
    pub window: PlantingWindow,
}

/// A village whose window could not be calculated
#[derive(Debug, Clone, Serialize)]
pub struct VillageFailure {
    pub village_id: Uuid,
    pub village_name: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistrictPlantingCalendar {
    pub district_id: Uuid,
    pub district_name: String,
    pub windows: Vec<VillagePlantingWindow>,
    pub failures: Vec<VillageFailure>,
}

impl PlantingCalendarService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            weather: WeatherService::new(db.clone(), config),
            locations: LocationService::new(db.clone()),
            crops: CropService::new(db.clone()),
            rainfall: config.advisory.rainfall_settings(),
            planting: config.advisory.planting_settings(),
            max_age_days: config.advisory.planting_window_max_age_days,
            db,
        }
    }

    /// Planting window for a village, recalculated when missing, old, or `force_refresh`
    pub async fn get_planting_window_for_village(
        &self,
        village_id: Uuid,
        crop_id: Option<Uuid>,
        force_refresh: bool,
    ) -> AppResult<PlantingWindow> {
        let village = self.locations.get_village(village_id).await?;
        if let Some(crop_id) = crop_id {
            self.crops.get_crop(crop_id).await?;
        }

        if !force_refresh {
            if let Some(window) = self.get_recent_window(village_id, crop_id).await? {
                tracing::info!("Using stored planting window for village {}", village.name);
                return Ok(window);
            }
        }

        self.calculate_and_store(&village, crop_id).await
    }

    /// Planting windows for every village of a district
    ///
    /// A village that fails is reported in `failures` instead of aborting the batch.
    pub async fn get_planting_windows_for_district(
        &self,
        district_id: Uuid,
        crop_id: Option<Uuid>,
    ) -> AppResult<DistrictPlantingCalendar> {
        let district = self.locations.get_district(district_id).await?;
        let villages = self.locations.list_villages(district_id).await?;

        let mut windows = Vec::with_capacity(villages.len());
        let mut failures = Vec::new();

        for village in villages {
            match self
                .get_planting_window_for_village(village.id, crop_id, false)
                .await
            {
                Ok(window) => windows.push(VillagePlantingWindow {
                    village_id: village.id,
                    village_name: village.name,
                    window,
                }),
                Err(e) => {
                    tracing::error!(
                        "Planting window for village {} failed: {}",
                        village.name,
                        e
                    );
                    failures.push(VillageFailure {
                        village_id: village.id,
                        village_name: village.name,
                        code: e.code(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(DistrictPlantingCalendar {
            district_id: district.id,
            district_name: district.name,
            windows,
            failures,
        })
    }

    async fn calculate_and_store(
        &self,
        village: &Village,
        crop_id: Option<Uuid>,
    ) -> AppResult<PlantingWindow> {
        let series = self.weather.get_rainfall_series(village.location).await?;
        let stats = analyze_rainfall_with(&series.data, &self.rainfall)?;
        log_data_quality(village, &stats);

        let target_year = Utc::now().year();
        let estimate = calculate_planting_window_with(&stats, target_year, &self.planting)?;

        tracing::info!(
            "Calculated planting window for {}: {} to {} (confidence {:.2})",
            village.name,
            estimate.start_date,
            estimate.end_date,
            estimate.confidence_level
        );

        self.store_window(village.id, crop_id, &estimate, &stats, series.is_stale)
            .await
    }

    async fn get_recent_window(
        &self,
        village_id: Uuid,
        crop_id: Option<Uuid>,
    ) -> AppResult<Option<PlantingWindow>> {
        let row = sqlx::query_as::<_, PlantingWindowRow>(
            r#"
            SELECT id, village_id, crop_id, start_date, end_date, confidence_level,
                   calculated_at, is_stale
            FROM planting_windows
            WHERE village_id = $1
              AND crop_id IS NOT DISTINCT FROM $2
              AND calculated_at > NOW() - make_interval(days => $3)
            "#,
        )
        .bind(village_id)
        .bind(crop_id)
        .bind(self.max_age_days as i32)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(PlantingWindow::from))
    }

    async fn store_window(
        &self,
        village_id: Uuid,
        crop_id: Option<Uuid>,
        estimate: &PlantingWindowEstimate,
        stats: &SeasonOnsetStatistics,
        is_stale: bool,
    ) -> AppResult<PlantingWindow> {
        let row = sqlx::query_as::<_, PlantingWindowRow>(
            r#"
            INSERT INTO planting_windows (
                village_id, crop_id, start_date, end_date, confidence_level,
                mean_onset_day, coefficient_of_variation, years_analyzed,
                is_stale, calculated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT ON CONSTRAINT planting_windows_village_crop_key DO UPDATE
            SET start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                confidence_level = EXCLUDED.confidence_level,
                mean_onset_day = EXCLUDED.mean_onset_day,
                coefficient_of_variation = EXCLUDED.coefficient_of_variation,
                years_analyzed = EXCLUDED.years_analyzed,
                is_stale = EXCLUDED.is_stale,
                calculated_at = EXCLUDED.calculated_at
            RETURNING id, village_id, crop_id, start_date, end_date, confidence_level,
                      calculated_at, is_stale
            "#,
        )
        .bind(village_id)
        .bind(crop_id)
        .bind(estimate.start_date)
        .bind(estimate.end_date)
        .bind(estimate.confidence_level)
        .bind(stats.mean_onset_day)
        .bind(stats.coefficient_of_variation)
        .bind(stats.years_analyzed as i32)
        .bind(is_stale)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}

fn log_data_quality(village: &Village, stats: &SeasonOnsetStatistics) {
    if !stats.dry_years.is_empty() {
        tracing::warn!(
            "Village {}: years with no recorded rainfall excluded: {:?}",
            village.name,
            stats.dry_years
        );
    }
    if stats.missing_observations > 0 {
        tracing::warn!(
            "Village {}: {} missing precipitation readings skipped",
            village.name,
            stats.missing_observations
        );
    }
}
