//! Crop catalog service

use shared::{validate_crop_requirements, CropRequirements};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct CropService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct CropRow {
    id: Uuid,
    name: String,
    name_chichewa: String,
    scientific_name: String,
    min_ph: f64,
    max_ph: f64,
    min_clay_content: f64,
    max_clay_content: f64,
    min_organic_carbon: f64,
    min_rainfall: f64,
    max_rainfall: f64,
    min_temperature: f64,
    max_temperature: f64,
    min_elevation: f64,
    max_elevation: f64,
    growing_season_days: i32,
}

impl From<CropRow> for CropRequirements {
    fn from(row: CropRow) -> Self {
        CropRequirements {
            id: row.id,
            name: row.name,
            name_chichewa: row.name_chichewa,
            scientific_name: row.scientific_name,
            min_ph: row.min_ph,
            max_ph: row.max_ph,
            min_clay_content: row.min_clay_content,
            max_clay_content: row.max_clay_content,
            min_organic_carbon: row.min_organic_carbon,
            min_rainfall: row.min_rainfall,
            max_rainfall: row.max_rainfall,
            min_temperature: row.min_temperature,
            max_temperature: row.max_temperature,
            min_elevation: row.min_elevation,
            max_elevation: row.max_elevation,
            growing_season_days: row.growing_season_days,
        }
    }
}

const CROP_COLUMNS: &str = r#"
    id, name, name_chichewa, scientific_name,
    min_ph, max_ph, min_clay_content, max_clay_content, min_organic_carbon,
    min_rainfall, max_rainfall, min_temperature, max_temperature,
    min_elevation, max_elevation, growing_season_days
"#;

impl CropService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The whole catalog ordered by name
    pub async fn list_crops(&self) -> AppResult<Vec<CropRequirements>> {
        let sql = format!("SELECT {} FROM crops ORDER BY name", CROP_COLUMNS);
        let rows = sqlx::query_as::<_, CropRow>(&sql)
            .fetch_all(&self.db)
            .await?;

        let crops: Vec<CropRequirements> = rows.into_iter().map(CropRequirements::from).collect();
        for crop in &crops {
            validate_crop_requirements(crop)?;
        }
        Ok(crops)
    }

    pub async fn get_crop(&self, crop_id: Uuid) -> AppResult<CropRequirements> {
        let sql = format!("SELECT {} FROM crops WHERE id = $1", CROP_COLUMNS);
        let row = sqlx::query_as::<_, CropRow>(&sql)
            .bind(crop_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop".to_string()))?;

        let crop = CropRequirements::from(row);
        validate_crop_requirements(&crop)?;
        Ok(crop)
    }
}
