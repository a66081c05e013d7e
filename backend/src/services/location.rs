//! Location service: districts, villages and reverse geocoding over PostGIS

use shared::{
    is_within_malawi, validate_coordinates, District, GpsCoordinates, Region, ResolvedLocation,
    Village,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Search radius for borrowing a surveyed village elevation (metres)
pub const ELEVATION_SEARCH_RADIUS_M: f64 = 10_000.0;

#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct DistrictRow {
    id: Uuid,
    name: String,
    region: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<DistrictRow> for District {
    type Error = AppError;

    fn try_from(row: DistrictRow) -> AppResult<Self> {
        let region = Region::parse(&row.region)
            .ok_or_else(|| AppError::Internal(format!("unknown region {}", row.region)))?;
        Ok(District {
            id: row.id,
            name: row.name,
            region,
            centroid: GpsCoordinates::new(row.latitude, row.longitude),
        })
    }
}

#[derive(Debug, FromRow)]
struct VillageRow {
    id: Uuid,
    district_id: Uuid,
    name: String,
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
}

impl From<VillageRow> for Village {
    fn from(row: VillageRow) -> Self {
        Village {
            id: row.id,
            district_id: row.district_id,
            name: row.name,
            location: GpsCoordinates::new(row.latitude, row.longitude),
            elevation: row.elevation,
        }
    }
}

#[derive(Debug, FromRow)]
struct NearestVillageRow {
    #[sqlx(flatten)]
    village: VillageRow,
    distance_km: f64,
}

impl LocationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All districts ordered by name
    pub async fn list_districts(&self) -> AppResult<Vec<District>> {
        let rows = sqlx::query_as::<_, DistrictRow>(
            r#"
            SELECT id, name, region, ST_Y(centroid) AS latitude, ST_X(centroid) AS longitude
            FROM districts
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(District::try_from).collect()
    }

    pub async fn get_district(&self, district_id: Uuid) -> AppResult<District> {
        let row = sqlx::query_as::<_, DistrictRow>(
            r#"
            SELECT id, name, region, ST_Y(centroid) AS latitude, ST_X(centroid) AS longitude
            FROM districts
            WHERE id = $1
            "#,
        )
        .bind(district_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("District".to_string()))?;

        District::try_from(row)
    }

    /// Villages of a district ordered by name
    pub async fn list_villages(&self, district_id: Uuid) -> AppResult<Vec<Village>> {
        // 404 for an unknown district rather than an empty list
        self.get_district(district_id).await?;

        let rows = sqlx::query_as::<_, VillageRow>(
            r#"
            SELECT id, district_id, name,
                   ST_Y(location) AS latitude, ST_X(location) AS longitude, elevation
            FROM villages
            WHERE district_id = $1
            ORDER BY name
            "#,
        )
        .bind(district_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Village::from).collect())
    }

    pub async fn get_village(&self, village_id: Uuid) -> AppResult<Village> {
        let row = sqlx::query_as::<_, VillageRow>(
            r#"
            SELECT id, district_id, name,
                   ST_Y(location) AS latitude, ST_X(location) AS longitude, elevation
            FROM villages
            WHERE id = $1
            "#,
        )
        .bind(village_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Village".to_string()))?;

        Ok(row.into())
    }

    /// Resolve a GPS point to its district and nearest village
    ///
    /// Points outside every district polygon resolve to the district with the closest
    /// centroid and are flagged approximate.
    pub async fn reverse_geocode(&self, coords: GpsCoordinates) -> AppResult<ResolvedLocation> {
        validate_coordinates(coords.latitude, coords.longitude).map_err(|msg| {
            AppError::Validation {
                field: "coordinates".to_string(),
                message: msg.to_string(),
            }
        })?;

        if !is_within_malawi(coords.latitude, coords.longitude) {
            tracing::warn!("Reverse geocoding {} outside Malawi", coords.location_key());
        }

        let containing = sqlx::query_as::<_, DistrictRow>(
            r#"
            SELECT id, name, region, ST_Y(centroid) AS latitude, ST_X(centroid) AS longitude
            FROM districts
            WHERE ST_Contains(boundary, ST_SetSRID(ST_MakePoint($2, $1), 4326))
            LIMIT 1
            "#,
        )
        .bind(coords.latitude)
        .bind(coords.longitude)
        .fetch_optional(&self.db)
        .await?;

        let (district_row, approximate) = match containing {
            Some(row) => (row, false),
            None => {
                let nearest = sqlx::query_as::<_, DistrictRow>(
                    r#"
                    SELECT id, name, region, ST_Y(centroid) AS latitude, ST_X(centroid) AS longitude
                    FROM districts
                    ORDER BY centroid <-> ST_SetSRID(ST_MakePoint($2, $1), 4326)
                    LIMIT 1
                    "#,
                )
                .bind(coords.latitude)
                .bind(coords.longitude)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("District".to_string()))?;

                tracing::warn!(
                    "No district contains {}; using nearest district {}",
                    coords.location_key(),
                    nearest.name
                );
                (nearest, true)
            }
        };

        let district = District::try_from(district_row)?;

        let nearest = sqlx::query_as::<_, NearestVillageRow>(
            r#"
            SELECT id, district_id, name,
                   ST_Y(location) AS latitude, ST_X(location) AS longitude, elevation,
                   ST_Distance(location::geography,
                               ST_SetSRID(ST_MakePoint($3, $2), 4326)::geography) / 1000.0
                       AS distance_km
            FROM villages
            WHERE district_id = $1
            ORDER BY location <-> ST_SetSRID(ST_MakePoint($3, $2), 4326)
            LIMIT 1
            "#,
        )
        .bind(district.id)
        .bind(coords.latitude)
        .bind(coords.longitude)
        .fetch_optional(&self.db)
        .await?;

        let (nearest_village, distance_km) = match nearest {
            Some(row) => (Some(Village::from(row.village)), Some(row.distance_km)),
            None => (None, None),
        };

        Ok(ResolvedLocation {
            district,
            nearest_village,
            distance_km,
            approximate,
        })
    }

    /// Elevation of the closest surveyed village within `ELEVATION_SEARCH_RADIUS_M`
    pub async fn nearest_elevation(&self, coords: GpsCoordinates) -> AppResult<Option<f64>> {
        let elevation = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT elevation
            FROM villages
            WHERE elevation IS NOT NULL
              AND ST_DWithin(location::geography,
                             ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography, $3)
            ORDER BY location <-> ST_SetSRID(ST_MakePoint($2, $1), 4326)
            LIMIT 1
            "#,
        )
        .bind(coords.latitude)
        .bind(coords.longitude)
        .bind(ELEVATION_SEARCH_RADIUS_M)
        .fetch_optional(&self.db)
        .await?;

        Ok(elevation)
    }
}
