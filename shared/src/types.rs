//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates (WGS84 degrees)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Cache key rounded to two decimal places, e.g. `-13.98_33.78`
    pub fn location_key(&self) -> String {
        format!("{:.2}_{:.2}", self.latitude, self.longitude)
    }
}

/// Bounding box for suitability grids
///
/// Decimal degrees keep grid stepping exact, so the node count is always
/// `ceil(span / resolution)` per axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridBounds {
    pub min_lat: Decimal,
    pub max_lat: Decimal,
    pub min_lon: Decimal,
    pub max_lon: Decimal,
}

impl GridBounds {
    pub fn new(min_lat: Decimal, max_lat: Decimal, min_lon: Decimal, max_lon: Decimal) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Parse `min_lat,min_lon,max_lat,max_lon`
    pub fn parse(bbox: &str) -> Result<Self, &'static str> {
        let parts: Vec<&str> = bbox.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err("Bounds must have 4 values: min_lat,min_lon,max_lat,max_lon");
        }

        let mut values = [Decimal::ZERO; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<Decimal>()
                .map_err(|_| "Bounds values must be decimal numbers")?;
        }

        Ok(Self {
            min_lat: values[0],
            min_lon: values[1],
            max_lat: values[2],
            max_lon: values[3],
        })
    }
}
