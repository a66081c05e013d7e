//! Administrative location models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GpsCoordinates;

/// Malawi administrative region
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Northern,
    Central,
    Southern,
}

impl Region {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "northern" => Some(Region::Northern),
            "central" => Some(Region::Central),
            "southern" => Some(Region::Southern),
            _ => None,
        }
    }
}

/// District with its centroid; the boundary polygon stays in the database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct District {
    pub id: Uuid,
    pub name: String,
    pub region: Region,
    pub centroid: GpsCoordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Village {
    pub id: Uuid,
    pub district_id: Uuid,
    pub name: String,
    pub location: GpsCoordinates,
    /// Metres above sea level, when surveyed
    pub elevation: Option<f64>,
}

/// Result of resolving a GPS point to the administrative hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedLocation {
    pub district: District,
    pub nearest_village: Option<Village>,
    /// Distance to the nearest village in kilometres
    pub distance_km: Option<f64>,
    /// No district polygon contained the point; the closest centroid was used
    pub approximate: bool,
}
