//! Crop ranking for a site and suitability grids for map rendering

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::ops::ControlFlow;

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::models::{
    ClimateProperties, CropRequirements, GridNode, SiteConditions, SoilProperties,
    SuitabilityGrid, SuitabilityGridPoint, SuitabilityScore,
};
use crate::types::GridBounds;

use super::suitability::score_crop;

/// Default grid spacing in degrees (0.01)
pub const DEFAULT_GRID_RESOLUTION: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Score every crop for a site, best first
///
/// Equal scores are ordered by crop name so the ranking is deterministic.
pub fn rank_crops(
    crops: &[CropRequirements],
    soil: &SoilProperties,
    elevation: Option<f64>,
    climate: Option<&ClimateProperties>,
) -> AdvisoryResult<Vec<SuitabilityScore>> {
    if crops.is_empty() {
        return Err(AdvisoryError::NoCropsAvailable);
    }

    let mut scores = crops
        .iter()
        .map(|crop| score_crop(crop, soil, elevation, climate))
        .collect::<AdvisoryResult<Vec<_>>>()?;

    scores.sort_by(|a, b| {
        b.overall_score
            .total_cmp(&a.overall_score)
            .then_with(|| a.crop_name.cmp(&b.crop_name))
    });

    Ok(scores)
}

/// Number of nodes `grid_nodes` would produce, without allocating them
pub fn expected_grid_points(bounds: &GridBounds, resolution: Decimal) -> AdvisoryResult<usize> {
    let (rows, cols) = grid_shape(bounds, resolution)?;
    rows.checked_mul(cols)
        .ok_or_else(|| AdvisoryError::InvalidResolution("grid is too large".to_string()))
}

/// Grid nodes in row-major order (latitude, then longitude)
///
/// Each axis is stepped from its minimum by `resolution`, upper bound excluded. Nodes are
/// produced lazily, so the node count is bounded only by the caller.
pub fn grid_nodes(bounds: &GridBounds, resolution: Decimal) -> AdvisoryResult<GridNodes> {
    let (rows, cols) = grid_shape(bounds, resolution)?;
    let total = rows
        .checked_mul(cols)
        .ok_or_else(|| AdvisoryError::InvalidResolution("grid is too large".to_string()))?;

    Ok(GridNodes {
        min_lat: bounds.min_lat,
        min_lon: bounds.min_lon,
        resolution,
        cols,
        total,
        next: 0,
    })
}

/// Iterator over the nodes of a grid, see [`grid_nodes`]
#[derive(Debug, Clone)]
pub struct GridNodes {
    min_lat: Decimal,
    min_lon: Decimal,
    resolution: Decimal,
    cols: usize,
    total: usize,
    next: usize,
}

impl Iterator for GridNodes {
    type Item = GridNode;

    fn next(&mut self) -> Option<GridNode> {
        if self.next >= self.total {
            return None;
        }
        let row = self.next / self.cols;
        let col = self.next % self.cols;
        self.next += 1;

        Some(GridNode {
            lat: self.min_lat + self.resolution * Decimal::from(row),
            lon: self.min_lon + self.resolution * Decimal::from(col),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridNodes {}

/// Score `crop` at every grid node
///
/// `conditions_at` decides per node:
/// - `Continue(Some(site))` scores the node,
/// - `Continue(None)` skips it (recorded in `skipped`) and moves on,
/// - `Break(())` stops the walk; the grid then holds what was scored so far and
///   `complete` is false.
pub fn generate_suitability_grid<F>(
    crop: &CropRequirements,
    bounds: &GridBounds,
    resolution: Decimal,
    mut conditions_at: F,
) -> AdvisoryResult<SuitabilityGrid>
where
    F: FnMut(&GridNode) -> ControlFlow<(), Option<SiteConditions>>,
{
    let nodes = grid_nodes(bounds, resolution)?;
    let expected_points = nodes.len();
    let mut points = Vec::new();
    let mut skipped = Vec::new();
    let mut complete = true;

    for node in nodes {
        let site = match conditions_at(&node) {
            ControlFlow::Continue(Some(site)) => site,
            ControlFlow::Continue(None) => {
                skipped.push(node);
                continue;
            }
            ControlFlow::Break(()) => {
                complete = false;
                break;
            }
        };
        let score = score_crop(crop, &site.soil, site.elevation, site.climate.as_ref())?;
        points.push(SuitabilityGridPoint {
            lat: to_degrees(node.lat)?,
            lon: to_degrees(node.lon)?,
            suitability_score: score.overall_score,
        });
    }

    Ok(SuitabilityGrid {
        points,
        skipped,
        expected_points,
        complete,
    })
}

/// Rows and columns of the grid
fn grid_shape(bounds: &GridBounds, resolution: Decimal) -> AdvisoryResult<(usize, usize)> {
    if resolution <= Decimal::ZERO {
        return Err(AdvisoryError::InvalidResolution(format!(
            "resolution must be positive, got {}",
            resolution
        )));
    }
    validate_bounds(bounds)?;

    let rows = axis_steps(bounds.min_lat, bounds.max_lat, resolution)?;
    let cols = axis_steps(bounds.min_lon, bounds.max_lon, resolution)?;
    Ok((rows, cols))
}

fn validate_bounds(bounds: &GridBounds) -> AdvisoryResult<()> {
    let lat_limit = Decimal::from(90);
    let lon_limit = Decimal::from(180);

    if bounds.min_lat > bounds.max_lat || bounds.min_lon > bounds.max_lon {
        return Err(AdvisoryError::InvalidBounds(
            "minimum must not exceed maximum".to_string(),
        ));
    }
    if bounds.min_lat < -lat_limit || bounds.max_lat > lat_limit {
        return Err(AdvisoryError::InvalidBounds(
            "latitude must be between -90 and 90".to_string(),
        ));
    }
    if bounds.min_lon < -lon_limit || bounds.max_lon > lon_limit {
        return Err(AdvisoryError::InvalidBounds(
            "longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

/// `ceil((max - min) / resolution)`
fn axis_steps(min: Decimal, max: Decimal, resolution: Decimal) -> AdvisoryResult<usize> {
    (max - min)
        .checked_div(resolution)
        .map(|steps| steps.ceil())
        .and_then(|steps| steps.to_usize())
        .ok_or_else(|| {
            AdvisoryError::InvalidResolution(format!("resolution {} is too fine", resolution))
        })
}

/// Grid coordinate as `f64` degrees
pub fn to_degrees(value: Decimal) -> AdvisoryResult<f64> {
    value.to_f64().ok_or_else(|| {
        AdvisoryError::InvariantViolation(format!("grid coordinate {} is not representable", value))
    })
}
