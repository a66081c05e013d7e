//! Pure advisory computations
//!
//! Nothing in here performs I/O. Callers fetch weather, soil and elevation data and
//! pass it in already parsed.

pub mod planting;
pub mod rainfall;
pub mod range;
pub mod ranking;
pub mod suitability;

pub use planting::{calculate_planting_window, calculate_planting_window_with, PlantingSettings};
pub use rainfall::{analyze_rainfall, analyze_rainfall_with, RainfallSettings};
pub use range::{classify_range, score_range};
pub use ranking::{
    expected_grid_points, generate_suitability_grid, grid_nodes, rank_crops, to_degrees, GridNodes,
};
pub use suitability::score_crop;
