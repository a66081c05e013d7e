//! External API integrations

pub mod nasa_power;
pub mod soilgrids;
