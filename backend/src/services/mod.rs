//! Business logic services for the Mlimi Wanzeru advisory server

pub mod cache;
pub mod crop;
pub mod crop_suitability;
pub mod location;
pub mod planting_calendar;
pub mod soil;
pub mod weather;

pub use crop::CropService;
pub use crop_suitability::CropSuitabilityService;
pub use location::LocationService;
pub use planting_calendar::PlantingCalendarService;
pub use soil::SoilService;
pub use weather::WeatherService;
