//! Domain models for the Mlimi Wanzeru advisory platform

mod crop;
mod location;
mod planting;
mod rainfall;
mod soil;
mod suitability;
mod weather;

pub use crop::*;
pub use location::*;
pub use planting::*;
pub use rainfall::*;
pub use soil::*;
pub use suitability::*;
pub use weather::*;
