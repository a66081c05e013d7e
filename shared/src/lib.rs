//! Shared types, models and analytics for the Mlimi Wanzeru advisory platform
//!
//! This crate contains the pure advisory core shared between the backend and the
//! browser (via WASM).

pub mod analysis;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::{AdvisoryError, AdvisoryResult};
pub use models::*;
pub use types::*;
pub use validation::*;
