//! Error taxonomy for the advisory core
//!
//! Every analytical operation either applies a documented fallback or returns one of
//! these variants. Callers translate them into user-facing responses.

use thiserror::Error;

/// Errors raised by the pure advisory computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    /// A required scalar input is absent (or not a finite number)
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Malformed requirement bounds (min >= max or non-finite)
    #[error("Invalid range for {field}: min {min} must be less than max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Rainfall history does not cover enough distinct years
    #[error("Insufficient rainfall data: {found} usable years, {required} required")]
    InsufficientData { found: usize, required: usize },

    /// Grid resolution must be strictly positive
    #[error("Invalid grid resolution: {0}")]
    InvalidResolution(String),

    /// Grid bounds are inverted or outside valid coordinates
    #[error("Invalid grid bounds: {0}")]
    InvalidBounds(String),

    /// The crop catalog returned no records
    #[error("No crops available in the catalog")]
    NoCropsAvailable,

    /// A computed post-condition failed; indicates a logic bug rather than bad input
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl AdvisoryError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AdvisoryError::MissingInput(_) => "MISSING_INPUT",
            AdvisoryError::InvalidRange { .. } => "INVALID_RANGE",
            AdvisoryError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            AdvisoryError::InvalidResolution(_) => "INVALID_RESOLUTION",
            AdvisoryError::InvalidBounds(_) => "INVALID_BOUNDS",
            AdvisoryError::NoCropsAvailable => "NO_CROPS_AVAILABLE",
            AdvisoryError::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }
}

/// Result type alias for advisory computations
pub type AdvisoryResult<T> = Result<T, AdvisoryError>;
