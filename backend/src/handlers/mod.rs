//! HTTP handlers

pub mod advisory;
pub mod health;
pub mod locations;

pub use advisory::*;
pub use health::*;
pub use locations::*;
