//! Configuration module for rail-motion.
//!
//! Provides types for loading and validating rail and timing configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod geometry;
#[cfg(feature = "std")]
mod loader;
mod rail;
mod timing;
pub mod units;
mod validation;

pub use geometry::RailGeometry;
pub use rail::RailConfig;
pub use timing::TimingConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Microsteps, Millimeters};
