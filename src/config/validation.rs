//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::RailConfig;

/// Validate a rail configuration.
///
/// Checks:
/// - Steps per revolution is non-zero
/// - Lead-screw pitch is positive
/// - Minimum step size is positive
/// - Phase dwell time is non-zero
///
/// Microstep values are already validated at deserialization.
pub fn validate_config(config: &RailConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if config.screw_pitch_mm.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidScrewPitch(
            config.screw_pitch_mm.0,
        )));
    }

    if config.min_step_mm.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMinStep(
            config.min_step_mm.0,
        )));
    }

    if config.timing.dwell_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidDwell(
            config.timing.dwell_ms,
        )));
    }

    Ok(())
}
