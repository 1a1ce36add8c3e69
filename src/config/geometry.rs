//! Rail geometry derived from configuration.

use libm::roundf;

use super::rail::RailConfig;
use super::units::Millimeters;

/// Derived geometric parameters computed from rail configuration.
///
/// These are computed once at initialization and used for every distance
/// readout and block-size calculation.
#[derive(Debug, Clone, Copy)]
pub struct RailGeometry {
    /// Total micro-steps per motor revolution (steps × microsteps).
    pub microsteps_per_revolution: u32,

    /// Lead-screw pitch: carriage travel per motor revolution.
    pub screw_pitch_mm: Millimeters,
}

impl RailGeometry {
    /// Compute rail geometry from configuration.
    pub fn from_config(config: &RailConfig) -> Self {
        Self {
            microsteps_per_revolution: config.microsteps_per_revolution(),
            screw_pitch_mm: config.screw_pitch_mm,
        }
    }

    /// Convert an absolute micro-step position to carriage distance.
    ///
    /// Pure and deterministic: the same position always yields the same bits,
    /// so display output and test assertions agree.
    #[inline]
    pub fn distance_mm(&self, position: i64) -> Millimeters {
        Millimeters(position as f32 * self.screw_pitch_mm.0 / self.microsteps_per_revolution as f32)
    }

    /// Micro-steps needed to advance the carriage by one step size.
    ///
    /// Rounded to the nearest whole micro-step; the sub-micro-step remainder
    /// is small against the mechanical backlash of the rig.
    #[inline]
    pub fn block_microsteps(&self, step: Millimeters) -> u32 {
        roundf(self.microsteps_per_revolution as f32 * step.0 / self.screw_pitch_mm.0) as u32
    }
}
