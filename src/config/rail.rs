//! Rail configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::timing::TimingConfig;
use super::units::{Microsteps, Millimeters};

/// Complete rail configuration from TOML.
///
/// Defaults describe the reference rig: a 512 step/rev geared motor driven
/// at 8 microsteps on a 2.0 mm pitch lead screw.
#[derive(Debug, Clone, Deserialize)]
pub struct RailConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default = "default_name")]
    pub name: String<32>,

    /// Full motor steps per revolution (512 for the reference geared motor).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Microstep multiplier applied by the driver (half-stepping = 8 on the
    /// reference rig's phase table cadence).
    #[serde(default = "default_microsteps")]
    pub microsteps: Microsteps,

    /// Lead-screw pitch: carriage travel per motor revolution.
    #[serde(default = "default_screw_pitch")]
    pub screw_pitch_mm: Millimeters,

    /// Floor for the per-shot step size. Also the initial and post-reset value.
    #[serde(default = "default_min_step")]
    pub min_step_mm: Millimeters,

    /// Loop and pause timing.
    #[serde(default)]
    pub timing: TimingConfig,
}

fn default_name() -> String<32> {
    String::try_from("macro rail").unwrap_or_default()
}

fn default_steps_per_revolution() -> u16 {
    512
}

fn default_microsteps() -> Microsteps {
    Microsteps::EIGHTH
}

fn default_screw_pitch() -> Millimeters {
    Millimeters(2.0)
}

fn default_min_step() -> Millimeters {
    Millimeters(0.01)
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            steps_per_revolution: default_steps_per_revolution(),
            microsteps: default_microsteps(),
            screw_pitch_mm: default_screw_pitch(),
            min_step_mm: default_min_step(),
            timing: TimingConfig::default(),
        }
    }
}

impl RailConfig {
    /// Total micro-steps per motor revolution (steps × microsteps).
    pub fn microsteps_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }
}
