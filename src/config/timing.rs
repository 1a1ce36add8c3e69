//! Fixed timing parameters for the control loop.
//!
//! Every pause in the system is declared here. The phase dwell sets the rail
//! speed and must stay constant during motion or the motor stalls.

use serde::Deserialize;

/// All fixed delays and windows used by the sequencer and input layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Hold time per energized phase pattern in milliseconds. Sole
    /// determinant of travel speed; observed once per micro-step.
    pub dwell_ms: u32,

    /// Idle loop poll period in milliseconds.
    pub idle_poll_ms: u32,

    /// Pause after the startup banner before entering the idle loop.
    pub startup_ms: u32,

    /// Pause after announcing a sequence start, before the first block.
    pub start_ack_ms: u32,

    /// Pause after announcing a stop request.
    pub stop_ack_ms: u32,

    /// Camera settle pause after a block completes, before the shutter fires.
    pub settle_ms: u32,

    /// Gap between the two shutter pulses of one shot.
    pub shutter_gap_ms: u32,

    /// Pause after the second shutter pulse, before the next block.
    pub recovery_ms: u32,

    /// Retrigger suppression window for edge-triggered buttons.
    pub debounce_ms: u32,

    /// Hold time before a held step-size button starts repeating.
    pub hold_after_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 3,
            idle_poll_ms: 200,
            startup_ms: 2000,
            start_ack_ms: 4000,
            stop_ack_ms: 4000,
            settle_ms: 2000,
            shutter_gap_ms: 63,
            recovery_ms: 1000,
            debounce_ms: 400,
            hold_after_ms: 1000,
        }
    }
}
