//! Shared control state for the rail.
//!
//! One instance lives for the process duration. The input layer never touches
//! it directly: button edges arrive as queued events and the sequencer applies
//! each mutation here as a single call, so multi-field updates (reset, stop)
//! are never observed half-applied.

use crate::config::units::Millimeters;
use crate::drive::{PhasePattern, PhaseTable, Travel};

/// The control record mutated by the event layer and read by the motion loop.
#[derive(Debug, Clone)]
pub struct ControlState {
    /// Requested jog direction; `None` means no manual motion this tick.
    direction: Option<Travel>,

    /// Current index into the phase table, always in `[0, PhaseTable::LEN)`.
    step_index: usize,

    /// Signed cumulative micro-step count since the last reset. Unbounded;
    /// the rail has no travel limits in this core.
    absolute_position: i64,

    /// Carriage advance per automatic-sequence block.
    step_size: Millimeters,

    /// Floor for `step_size`; also its initial and post-reset value.
    min_step: Millimeters,

    /// True while an automatic sequence is executing. Cooperative
    /// cancellation flag, observed once per block.
    running: bool,

    /// Shutter triggers completed in the current automatic sequence.
    shot_count: u32,
}

impl ControlState {
    /// Create the state with everything zeroed and the step size at its floor.
    pub fn new(min_step: Millimeters) -> Self {
        Self {
            direction: None,
            step_index: 0,
            absolute_position: 0,
            step_size: min_step,
            min_step,
            running: false,
            shot_count: 0,
        }
    }

    /// Requested jog direction.
    #[inline]
    pub fn direction(&self) -> Option<Travel> {
        self.direction
    }

    /// Set the jog direction from the forward/backward button levels.
    #[inline]
    pub fn set_direction(&mut self, direction: Option<Travel>) {
        self.direction = direction;
    }

    /// Current phase table index.
    #[inline]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Signed micro-step position since the last reset.
    #[inline]
    pub fn absolute_position(&self) -> i64 {
        self.absolute_position
    }

    /// Carriage advance per automatic-sequence block.
    #[inline]
    pub fn step_size(&self) -> Millimeters {
        self.step_size
    }

    /// Whether an automatic sequence is executing.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Shots completed in the current sequence.
    #[inline]
    pub fn shot_count(&self) -> u32 {
        self.shot_count
    }

    /// Advance one micro-step: wrap the phase index, count the position, and
    /// return the pattern to energize for this micro-step.
    #[inline]
    pub fn advance_phase(&mut self, travel: Travel) -> PhasePattern {
        let (next, pattern) = PhaseTable::advance(self.step_index, travel);
        self.step_index = next;
        self.absolute_position += travel.sign();
        pattern
    }

    /// Zero the position and shot count and restore the step size floor.
    ///
    /// Applied as one call so the motion loop never observes a partial reset.
    pub fn reset(&mut self) {
        self.absolute_position = 0;
        self.shot_count = 0;
        self.step_size = self.min_step;
    }

    /// Grow the step size by one increment (0.01 mm granularity).
    pub fn increment_step(&mut self) {
        self.step_size = self.step_size + self.min_step;
    }

    /// Shrink the step size by one increment, clamped to the floor.
    pub fn decrement_step(&mut self) {
        let lowered = self.step_size.0 - self.min_step.0;
        self.step_size = if lowered < self.min_step.0 {
            self.min_step
        } else {
            Millimeters(lowered)
        };
    }

    /// Arm an automatic sequence.
    ///
    /// Idempotent while running: returns `false` and changes nothing if a
    /// sequence is already executing. Otherwise zeroes position and shot
    /// count, sets the running flag, and returns `true`.
    pub fn begin_sequence(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.absolute_position = 0;
        self.shot_count = 0;
        self.running = true;
        true
    }

    /// Terminate the automatic sequence and zero position and shot count.
    pub fn end_sequence(&mut self) {
        self.running = false;
        self.absolute_position = 0;
        self.shot_count = 0;
    }

    /// Record one completed shot.
    #[inline]
    pub fn record_shot(&mut self) {
        self.shot_count += 1;
    }
}
