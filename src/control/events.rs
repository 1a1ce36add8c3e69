//! Operator buttons and the events they produce.

/// Physical operator buttons on the control panel.
///
/// Forward/Backward and Increment/Decrement are level-sampled; the rest are
/// edge-triggered with a debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Jog away from the motor (held).
    Forward,
    /// Jog toward the motor (held).
    Backward,
    /// Zero position and shot count, restore the step size floor.
    Reset,
    /// Grow the step size (held, accelerating).
    Increment,
    /// Shrink the step size (held, accelerating).
    Decrement,
    /// Start an automatic sequence; pressed again, request a stop.
    Start,
    /// Fire one shutter pulse immediately.
    TestShot,
    /// Re-launch the whole process, discarding all state.
    Restart,
}

impl Button {
    /// Number of buttons on the panel.
    pub const COUNT: usize = 8;

    /// Panel index for pin arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A debounced edge event produced by the input layer.
///
/// Only the edge-triggered buttons produce events; jog and step-size buttons
/// are read as levels by the sequencer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Reset button pressed.
    Reset,
    /// Start button pressed.
    Start,
    /// Test-shot button pressed.
    TestShot,
    /// Restart button pressed.
    Restart,
}
