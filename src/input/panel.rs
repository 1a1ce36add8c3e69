//! Button panel over embedded-hal input pins.

use embedded_hal::digital::InputPin;
use heapless::Deque;

use crate::control::{Button, ButtonEvent};

use super::debounce::Debouncer;

/// Source of operator input for the sequencer.
///
/// Splits input into two contracts: debounced edge events for the one-shot
/// buttons, and raw level reads for the held buttons (jog and step size).
pub trait InputSource {
    /// Scan for edge events and return the oldest pending one, if any.
    fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent>;

    /// Current level of a button. Held buttons are sampled with this every
    /// loop iteration; no debounce applies.
    fn is_held(&mut self, button: Button) -> bool;
}

/// Buttons that produce debounced edge events, with their event mapping.
const EDGE_BUTTONS: [(Button, ButtonEvent); 4] = [
    (Button::Reset, ButtonEvent::Reset),
    (Button::Start, ButtonEvent::Start),
    (Button::TestShot, ButtonEvent::TestShot),
    (Button::Restart, ButtonEvent::Restart),
];

/// The full operator panel: eight buttons wired active-high (pull-down).
pub struct ButtonPanel<P: InputPin> {
    pins: [P; Button::COUNT],
    debouncers: [Debouncer; EDGE_BUTTONS.len()],
    pending: Deque<ButtonEvent, 8>,
}

impl<P: InputPin> ButtonPanel<P> {
    /// Create a panel from its pins, indexed by [`Button`] order, with the
    /// given debounce window for the edge-triggered buttons.
    pub fn new(pins: [P; Button::COUNT], debounce_ms: u32) -> Self {
        Self {
            pins,
            debouncers: [Debouncer::new(debounce_ms); EDGE_BUTTONS.len()],
            pending: Deque::new(),
        }
    }

    /// Release the pins back to the caller.
    pub fn into_pins(self) -> [P; Button::COUNT] {
        self.pins
    }

    fn level(&mut self, button: Button) -> bool {
        // An unreadable input is treated as released: no motion is the safe
        // interpretation for every button on this panel.
        self.pins[button.index()].is_high().unwrap_or(false)
    }
}

impl<P: InputPin> InputSource for ButtonPanel<P> {
    fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        for (slot, (button, event)) in EDGE_BUTTONS.iter().enumerate() {
            let level = self.level(*button);
            if self.debouncers[slot].rising(level, now_ms) {
                // A full queue means eight un-drained presses, which the
                // idle poll cadence never allows; drop the newest.
                let _ = self.pending.push_back(*event);
            }
        }
        self.pending.pop_front()
    }

    fn is_held(&mut self, button: Button) -> bool {
        self.level(button)
    }
}
