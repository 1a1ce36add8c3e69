//! Edge detection with retrigger suppression.

/// Rising-edge detector with a debounce window.
///
/// An edge is accepted the instant it is seen; further rising edges inside
/// the window are ignored. This matches hardware bouncetime semantics rather
/// than stability filtering, so a press is never delayed by the window.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window_ms: u32,
    last_level: bool,
    last_accept_ms: Option<u64>,
}

impl Debouncer {
    /// Create a detector with the given suppression window.
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_level: false,
            last_accept_ms: None,
        }
    }

    /// Feed a level sample. Returns `true` when a debounced rising edge is
    /// accepted at `now_ms`.
    pub fn rising(&mut self, level: bool, now_ms: u64) -> bool {
        let was = self.last_level;
        self.last_level = level;

        if !(level && !was) {
            return false;
        }

        match self.last_accept_ms {
            Some(t) if now_ms.saturating_sub(t) < u64::from(self.window_ms) => false,
            _ => {
                self.last_accept_ms = Some(now_ms);
                true
            }
        }
    }
}
