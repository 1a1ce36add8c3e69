//! Monotonic millisecond clock.

/// Millisecond time source for debounce windows and the step-size hold rule.
///
/// Only differences between readings are used, so any monotonic origin works.
pub trait Monotonic {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&mut self) -> u64;
}

/// Clock backed by `std::time::Instant` (std only).
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock with its origin at the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Monotonic for StdClock {
    fn now_ms(&mut self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
