//! Status output sink.

/// Two-line status display, fire-and-forget.
///
/// Called after every meaningful state change: idle poll ticks, block
/// completions, and start/stop/reset/restart announcements. Implementations
/// must not block the control loop; no acknowledgement is expected.
pub trait StatusSink {
    /// Show two lines of status text.
    fn display(&mut self, line1: &str, line2: &str);
}

/// Status sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn display(&mut self, _line1: &str, _line2: &str) {}
}

/// Status sink that prints to stdout (std only).
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutStatus;

#[cfg(feature = "std")]
impl StatusSink for StdoutStatus {
    fn display(&mut self, line1: &str, line2: &str) {
        println!("{}", line1);
        if !line2.is_empty() {
            println!("{}", line2);
        }
    }
}
