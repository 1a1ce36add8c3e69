//! Camera shutter trigger.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::DriveError;

/// Momentary shutter release.
///
/// `trigger` issues one electrical pulse on the camera's release line. The
/// receiver on the reference rig is unreliable enough that callers fire it
/// twice per shot with a short gap.
pub trait Shutter {
    /// Issue one momentary pulse.
    fn trigger(&mut self) -> Result<(), DriveError>;
}

/// Shutter release over an embedded-hal output pin.
pub struct GpioShutter<PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    pin: PIN,
    delay: DELAY,
    pulse_ms: u32,
}

impl<PIN, DELAY> GpioShutter<PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    /// Default pulse width in milliseconds.
    pub const DEFAULT_PULSE_MS: u32 = 50;

    /// Create a shutter release with the default pulse width.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Self::with_pulse_width(pin, delay, Self::DEFAULT_PULSE_MS)
    }

    /// Create a shutter release with a specific pulse width.
    pub fn with_pulse_width(pin: PIN, delay: DELAY, pulse_ms: u32) -> Self {
        Self {
            pin,
            delay,
            pulse_ms,
        }
    }
}

impl<PIN, DELAY> Shutter for GpioShutter<PIN, DELAY>
where
    PIN: OutputPin,
    DELAY: DelayNs,
{
    fn trigger(&mut self) -> Result<(), DriveError> {
        self.pin.set_high().map_err(|_| DriveError::ShutterPinError)?;
        self.delay.delay_ms(self.pulse_ms);
        self.pin.set_low().map_err(|_| DriveError::ShutterPinError)
    }
}
