//! Coil driver output.
//!
//! Generic over embedded-hal 1.0 output pins.

use embedded_hal::digital::OutputPin;

use crate::error::DriveError;

use super::phase::PhasePattern;

/// Exclusive owner of the four driver output lines.
///
/// Whichever sequencer mode is executing holds the driver; ownership moves
/// only at mode boundaries, never mid-micro-step.
pub trait CoilDrive {
    /// Energize the coils according to a phase pattern.
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), DriveError>;

    /// De-energize all coils.
    fn release(&mut self) -> Result<(), DriveError> {
        self.energize(PhasePattern::RELEASED)
    }
}

/// 4-wire unipolar driver (ULN2003 class) over embedded-hal output pins.
///
/// Generic over each line so hosts with heterogeneous pin types still fit.
pub struct FourWireDriver<IN1, IN2, IN3, IN4>
where
    IN1: OutputPin,
    IN2: OutputPin,
    IN3: OutputPin,
    IN4: OutputPin,
{
    in1: IN1,
    in2: IN2,
    in3: IN3,
    in4: IN4,
}

impl<IN1, IN2, IN3, IN4> FourWireDriver<IN1, IN2, IN3, IN4>
where
    IN1: OutputPin,
    IN2: OutputPin,
    IN3: OutputPin,
    IN4: OutputPin,
{
    /// Create a driver from the four coil lines, IN1..IN4 order.
    pub fn new(in1: IN1, in2: IN2, in3: IN3, in4: IN4) -> Self {
        Self { in1, in2, in3, in4 }
    }

    /// Release the pins back to the caller.
    pub fn into_pins(self) -> (IN1, IN2, IN3, IN4) {
        (self.in1, self.in2, self.in3, self.in4)
    }

    fn write(pin: &mut impl OutputPin, level: bool) -> Result<(), DriveError> {
        if level {
            pin.set_high().map_err(|_| DriveError::CoilPinError)
        } else {
            pin.set_low().map_err(|_| DriveError::CoilPinError)
        }
    }
}

impl<IN1, IN2, IN3, IN4> CoilDrive for FourWireDriver<IN1, IN2, IN3, IN4>
where
    IN1: OutputPin,
    IN2: OutputPin,
    IN3: OutputPin,
    IN4: OutputPin,
{
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), DriveError> {
        Self::write(&mut self.in1, pattern.coil(0))?;
        Self::write(&mut self.in2, pattern.coil(1))?;
        Self::write(&mut self.in3, pattern.coil(2))?;
        Self::write(&mut self.in4, pattern.coil(3))?;
        Ok(())
    }
}
