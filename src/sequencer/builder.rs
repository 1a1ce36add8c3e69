//! Builder pattern for RailSequencer.

use embedded_hal::delay::DelayNs;

use crate::clock::Monotonic;
use crate::config::RailConfig;
use crate::drive::{CoilDrive, Shutter};
use crate::error::{ConfigError, Error, Result};
use crate::input::InputSource;
use crate::status::StatusSink;

use super::RailSequencer;

/// Builder for creating RailSequencer instances.
pub struct RailSequencerBuilder<DRV, SH, ST, IN, DELAY, CLK>
where
    DRV: CoilDrive,
    SH: Shutter,
    ST: StatusSink,
    IN: InputSource,
    DELAY: DelayNs,
    CLK: Monotonic,
{
    drive: Option<DRV>,
    shutter: Option<SH>,
    status: Option<ST>,
    inputs: Option<IN>,
    delay: Option<DELAY>,
    clock: Option<CLK>,
    config: RailConfig,
}

impl<DRV, SH, ST, IN, DELAY, CLK> Default for RailSequencerBuilder<DRV, SH, ST, IN, DELAY, CLK>
where
    DRV: CoilDrive,
    SH: Shutter,
    ST: StatusSink,
    IN: InputSource,
    DELAY: DelayNs,
    CLK: Monotonic,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<DRV, SH, ST, IN, DELAY, CLK> RailSequencerBuilder<DRV, SH, ST, IN, DELAY, CLK>
where
    DRV: CoilDrive,
    SH: Shutter,
    ST: StatusSink,
    IN: InputSource,
    DELAY: DelayNs,
    CLK: Monotonic,
{
    /// Create a new builder with the reference-rig configuration.
    pub fn new() -> Self {
        Self {
            drive: None,
            shutter: None,
            status: None,
            inputs: None,
            delay: None,
            clock: None,
            config: RailConfig::default(),
        }
    }

    /// Set the coil driver.
    pub fn drive(mut self, drive: DRV) -> Self {
        self.drive = Some(drive);
        self
    }

    /// Set the shutter release.
    pub fn shutter(mut self, shutter: SH) -> Self {
        self.shutter = Some(shutter);
        self
    }

    /// Set the status sink.
    pub fn status(mut self, status: ST) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the operator input source.
    pub fn inputs(mut self, inputs: IN) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the millisecond clock.
    pub fn clock(mut self, clock: CLK) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a specific rail configuration instead of the defaults.
    pub fn config(mut self, config: RailConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the RailSequencer.
    ///
    /// # Errors
    ///
    /// Returns an error if a required collaborator is missing or the
    /// configuration fails validation.
    pub fn build(self) -> Result<RailSequencer<DRV, SH, ST, IN, DELAY, CLK>> {
        crate::config::validate_config(&self.config)?;

        let drive = self.drive.ok_or_else(|| missing("drive is required"))?;
        let shutter = self.shutter.ok_or_else(|| missing("shutter is required"))?;
        let status = self.status.ok_or_else(|| missing("status is required"))?;
        let inputs = self.inputs.ok_or_else(|| missing("inputs is required"))?;
        let delay = self.delay.ok_or_else(|| missing("delay is required"))?;
        let clock = self.clock.ok_or_else(|| missing("clock is required"))?;

        Ok(RailSequencer::new(
            &self.config,
            drive,
            shutter,
            status,
            inputs,
            delay,
            clock,
        ))
    }
}

fn missing(what: &str) -> Error {
    Error::Config(ConfigError::ParseError(
        heapless::String::try_from(what).unwrap_or_default(),
    ))
}
