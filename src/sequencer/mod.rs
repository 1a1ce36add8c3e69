//! Motion/shutter sequencer for rail-motion.
//!
//! Drives the three operating modes of the rail: idle polling, manual jog,
//! and the automatic move-settle-shoot sequence.

mod builder;

pub use builder::RailSequencerBuilder;

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::clock::Monotonic;
use crate::config::{RailConfig, RailGeometry, TimingConfig};
use crate::control::{Button, ButtonEvent, ControlState};
use crate::drive::{CoilDrive, Shutter, Travel};
use crate::error::Result;
use crate::input::InputSource;
use crate::status::StatusSink;

/// Reason the run loop handed control back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exit {
    /// The restart button was pressed: the host bootstrap should re-launch
    /// the process image, discarding all in-memory state.
    Restart,
}

/// What the automatic sequence does after a block boundary check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundaryAction {
    Continue,
    Stop,
    Restart,
}

/// The rail control loop: one instance owns the driver outputs, the shutter,
/// the status display, the operator inputs, and the shared control state.
///
/// Single logical thread of execution. Button edges are queued by the input
/// layer and applied here at well-defined observation points (every idle
/// tick, every block boundary), so multi-field state updates are never torn.
pub struct RailSequencer<DRV, SH, ST, IN, DELAY, CLK>
where
    DRV: CoilDrive,
    SH: Shutter,
    ST: StatusSink,
    IN: InputSource,
    DELAY: DelayNs,
    CLK: Monotonic,
{
    drive: DRV,
    shutter: SH,
    status: ST,
    inputs: IN,
    delay: DELAY,
    clock: CLK,
    geometry: RailGeometry,
    timing: TimingConfig,
    state: ControlState,
    /// When the currently held step-size button was first observed.
    hold_since: Option<u64>,
    /// Latched start request, consumed by the next tick.
    start_requested: bool,
}

impl<DRV, SH, ST, IN, DELAY, CLK> RailSequencer<DRV, SH, ST, IN, DELAY, CLK>
where
    DRV: CoilDrive,
    SH: Shutter,
    ST: StatusSink,
    IN: InputSource,
    DELAY: DelayNs,
    CLK: Monotonic,
{
    /// Create a sequencer from configuration and its hardware collaborators.
    pub fn new(
        config: &RailConfig,
        drive: DRV,
        shutter: SH,
        status: ST,
        inputs: IN,
        delay: DELAY,
        clock: CLK,
    ) -> Self {
        Self {
            drive,
            shutter,
            status,
            inputs,
            delay,
            clock,
            geometry: RailGeometry::from_config(config),
            timing: config.timing.clone(),
            state: ControlState::new(config.min_step_mm),
            hold_since: None,
            start_requested: false,
        }
    }

    /// The shared control state.
    #[inline]
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// The derived rail geometry.
    #[inline]
    pub fn geometry(&self) -> &RailGeometry {
        &self.geometry
    }

    /// Run the control loop until a restart is requested.
    ///
    /// Announces readiness, then alternates idle polling, manual jogging,
    /// and automatic sequences as the operator commands. On a hardware error
    /// outside an automatic sequence the outputs are de-energized and the
    /// error is handed to the caller; inside a sequence errors are recovered
    /// as an implicit stop and the loop keeps running.
    pub fn run(&mut self) -> Result<Exit> {
        self.status.display("Ready...", "");
        self.delay.delay_ms(self.timing.startup_ms);

        loop {
            match self.tick() {
                Ok(Some(exit)) => return Ok(exit),
                Ok(None) => {}
                Err(e) => {
                    // Leave the hardware safe before handing the error up.
                    let _ = self.drive.release();
                    return Err(e);
                }
            }
        }
    }

    /// One iteration of the control loop.
    ///
    /// Applies pending button events, re-samples the jog direction, then
    /// performs either one idle poll, one jog micro-step, or a whole
    /// automatic sequence (Start blocks until the sequence ends).
    pub fn tick(&mut self) -> Result<Option<Exit>> {
        let now = self.clock.now_ms();
        if let Some(exit) = self.apply_events(now)? {
            return Ok(Some(exit));
        }

        if self.start_requested {
            self.start_requested = false;
            self.hold_since = None;
            return self.start_sequence();
        }

        let direction = self.sample_direction();
        self.state.set_direction(direction);

        match direction {
            Some(travel) => {
                self.hold_since = None;
                self.jog_step(travel)?;
            }
            None => self.idle_tick(now)?,
        }

        Ok(None)
    }

    /// Drain queued edge events and apply each as one state transaction.
    fn apply_events(&mut self, now: u64) -> Result<Option<Exit>> {
        while let Some(event) = self.inputs.poll(now) {
            match event {
                ButtonEvent::Reset => self.state.reset(),
                ButtonEvent::TestShot => self.shutter.trigger()?,
                ButtonEvent::Start => self.start_requested = true,
                ButtonEvent::Restart => {
                    self.drive.release()?;
                    self.status.display("Restart...", "");
                    return Ok(Some(Exit::Restart));
                }
            }
        }
        Ok(None)
    }

    /// Resolve the jog buttons to a direction. Both held is inconsistent and
    /// resolves to no motion, not an error.
    fn sample_direction(&mut self) -> Option<Travel> {
        let forward = self.inputs.is_held(Button::Forward);
        let backward = self.inputs.is_held(Button::Backward);
        match (forward, backward) {
            (true, false) => Some(Travel::Forward),
            (false, true) => Some(Travel::Backward),
            _ => None,
        }
    }

    /// One manual-jog micro-step: energize the next pattern and dwell.
    ///
    /// The caller re-samples direction every iteration, so jog responds to
    /// release within one dwell period. Jog speed is the dwell time alone,
    /// independent of the configured step size.
    fn jog_step(&mut self, travel: Travel) -> Result<()> {
        let pattern = self.state.advance_phase(travel);
        self.drive.energize(pattern)?;
        self.delay.delay_ms(self.timing.dwell_ms);
        Ok(())
    }

    /// One idle poll: outputs released, step-size hold rule, status refresh.
    fn idle_tick(&mut self, now: u64) -> Result<()> {
        self.drive.release()?;
        self.adjust_step_on_hold(now);
        self.idle_status();
        self.delay.delay_ms(self.timing.idle_poll_ms);
        Ok(())
    }

    /// Accelerating-hold step adjustment.
    ///
    /// The initial press applies one increment; a button still held after
    /// the hold threshold applies one more per poll. Increment is checked
    /// before decrement, and a single timestamp tracks whichever was seen
    /// first.
    fn adjust_step_on_hold(&mut self, now: u64) {
        let increment = self.inputs.is_held(Button::Increment);
        let decrement = !increment && self.inputs.is_held(Button::Decrement);

        if !increment && !decrement {
            self.hold_since = None;
            return;
        }

        let apply = match self.hold_since {
            None => {
                self.hold_since = Some(now);
                true
            }
            Some(since) => now.saturating_sub(since) >= u64::from(self.timing.hold_after_ms),
        };

        if apply {
            if increment {
                self.state.increment_step();
            } else {
                self.state.decrement_step();
            }
        }
    }

    /// Begin an automatic sequence in response to a Start event.
    ///
    /// A no-op while a sequence is already running. Any error raised inside
    /// the sequence is recovered here as an implicit stop: outputs released,
    /// running flag cleared, loop continues.
    fn start_sequence(&mut self) -> Result<Option<Exit>> {
        if !self.state.begin_sequence() {
            return Ok(None);
        }

        match self.automatic_sequence() {
            Ok(exit) => Ok(exit),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("automatic sequence aborted by hardware error; stopping");
                let _ = self.drive.release();
                self.state.end_sequence();
                Ok(None)
            }
        }
    }

    /// The automatic move-settle-shoot loop.
    ///
    /// Per iteration, strictly in order: block execution, coil release,
    /// status refresh, stop check, settle pause, double shutter pulse,
    /// recovery pause, shot count. The running flag and the stop button are
    /// observed only between blocks, never mid-block.
    fn automatic_sequence(&mut self) -> Result<Option<Exit>> {
        self.status.display("Start...", "");
        self.delay.delay_ms(self.timing.start_ack_ms);
        self.sequence_status();

        while self.state.is_running() {
            self.execute_block()?;
            self.drive.release()?;
            self.sequence_status();

            match self.poll_block_boundary()? {
                BoundaryAction::Continue => {}
                BoundaryAction::Stop => {
                    self.status.display("Stop...", "");
                    self.delay.delay_ms(self.timing.stop_ack_ms);
                    self.state.end_sequence();
                    break;
                }
                BoundaryAction::Restart => {
                    self.status.display("Restart...", "");
                    return Ok(Some(Exit::Restart));
                }
            }

            self.delay.delay_ms(self.timing.settle_ms);
            self.shutter.trigger()?;
            self.delay.delay_ms(self.timing.shutter_gap_ms);
            // The wireless receiver can miss a single pulse.
            self.shutter.trigger()?;
            self.delay.delay_ms(self.timing.recovery_ms);
            self.state.record_shot();
        }

        Ok(None)
    }

    /// Execute one motion block: a fixed count of forward micro-steps
    /// back-to-back at the constant dwell rate.
    fn execute_block(&mut self) -> Result<()> {
        let count = self.geometry.block_microsteps(self.state.step_size());
        for _ in 0..count {
            let pattern = self.state.advance_phase(Travel::Forward);
            self.drive.energize(pattern)?;
            self.delay.delay_ms(self.timing.dwell_ms);
        }
        Ok(())
    }

    /// Observation point between blocks: drain events and read the stop
    /// button. A queued Start edge and a held Start level both latch a stop
    /// request; reset and test-shot apply here, restart ends the sequence.
    fn poll_block_boundary(&mut self) -> Result<BoundaryAction> {
        let now = self.clock.now_ms();
        let mut stop = self.inputs.is_held(Button::Start);

        while let Some(event) = self.inputs.poll(now) {
            match event {
                ButtonEvent::Start => stop = true,
                ButtonEvent::Reset => self.state.reset(),
                ButtonEvent::TestShot => self.shutter.trigger()?,
                ButtonEvent::Restart => return Ok(BoundaryAction::Restart),
            }
        }

        Ok(if stop {
            BoundaryAction::Stop
        } else {
            BoundaryAction::Continue
        })
    }

    /// Idle status lines: step size, carriage distance, micro-step position.
    fn idle_status(&mut self) {
        let mut line1: heapless::String<32> = heapless::String::new();
        let mut line2: heapless::String<32> = heapless::String::new();
        let distance = self.geometry.distance_mm(self.state.absolute_position());
        let _ = write!(line1, "Step={:.2}mm", self.state.step_size().0);
        let _ = write!(
            line2,
            "D={:.2},T={}",
            distance.0,
            self.state.absolute_position()
        );
        self.status.display(&line1, &line2);
    }

    /// Sequence status lines: step size, distance, upcoming shot number.
    fn sequence_status(&mut self) {
        let mut line1: heapless::String<32> = heapless::String::new();
        let mut line2: heapless::String<32> = heapless::String::new();
        let distance = self.geometry.distance_mm(self.state.absolute_position());
        let _ = write!(line1, "=>Step={:.2}mm", self.state.step_size().0);
        let _ = write!(
            line2,
            "=>D={:.2},S={}",
            distance.0,
            self.state.shot_count() + 1
        );
        self.status.display(&line1, &line2);
    }
}
