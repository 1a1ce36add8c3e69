//! Integration tests for the rail-motion sequencer.
//!
//! These drive the full control loop against scripted inputs and recording
//! fakes: a shared nanosecond counter stands in for wall time, advanced by
//! the delay provider and read by the clock, the input schedule, and the
//! shutter recorder. Every scenario is therefore fully deterministic.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use rail_motion::clock::Monotonic;
use rail_motion::drive::{CoilDrive, PhasePattern, Shutter};
use rail_motion::error::DriveError;
use rail_motion::input::InputSource;
use rail_motion::status::StatusSink;
use rail_motion::{
    Button, ButtonEvent, Exit, RailConfig, RailSequencer, RailSequencerBuilder,
};

// =============================================================================
// Test fakes
// =============================================================================

/// Shared simulated time in nanoseconds.
type SharedTime = Rc<Cell<u64>>;

fn shared_time() -> SharedTime {
    Rc::new(Cell::new(0))
}

/// Delay provider that advances the shared time instead of sleeping.
struct FakeDelay(SharedTime);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns));
    }
}

/// Clock reading the shared time.
struct FakeClock(SharedTime);

impl Monotonic for FakeClock {
    fn now_ms(&mut self) -> u64 {
        self.0.get() / 1_000_000
    }
}

/// Coil driver recording every energize/release call.
struct RecordingDrive {
    energized: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
}

impl RecordingDrive {
    fn new() -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let energized = Rc::new(Cell::new(0));
        let released = Rc::new(Cell::new(0));
        (
            Self {
                energized: energized.clone(),
                released: released.clone(),
            },
            energized,
            released,
        )
    }
}

impl CoilDrive for RecordingDrive {
    fn energize(&mut self, pattern: PhasePattern) -> Result<(), DriveError> {
        if pattern == PhasePattern::RELEASED {
            self.released.set(self.released.get() + 1);
        } else {
            self.energized.set(self.energized.get() + 1);
        }
        Ok(())
    }
}

/// Coil driver that starts failing after a set number of micro-steps.
struct FlakyDrive {
    successes_left: usize,
}

impl CoilDrive for FlakyDrive {
    fn energize(&mut self, _pattern: PhasePattern) -> Result<(), DriveError> {
        if self.successes_left == 0 {
            return Err(DriveError::CoilPinError);
        }
        self.successes_left -= 1;
        Ok(())
    }

    fn release(&mut self) -> Result<(), DriveError> {
        Ok(())
    }
}

/// Shutter recording the shared-time timestamp (ms) of each pulse.
struct RecordingShutter {
    time: SharedTime,
    pulses: Rc<Cell<usize>>,
    stamps: Rc<std::cell::RefCell<Vec<u64>>>,
}

impl RecordingShutter {
    fn new(time: SharedTime) -> (Self, Rc<Cell<usize>>, Rc<std::cell::RefCell<Vec<u64>>>) {
        let pulses = Rc::new(Cell::new(0));
        let stamps = Rc::new(std::cell::RefCell::new(Vec::new()));
        (
            Self {
                time,
                pulses: pulses.clone(),
                stamps: stamps.clone(),
            },
            pulses,
            stamps,
        )
    }
}

impl Shutter for RecordingShutter {
    fn trigger(&mut self) -> Result<(), DriveError> {
        self.pulses.set(self.pulses.get() + 1);
        self.stamps.borrow_mut().push(self.time.get() / 1_000_000);
        Ok(())
    }
}

/// Status sink recording every line pair.
struct RecordingStatus {
    lines: Rc<std::cell::RefCell<Vec<(String, String)>>>,
}

impl RecordingStatus {
    fn new() -> (Self, Rc<std::cell::RefCell<Vec<(String, String)>>>) {
        let lines = Rc::new(std::cell::RefCell::new(Vec::new()));
        (
            Self {
                lines: lines.clone(),
            },
            lines,
        )
    }
}

impl StatusSink for RecordingStatus {
    fn display(&mut self, line1: &str, line2: &str) {
        self.lines
            .borrow_mut()
            .push((line1.to_string(), line2.to_string()));
    }
}

/// Input source driven by a schedule: edge events released at their
/// timestamp, level buttons held during half-open millisecond intervals.
struct ScriptedInputs {
    time: SharedTime,
    events: VecDeque<(u64, ButtonEvent)>,
    held: Vec<(Button, u64, u64)>,
}

impl ScriptedInputs {
    fn new(time: SharedTime) -> Self {
        Self {
            time,
            events: VecDeque::new(),
            held: Vec::new(),
        }
    }

    fn event_at(mut self, at_ms: u64, event: ButtonEvent) -> Self {
        self.events.push_back((at_ms, event));
        self
    }

    fn held_during(mut self, button: Button, from_ms: u64, to_ms: u64) -> Self {
        self.held.push((button, from_ms, to_ms));
        self
    }
}

impl InputSource for ScriptedInputs {
    fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        if let Some(&(at, event)) = self.events.front() {
            if at <= now_ms {
                self.events.pop_front();
                return Some(event);
            }
        }
        None
    }

    fn is_held(&mut self, button: Button) -> bool {
        let now = self.time.get() / 1_000_000;
        self.held
            .iter()
            .any(|&(b, from, to)| b == button && now >= from && now < to)
    }
}

// =============================================================================
// Harness
// =============================================================================

struct Rig {
    energized: Rc<Cell<usize>>,
    released: Rc<Cell<usize>>,
    pulses: Rc<Cell<usize>>,
    stamps: Rc<std::cell::RefCell<Vec<u64>>>,
    lines: Rc<std::cell::RefCell<Vec<(String, String)>>>,
}

type TestSequencer =
    RailSequencer<RecordingDrive, RecordingShutter, RecordingStatus, ScriptedInputs, FakeDelay, FakeClock>;

fn build_rig(time: SharedTime, inputs: ScriptedInputs) -> (TestSequencer, Rig) {
    let (drive, energized, released) = RecordingDrive::new();
    let (shutter, pulses, stamps) = RecordingShutter::new(time.clone());
    let (status, lines) = RecordingStatus::new();

    let sequencer = RailSequencerBuilder::new()
        .config(RailConfig::default())
        .drive(drive)
        .shutter(shutter)
        .status(status)
        .inputs(inputs)
        .delay(FakeDelay(time.clone()))
        .clock(FakeClock(time))
        .build()
        .expect("rig should build");

    (
        sequencer,
        Rig {
            energized,
            released,
            pulses,
            stamps,
            lines,
        },
    )
}

/// Default rig block size: round(4096 * 0.01 / 2.0) = 20 micro-steps.
const DEFAULT_BLOCK: usize = 20;

// =============================================================================
// Manual jog
// =============================================================================

#[test]
fn jog_sixteen_microsteps_revisits_phase_and_counts_position() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone()).held_during(Button::Forward, 0, u64::MAX);
    let (mut seq, rig) = build_rig(time, inputs);

    for _ in 0..16 {
        assert_eq!(seq.tick().unwrap(), None);
    }

    // Two full phase-table cycles: index back at the start, position counted.
    assert_eq!(seq.state().step_index(), 0);
    assert_eq!(seq.state().absolute_position(), 16);
    assert_eq!(rig.energized.get(), 16);
    // Jog never releases the coils between micro-steps.
    assert_eq!(rig.released.get(), 0);
}

#[test]
fn jog_backward_counts_negative() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone()).held_during(Button::Backward, 0, u64::MAX);
    let (mut seq, _rig) = build_rig(time, inputs);

    for _ in 0..4 {
        seq.tick().unwrap();
    }

    assert_eq!(seq.state().absolute_position(), -4);
    assert_eq!(seq.state().step_index(), rail_motion::PhaseTable::LEN - 4);
}

#[test]
fn both_jog_buttons_resolve_to_no_motion() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone())
        .held_during(Button::Forward, 0, u64::MAX)
        .held_during(Button::Backward, 0, u64::MAX);
    let (mut seq, rig) = build_rig(time, inputs);

    seq.tick().unwrap();

    assert_eq!(seq.state().absolute_position(), 0);
    assert_eq!(rig.energized.get(), 0);
    // Idle tick released the outputs instead.
    assert_eq!(rig.released.get(), 1);
}

// =============================================================================
// Automatic sequence
// =============================================================================

#[test]
fn sequence_one_block_then_stop_resets_everything() {
    let time = shared_time();
    // Start pressed at t=0; the operator then holds Start as a stop request,
    // observed at the first block boundary.
    let inputs = ScriptedInputs::new(time.clone())
        .event_at(0, ButtonEvent::Start)
        .held_during(Button::Start, 100, u64::MAX);
    let (mut seq, rig) = build_rig(time, inputs);

    assert_eq!(seq.tick().unwrap(), None);

    // Exactly one full block was driven before the stop took effect.
    assert_eq!(rig.energized.get(), DEFAULT_BLOCK);
    assert!(!seq.state().is_running());
    assert_eq!(seq.state().absolute_position(), 0);
    assert_eq!(seq.state().shot_count(), 0);
    assert_eq!(rig.pulses.get(), 0);

    let lines = rig.lines.borrow();
    assert!(lines.iter().any(|(l1, _)| l1 == "Start..."));
    assert!(lines.iter().any(|(l1, _)| l1 == "Stop..."));
}

#[test]
fn sequence_block_then_double_pulse_then_next_block() {
    let time = shared_time();
    // Timeline: start ack ends at 4000 ms, block 1 ends at 4060 ms, settle
    // ends at 6060 ms (first pulse), second pulse at 6123 ms, recovery ends
    // at 7123 ms, block 2 ends at 7183 ms. Stop request opens at 6500 ms so
    // it is first observed at the second boundary.
    let inputs = ScriptedInputs::new(time.clone())
        .event_at(0, ButtonEvent::Start)
        .held_during(Button::Start, 6500, u64::MAX);
    let (mut seq, rig) = build_rig(time, inputs);

    assert_eq!(seq.tick().unwrap(), None);

    // Two blocks ran; one shot was taken between them.
    assert_eq!(rig.energized.get(), 2 * DEFAULT_BLOCK);
    assert_eq!(rig.pulses.get(), 2);

    // The two pulses of the shot are exactly the configured gap apart.
    let stamps = rig.stamps.borrow();
    assert_eq!(stamps.len(), 2);
    assert_eq!(stamps[1] - stamps[0], 63);

    // The shot was recorded before the stop zeroed the counters: the status
    // line after block 2 announces shot number 2.
    let lines = rig.lines.borrow();
    assert!(lines.iter().any(|(_, l2)| l2 == "=>D=0.02,S=2"));

    assert!(!seq.state().is_running());
    assert_eq!(seq.state().shot_count(), 0);
}

#[test]
fn start_event_while_running_acts_as_stop_not_reentry() {
    let time = shared_time();
    // Second Start edge lands during the start acknowledgement; it is
    // drained at the first block boundary and latches a stop.
    let inputs = ScriptedInputs::new(time.clone())
        .event_at(0, ButtonEvent::Start)
        .event_at(50, ButtonEvent::Start);
    let (mut seq, rig) = build_rig(time, inputs);

    assert_eq!(seq.tick().unwrap(), None);

    assert_eq!(rig.energized.get(), DEFAULT_BLOCK);
    assert_eq!(rig.pulses.get(), 0);
    assert!(!seq.state().is_running());
}

#[test]
fn drive_error_during_sequence_is_an_implicit_stop() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone()).event_at(0, ButtonEvent::Start);
    let (shutter, pulses, _stamps) = RecordingShutter::new(time.clone());
    let (status, lines) = RecordingStatus::new();

    let mut seq = RailSequencerBuilder::new()
        .config(RailConfig::default())
        .drive(FlakyDrive { successes_left: 5 })
        .shutter(shutter)
        .status(status)
        .inputs(inputs)
        .delay(FakeDelay(time.clone()))
        .clock(FakeClock(time))
        .build()
        .unwrap();

    // The failure mid-block is recovered as a stop, not surfaced.
    assert_eq!(seq.tick().unwrap(), None);
    assert!(!seq.state().is_running());
    assert_eq!(seq.state().absolute_position(), 0);
    assert_eq!(pulses.get(), 0);
    assert!(lines.borrow().iter().any(|(l1, _)| l1 == "Start..."));
}

// =============================================================================
// Idle events and step-size hold rule
// =============================================================================

#[test]
fn test_shot_event_pulses_once() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone()).event_at(0, ButtonEvent::TestShot);
    let (mut seq, rig) = build_rig(time, inputs);

    seq.tick().unwrap();

    assert_eq!(rig.pulses.get(), 1);
    assert!(!seq.state().is_running());
}

#[test]
fn reset_event_restores_step_size_floor() {
    let time = shared_time();
    // Increment held for the first poll only (one immediate apply), then a
    // reset arrives.
    let inputs = ScriptedInputs::new(time.clone())
        .held_during(Button::Increment, 0, 100)
        .event_at(300, ButtonEvent::Reset);
    let (mut seq, _rig) = build_rig(time, inputs);

    seq.tick().unwrap(); // t=0: immediate apply -> 0.02
    assert!((seq.state().step_size().0 - 0.02).abs() < 1e-6);

    seq.tick().unwrap(); // t=200: nothing pending yet
    seq.tick().unwrap(); // t=400: reset event drains

    assert!((seq.state().step_size().0 - 0.01).abs() < 1e-6);
    assert_eq!(seq.state().absolute_position(), 0);
    assert_eq!(seq.state().shot_count(), 0);
}

#[test]
fn held_increment_repeats_after_threshold() {
    let time = shared_time();
    let inputs =
        ScriptedInputs::new(time.clone()).held_during(Button::Increment, 0, u64::MAX);
    let (mut seq, _rig) = build_rig(time, inputs);

    // Polls land at t = 0, 200, 400, ... ms. The initial press applies one
    // increment; repeats begin once the hold passes 1000 ms.
    for _ in 0..7 {
        seq.tick().unwrap();
    }

    // Applies at t=0 (initial), t=1000 and t=1200 (repeats): 0.01 + 3*0.01.
    assert!((seq.state().step_size().0 - 0.04).abs() < 1e-6);
}

#[test]
fn decrement_hold_respects_floor() {
    let time = shared_time();
    let inputs =
        ScriptedInputs::new(time.clone()).held_during(Button::Decrement, 0, u64::MAX);
    let (mut seq, _rig) = build_rig(time, inputs);

    for _ in 0..20 {
        seq.tick().unwrap();
    }

    assert!((seq.state().step_size().0 - 0.01).abs() < 1e-6);
}

// =============================================================================
// Restart
// =============================================================================

#[test]
fn restart_event_exits_run_loop() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone()).event_at(0, ButtonEvent::Restart);
    let (mut seq, rig) = build_rig(time, inputs);

    assert_eq!(seq.run().unwrap(), Exit::Restart);

    let lines = rig.lines.borrow();
    assert_eq!(lines[0].0, "Ready...");
    assert!(lines.iter().any(|(l1, _)| l1 == "Restart..."));
    // Outputs were de-energized before handing control back.
    assert!(rig.released.get() >= 1);
}

#[test]
fn restart_during_sequence_exits_at_block_boundary() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone())
        .event_at(0, ButtonEvent::Start)
        .event_at(100, ButtonEvent::Restart);
    let (mut seq, rig) = build_rig(time, inputs);

    assert_eq!(seq.tick().unwrap(), Some(Exit::Restart));
    // The in-flight block completed before the restart was honored.
    assert_eq!(rig.energized.get(), DEFAULT_BLOCK);
}

// =============================================================================
// Idle status output
// =============================================================================

#[test]
fn idle_poll_refreshes_status() {
    let time = shared_time();
    let inputs = ScriptedInputs::new(time.clone());
    let (mut seq, rig) = build_rig(time, inputs);

    seq.tick().unwrap();

    let lines = rig.lines.borrow();
    assert_eq!(lines.last().unwrap().0, "Step=0.01mm");
    assert_eq!(lines.last().unwrap().1, "D=0.00,T=0");
}

// =============================================================================
// Builder
// =============================================================================

#[test]
fn builder_rejects_missing_collaborators() {
    let time = shared_time();
    let result: rail_motion::Result<TestSequencer> = RailSequencerBuilder::new()
        .delay(FakeDelay(time.clone()))
        .clock(FakeClock(time))
        .build();

    assert!(result.is_err());
}

#[test]
fn builder_rejects_invalid_config() {
    let time = shared_time();
    let mut config = RailConfig::default();
    config.timing.dwell_ms = 0;

    let inputs = ScriptedInputs::new(time.clone());
    let (drive, _, _) = RecordingDrive::new();
    let (shutter, _, _) = RecordingShutter::new(time.clone());
    let (status, _) = RecordingStatus::new();

    let result = RailSequencerBuilder::new()
        .config(config)
        .drive(drive)
        .shutter(shutter)
        .status(status)
        .inputs(inputs)
        .delay(FakeDelay(time.clone()))
        .clock(FakeClock(time))
        .build();

    assert!(result.is_err());
}
