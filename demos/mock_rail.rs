//! Basic rail control example.
//!
//! Demonstrates building the sequencer from configuration, the rail
//! geometry math behind movement blocks, and a few control-loop ticks.
//!
//! This example uses mock hardware so it runs without a real rail.

use rail_motion::{
    config::units::Millimeters, ButtonPanel, FourWireDriver, GpioShutter, PhaseTable,
    RailSequencerBuilder, StdClock, StdoutStatus, Travel,
};

/// Delay provider backed by the host clock.
struct SleepDelay;

impl embedded_hal::delay::DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Mock output pin for demonstration.
struct MockPin {
    state: bool,
}

impl MockPin {
    fn new() -> Self {
        Self { state: false }
    }
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }
}

impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.state)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state)
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

fn main() {
    println!("=== Rail Control Example ===\n");

    // Load configuration from TOML
    let toml_content = r#"
name = "demo_rail"
steps_per_revolution = 512
microsteps = 8
screw_pitch_mm = 2.0
min_step_mm = 0.01

[timing]
dwell_ms = 3
idle_poll_ms = 200
"#;

    let config = rail_motion::parse_config(toml_content).expect("Failed to parse config");
    println!("Loaded configuration for rail '{}'", config.name);
    println!(
        "Micro-steps per revolution: {}",
        config.microsteps_per_revolution()
    );

    // Create mock hardware
    let drive = FourWireDriver::new(
        MockPin::new(),
        MockPin::new(),
        MockPin::new(),
        MockPin::new(),
    );
    let shutter = GpioShutter::new(MockPin::new(), SleepDelay);
    let panel = ButtonPanel::new(
        [
            MockPin::new(), // forward
            MockPin::new(), // backward
            MockPin::new(), // reset
            MockPin::new(), // increment
            MockPin::new(), // decrement
            MockPin::new(), // start
            MockPin::new(), // test shot
            MockPin::new(), // restart
        ],
        config.timing.debounce_ms,
    );

    let mut sequencer = RailSequencerBuilder::new()
        .config(config)
        .drive(drive)
        .shutter(shutter)
        .status(StdoutStatus)
        .inputs(panel)
        .delay(SleepDelay)
        .clock(StdClock::new())
        .build()
        .expect("Failed to build sequencer");

    // Demonstrate the geometry behind movement blocks
    println!("\n=== Rail Geometry ===");
    let geometry = *sequencer.geometry();
    for hundredths in [1u32, 10, 50, 100] {
        let step = Millimeters(hundredths as f32 * 0.01);
        println!(
            "Step {:.2} mm -> block of {} micro-steps",
            step.0,
            geometry.block_microsteps(step)
        );
    }
    println!(
        "One full revolution moves the carriage {:.3} mm",
        geometry
            .distance_mm(geometry.microsteps_per_revolution as i64)
            .0
    );

    // Walk one full phase cycle by hand
    println!("\n=== Phase Table ===");
    let mut index = 0;
    for _ in 0..PhaseTable::LEN {
        let (next, pattern) = PhaseTable::advance(index, Travel::Forward);
        println!("index {} -> coils {:?}", index, pattern.0);
        index = next;
    }

    // A few idle control-loop ticks (no buttons pressed)
    println!("\n=== Control Loop ===");
    for _ in 0..3 {
        sequencer.tick().expect("tick failed");
    }
    println!(
        "Position after idle ticks: {} micro-steps, step size {:.2} mm",
        sequencer.state().absolute_position(),
        sequencer.state().step_size().0
    );

    println!("\n=== Example Complete ===");
    println!("On real hardware, hold the jog buttons to move the carriage.");
}
