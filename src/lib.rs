//! # rail-motion
//!
//! Camera-rail time-lapse controller for stepper-driven macro rails with
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **embedded-hal 1.0**: `OutputPin` for the coil driver and shutter,
//!   `InputPin` for the operator buttons, `DelayNs` for all timing
//! - **no_std compatible**: Core library works without standard library
//! - **Configuration-driven**: Rail geometry and timing from TOML files
//! - **Three operating modes**: idle polling, manual jog, and the automatic
//!   move-settle-shoot sequence
//! - **Position tracking**: Absolute micro-step position tracked at all times
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rail_motion::{
//!     ButtonPanel, FourWireDriver, GpioShutter, RailSequencerBuilder, StdClock,
//! };
//!
//! // Load configuration from TOML (reference-rig defaults if omitted)
//! let config = rail_motion::load_config("rail.toml")?;
//!
//! let mut sequencer = RailSequencerBuilder::new()
//!     .config(config)
//!     .drive(FourWireDriver::new(in1, in2, in3, in4))
//!     .shutter(GpioShutter::new(shot_pin, shutter_delay))
//!     .status(lcd)
//!     .inputs(ButtonPanel::new(buttons, 400))
//!     .delay(delay)
//!     .clock(StdClock::new())
//!     .build()?;
//!
//! // Blocks until the operator requests a restart
//! let exit = sequencer.run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing, and the std clock
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod clock;
pub mod config;
pub mod control;
pub mod drive;
pub mod error;
pub mod input;
pub mod sequencer;
pub mod status;

// Re-exports for ergonomic API
pub use clock::Monotonic;
pub use config::{validate_config, RailConfig, RailGeometry, TimingConfig};
pub use control::{Button, ButtonEvent, ControlState};
pub use drive::{CoilDrive, FourWireDriver, GpioShutter, PhasePattern, PhaseTable, Shutter, Travel};
pub use error::{Error, Result};
pub use input::{ButtonPanel, Debouncer, InputSource};
pub use sequencer::{Exit, RailSequencer, RailSequencerBuilder};
pub use status::{NullStatus, StatusSink};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Std clock and console status sink
#[cfg(feature = "std")]
pub use clock::StdClock;
#[cfg(feature = "std")]
pub use status::StdoutStatus;

// Unit types
pub use config::units::{Microsteps, Millimeters};
