//! Drive module for rail-motion.
//!
//! Provides the phase table, the 4-wire coil driver, and the shutter release.

mod coils;
mod phase;
mod shutter;

pub use coils::{CoilDrive, FourWireDriver};
pub use phase::{PhasePattern, PhaseTable, Travel};
pub use shutter::{GpioShutter, Shutter};
