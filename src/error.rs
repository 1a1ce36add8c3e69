//! Error types for rail-motion library.
//!
//! Provides unified error handling across configuration and drive hardware.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all rail-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Drive hardware error (coil outputs or shutter line)
    Drive(DriveError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Invalid steps per revolution (must be > 0)
    InvalidStepsPerRevolution(u16),
    /// Invalid lead-screw pitch (must be > 0)
    InvalidScrewPitch(f32),
    /// Invalid minimum step size (must be > 0)
    InvalidMinStep(f32),
    /// Invalid phase dwell time (must be > 0)
    InvalidDwell(u32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Drive hardware errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// Writing a coil output pin failed
    CoilPinError,
    /// Pulsing the shutter line failed
    ShutterPinError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Drive(e) => write!(f, "Drive error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidScrewPitch(v) => write!(f, "Invalid screw pitch: {} mm. Must be > 0", v),
            ConfigError::InvalidMinStep(v) => write!(f, "Invalid minimum step size: {} mm. Must be > 0", v),
            ConfigError::InvalidDwell(v) => write!(f, "Invalid dwell time: {} ms. Must be > 0", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::CoilPinError => write!(f, "Coil output pin operation failed"),
            DriveError::ShutterPinError => write!(f, "Shutter pin operation failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DriveError> for Error {
    fn from(e: DriveError) -> Self {
        Error::Drive(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for DriveError {}
