//! Input module for rail-motion.
//!
//! Provides debounced edge detection and the operator button panel.

mod debounce;
mod panel;

pub use debounce::Debouncer;
pub use panel::{ButtonPanel, InputSource};
