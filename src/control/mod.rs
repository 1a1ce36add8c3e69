//! Control module for rail-motion.
//!
//! Provides the shared control state and the button/event vocabulary.

mod events;
mod state;

pub use events::{Button, ButtonEvent};
pub use state::ControlState;
