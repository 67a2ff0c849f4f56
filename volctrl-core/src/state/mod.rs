//! Motor-control state machine
//!
//! Defines the states of the control loop and how a running motion
//! reacts to a newly arrived command.

pub mod events;
pub mod machine;

pub use events::MotionRequest;
pub use machine::{ControlState, Reaction};
