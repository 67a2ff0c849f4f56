//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and hardware-specific implementations.

pub mod indicator;
pub mod motor;
pub mod timer;

pub use indicator::{Indicator, Indicators};
pub use motor::{MotorActuator, MotorFault, MotorState};
pub use timer::RunTimer;
