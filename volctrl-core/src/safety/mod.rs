//! Safety monitoring
//!
//! Latches runtime consistency faults and drives the error indicator.

pub mod monitor;

pub use monitor::{FaultKind, FaultMonitor};
