//! Board-agnostic control logic for the volume controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (motor, run-timer, indicators)
//! - Command line assembly, parsing and the command registry
//! - Infrared key-binding store with durable mirroring
//! - Motor-control state machine and command handlers
//! - Shared sample cells written from interrupt context
//! - Fault latch and configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod control;
pub mod keys;
pub mod safety;
pub mod state;
pub mod sync;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
