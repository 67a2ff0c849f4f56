//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in volctrl-core, generic over embedded-hal pins:
//!
//! - H-bridge motor actuator with reversal settle delay
//! - NEC infrared pulse decoder
//! - Wiper position filtering
//! - Indicator LED bank

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod indicator;
pub mod ir;
pub mod motor;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
