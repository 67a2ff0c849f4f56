//! RP2040-specific HAL for the volume controller firmware
//!
//! Provides the RP2040 implementation of the shared `volctrl-hal`
//! flash storage trait.

#![no_std]

pub mod flash;

// Re-export shared traits from volctrl-hal for convenience
pub use volctrl_hal::{FlashStorage as FlashStorageTrait, StorageKey};
