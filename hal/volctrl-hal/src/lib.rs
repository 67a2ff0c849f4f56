//! volctrl Hardware Abstraction Layer
//!
//! This crate defines the persistence interface shared by the board-agnostic
//! control logic and the chip-specific HALs. Keeping it separate lets
//! `volctrl-core` stay host-testable while `volctrl-hal-rp2040` supplies the
//! flash-backed implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (volctrl-firmware)         │
//! └─────────────────────────────────────────┘
//!            │                     │
//!            ▼                     ▼
//! ┌────────────────────┐  ┌────────────────────┐
//! │   volctrl-core     │  │ volctrl-hal-rp2040 │
//! └────────────────────┘  └────────────────────┘
//!            │                     │
//!            └──────────┬──────────┘
//!                       ▼
//! ┌─────────────────────────────────────────┐
//! │  volctrl-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashStorage`] - Persistent key/value records

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey, MAX_KEY_SLOTS};
