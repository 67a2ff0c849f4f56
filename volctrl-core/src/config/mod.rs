//! Configuration types
//!
//! - [`ControlConfig`]: board constants fixed at build time
//! - [`Settings`]: user settings persisted to flash
//! - [`VOLUME_CURVE`]: volume step to position lookup

pub mod curve;
pub mod hardware;
pub mod settings;

pub use curve::{target_for_step, VOLUME_CURVE, VOLUME_STEPS};
pub use hardware::ControlConfig;
pub use settings::{Settings, SettingsError, MAX_INC_DURATION_MS};
