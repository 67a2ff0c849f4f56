//! Board configuration and boot-time restore
//!
//! Board constants come from volctrl.toml via build.rs. Settings and key
//! bindings are restored from flash, falling back to defaults when the
//! records are unreadable.

use defmt::*;

use volctrl_core::config::{ControlConfig, Settings};
use volctrl_core::keys::KeyBindingStore;
use volctrl_hal_rp2040::{FlashStorageTrait, StorageKey};

/// Constants generated from volctrl.toml
pub mod board {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

/// Control loop configuration for this board
pub const fn control_config() -> ControlConfig {
    ControlConfig {
        low_limit: board::LOW_LIMIT,
        high_limit: board::HIGH_LIMIT,
        tolerance: board::TOLERANCE,
        settle_ms: board::SETTLE_MS,
        registration_timeout_ms: board::REGISTRATION_TIMEOUT_MS,
        echo: board::ECHO,
        verbose: board::VERBOSE,
        ..ControlConfig::new()
    }
}

/// Restore persisted settings
///
/// On a fresh device the board's run-timer default is written to flash so
/// later reads agree with the value in use.
pub fn load_settings<S: FlashStorageTrait>(storage: &mut S) -> Settings {
    if !storage.exists(StorageKey::IncDuration) {
        info!(
            "No stored run-timer duration, writing board default {}ms",
            board::DEFAULT_INC_DURATION_MS
        );
        if let Err(e) = Settings::store_inc_duration(storage, board::DEFAULT_INC_DURATION_MS) {
            warn!("Failed to store run-timer default: {:?}", e);
        }
    }

    match Settings::load(storage) {
        Ok(settings) => {
            info!(
                "Settings restored: 5V LED={}, 3V3 LED={}, run-timer={}ms",
                settings.led_5v, settings.led_3v3, settings.inc_duration_ms
            );
            settings
        }
        Err(e) => {
            warn!("Settings unreadable ({:?}), using defaults", e);
            Settings {
                inc_duration_ms: board::DEFAULT_INC_DURATION_MS,
                ..Settings::new()
            }
        }
    }
}

/// Restore the key binding store
pub fn load_keys<S: FlashStorageTrait>(storage: &mut S) -> KeyBindingStore {
    match KeyBindingStore::load(storage) {
        Ok(keys) => {
            info!("Restored {} key bindings", keys.len());
            keys
        }
        Err(e) => {
            warn!("Key bindings unreadable ({:?}), starting empty", e);
            KeyBindingStore::new()
        }
    }
}
