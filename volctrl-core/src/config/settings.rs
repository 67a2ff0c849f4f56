//! Persisted user settings
//!
//! Each field is its own flash record so that a command touching one
//! setting rewrites only that record. Records are postcard-encoded.

use serde::{de::DeserializeOwned, Serialize};
use volctrl_hal::{FlashError, FlashStorage, StorageKey};

/// Default run-timer duration (ms)
pub const DEFAULT_INC_DURATION_MS: u16 = 150;

/// Upper bound of the run-timer duration (ms)
pub const MAX_INC_DURATION_MS: u16 = 1400;

/// Largest encoded setting
const RECORD_BUF_SIZE: usize = 8;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Flash operation failed
    Flash(FlashError),
    /// Record could not be decoded
    Deserialize,
    /// Decoded value is outside its valid range
    OutOfRange,
}

impl From<FlashError> for SettingsError {
    fn from(e: FlashError) -> Self {
        SettingsError::Flash(e)
    }
}

/// User settings restored at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// 5V supply indicator on
    pub led_5v: bool,
    /// 3.3V supply indicator on
    pub led_3v3: bool,
    /// Run-timer duration (ms)
    pub inc_duration_ms: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Factory defaults: both indicators on, 150 ms run-timer
    pub const fn new() -> Self {
        Self {
            led_5v: true,
            led_3v3: true,
            inc_duration_ms: DEFAULT_INC_DURATION_MS,
        }
    }

    /// Load all settings, using the default for each missing record
    pub fn load<S: FlashStorage>(storage: &mut S) -> Result<Self, SettingsError> {
        let defaults = Self::new();
        Ok(Self {
            led_5v: read_or(storage, StorageKey::Led5v, defaults.led_5v)?,
            led_3v3: read_or(storage, StorageKey::Led3v3, defaults.led_3v3)?,
            inc_duration_ms: Self::read_inc_duration(storage).or_else(|e| match e {
                SettingsError::Flash(FlashError::NotFound) => Ok(defaults.inc_duration_ms),
                e => Err(e),
            })?,
        })
    }

    /// Read the persisted run-timer duration
    pub fn read_inc_duration<S: FlashStorage>(storage: &mut S) -> Result<u16, SettingsError> {
        let value: u16 = read(storage, StorageKey::IncDuration)?;
        if value > MAX_INC_DURATION_MS {
            return Err(SettingsError::OutOfRange);
        }
        Ok(value)
    }

    /// Persist an indicator state
    pub fn store_led<S: FlashStorage>(
        storage: &mut S,
        key: StorageKey,
        on: bool,
    ) -> Result<(), SettingsError> {
        write(storage, key, &on)
    }

    /// Persist the run-timer duration
    pub fn store_inc_duration<S: FlashStorage>(
        storage: &mut S,
        duration_ms: u16,
    ) -> Result<(), SettingsError> {
        if duration_ms > MAX_INC_DURATION_MS {
            return Err(SettingsError::OutOfRange);
        }
        write(storage, StorageKey::IncDuration, &duration_ms)
    }
}

fn read<S: FlashStorage, T: DeserializeOwned>(
    storage: &mut S,
    key: StorageKey,
) -> Result<T, SettingsError> {
    let mut buf = [0u8; RECORD_BUF_SIZE];
    let len = storage.read(key, &mut buf)?;
    postcard::from_bytes(&buf[..len]).map_err(|_| SettingsError::Deserialize)
}

fn read_or<S: FlashStorage, T: DeserializeOwned>(
    storage: &mut S,
    key: StorageKey,
    default: T,
) -> Result<T, SettingsError> {
    match read(storage, key) {
        Err(SettingsError::Flash(FlashError::NotFound)) => Ok(default),
        other => other,
    }
}

fn write<S: FlashStorage, T: Serialize>(
    storage: &mut S,
    key: StorageKey,
    value: &T,
) -> Result<(), SettingsError> {
    let mut buf = [0u8; RECORD_BUF_SIZE];
    let encoded = postcard::to_slice(value, &mut buf).map_err(|_| SettingsError::Deserialize)?;
    storage.write(key, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStorage;

    #[test]
    fn test_defaults_on_fresh_device() {
        let mut storage = MemoryStorage::new();
        let settings = Settings::load(&mut storage).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.led_5v);
        assert!(settings.led_3v3);
        assert_eq!(settings.inc_duration_ms, 150);
    }

    #[test]
    fn test_store_and_load() {
        let mut storage = MemoryStorage::new();
        Settings::store_led(&mut storage, StorageKey::Led5v, false).unwrap();
        Settings::store_inc_duration(&mut storage, 400).unwrap();

        let settings = Settings::load(&mut storage).unwrap();
        assert!(!settings.led_5v);
        assert!(settings.led_3v3);
        assert_eq!(settings.inc_duration_ms, 400);
    }

    #[test]
    fn test_inc_duration_range() {
        let mut storage = MemoryStorage::new();
        assert!(Settings::store_inc_duration(&mut storage, MAX_INC_DURATION_MS).is_ok());
        assert_eq!(
            Settings::store_inc_duration(&mut storage, MAX_INC_DURATION_MS + 1),
            Err(SettingsError::OutOfRange)
        );
    }

    #[test]
    fn test_corrupted_record() {
        let mut storage = MemoryStorage::new();
        storage.write(StorageKey::Led3v3, &[7]).unwrap();
        assert_eq!(
            Settings::load(&mut storage),
            Err(SettingsError::Deserialize)
        );
    }
}
