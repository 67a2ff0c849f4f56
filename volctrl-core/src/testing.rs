//! Host-side doubles for the hardware traits

use std::collections::BTreeMap;
use std::vec::Vec;

use volctrl_hal::{FlashError, FlashStorage, StorageKey};

use crate::traits::{Indicator, Indicators, MotorActuator, MotorFault, MotorState, RunTimer};

/// RAM-backed record store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: BTreeMap<u8, Vec<u8>>,
    /// Every successful write, in order
    pub log: Vec<StorageKey>,
    /// Fail writes to this key
    pub fail_on: Option<StorageKey>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: StorageKey) -> Option<&[u8]> {
        self.records.get(&key.as_u8()).map(|v| v.as_slice())
    }
}

impl FlashStorage for MemoryStorage {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = self.records.get(&key.as_u8()).ok_or(FlashError::NotFound)?;
        if buffer.len() < data.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if self.fail_on == Some(key) {
            return Err(FlashError::Storage);
        }
        self.records.insert(key.as_u8(), data.to_vec());
        self.log.push(key);
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.records.contains_key(&key.as_u8())
    }

    fn erase_all(&mut self) -> Result<(), FlashError> {
        self.records.clear();
        Ok(())
    }
}

/// Motor double that records the pin pattern it was driven to
#[derive(Debug, Default)]
pub struct MockMotor {
    pub cw: bool,
    pub ccw: bool,
    /// Number of reversals (off, settle, new direction)
    pub reversals: usize,
}

impl MotorActuator for MockMotor {
    fn state(&mut self) -> Result<MotorState, MotorFault> {
        match (self.cw, self.ccw) {
            (false, false) => Ok(MotorState::Off),
            (true, false) => Ok(MotorState::Clockwise),
            (false, true) => Ok(MotorState::CounterClockwise),
            (true, true) => Err(MotorFault::InvalidPinState),
        }
    }

    fn off(&mut self) {
        self.cw = false;
        self.ccw = false;
    }

    fn clockwise(&mut self) {
        if self.ccw {
            self.reversals += 1;
            self.ccw = false;
        }
        self.cw = true;
    }

    fn counter_clockwise(&mut self) {
        if self.cw {
            self.reversals += 1;
            self.cw = false;
        }
        self.ccw = true;
    }
}

/// Timer double; `active` mirrors what the expiry handler would see
#[derive(Debug, Default)]
pub struct MockTimer {
    pub active: bool,
    pub starts: usize,
    pub restarts: usize,
    pub duration_ms: u16,
}

impl RunTimer for MockTimer {
    fn start(&mut self) {
        self.active = true;
        self.starts += 1;
    }

    fn restart(&mut self) {
        self.active = true;
        self.restarts += 1;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn set_duration(&mut self, duration_ms: u16) {
        self.duration_ms = duration_ms;
    }
}

/// Indicator double
#[derive(Debug, Default)]
pub struct MockLeds {
    pub error: bool,
    pub supply_5v: bool,
    pub supply_3v3: bool,
}

impl Indicators for MockLeds {
    fn set(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Error => self.error = on,
            Indicator::Supply5v => self.supply_5v = on,
            Indicator::Supply3v3 => self.supply_3v3 = on,
        }
    }

    fn is_on(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::Error => self.error,
            Indicator::Supply5v => self.supply_5v,
            Indicator::Supply3v3 => self.supply_3v3,
        }
    }
}
