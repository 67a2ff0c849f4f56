//! Fault latch
//!
//! Runtime consistency faults do not stop the firmware: the control loop
//! returns to its idle state and keeps accepting commands. The fault stays
//! latched (and the error indicator lit) until explicitly cleared.

use crate::traits::{Indicator, Indicators};

/// Runtime consistency faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Motor direction pins read back both high
    InvalidMotorPins,
    /// Motor found running while the run-timer was idle
    RunWithoutTimer,
    /// Motor direction disagrees with the sign of the volume error
    VolumeSearch,
    /// Persisted setting differs from the value in use
    SettingsMismatch,
}

/// Latched fault state
#[derive(Debug, Clone, Default)]
pub struct FaultMonitor {
    /// Most recent fault
    last: Option<FaultKind>,
    /// Faults raised since boot
    count: u16,
    latched: bool,
}

impl FaultMonitor {
    /// Create a monitor with no fault latched
    pub const fn new() -> Self {
        Self {
            last: None,
            count: 0,
            latched: false,
        }
    }

    /// Latch a fault and light the error indicator
    pub fn raise<I: Indicators>(&mut self, kind: FaultKind, indicators: &mut I) {
        self.last = Some(kind);
        self.count = self.count.saturating_add(1);
        self.latched = true;
        indicators.set(Indicator::Error, true);
    }

    /// Clear the latch and the error indicator
    ///
    /// The last fault kind is kept for diagnostics.
    pub fn clear<I: Indicators>(&mut self, indicators: &mut I) {
        self.latched = false;
        indicators.set(Indicator::Error, false);
    }

    /// Check if a fault is latched
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Most recent fault since boot
    pub fn last(&self) -> Option<FaultKind> {
        self.last
    }

    /// Number of faults raised since boot
    pub fn count(&self) -> u16 {
        self.count
    }
}
