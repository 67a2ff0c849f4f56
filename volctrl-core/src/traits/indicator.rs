//! Indicator LED trait

/// Front-panel indicator LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Latched fault indicator
    Error,
    /// 5V supply indicator
    Supply5v,
    /// 3.3V supply indicator
    Supply3v3,
}

/// Bank of on/off indicator outputs
pub trait Indicators {
    /// Switch an indicator on or off
    fn set(&mut self, indicator: Indicator, on: bool);

    /// Get the last commanded state of an indicator
    fn is_on(&self, indicator: Indicator) -> bool;
}
