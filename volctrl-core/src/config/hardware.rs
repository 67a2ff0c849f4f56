//! Board-level control constants
//!
//! These values are fixed per board and normally generated at build time
//! from the firmware's board file. [`ControlConfig::default`] matches the
//! reference hardware.

/// Control loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlConfig {
    /// Position at or below which the wiper is at its lower end stop
    pub low_limit: u16,
    /// Position at or above which the wiper is at its upper end stop
    pub high_limit: u16,
    /// Distance to the target at which a volume search is complete
    pub tolerance: u16,
    /// Off time between opposite motor directions (ms)
    pub settle_ms: u16,
    /// Time to wait for a key press while learning a binding (ms)
    pub registration_timeout_ms: u32,
    /// Interval between "waiting" dots while learning a binding (ms)
    pub waiting_dot_ms: u32,
    /// Dots per line of the waiting indication
    pub waiting_dots_per_line: u8,
    /// Echo each received line before executing it
    pub echo: bool,
    /// Print argument vectors, targets and raw infrared frames
    pub verbose: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlConfig {
    /// Reference hardware configuration
    pub const fn new() -> Self {
        Self {
            low_limit: 10,
            high_limit: 1023,
            tolerance: 1,
            settle_ms: 100,
            registration_timeout_ms: 5000,
            waiting_dot_ms: 90,
            waiting_dots_per_line: 16,
            echo: false,
            verbose: false,
        }
    }

    /// Check if a position is at or beyond the upper end stop
    pub fn at_high_limit(&self, position: u16) -> bool {
        position >= self.high_limit
    }

    /// Check if a position is at or beyond the lower end stop
    pub fn at_low_limit(&self, position: u16) -> bool {
        position <= self.low_limit
    }
}
