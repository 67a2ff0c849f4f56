//! Motor actuator trait
//!
//! The potentiometer motor is driven through two direction pins of an
//! H-bridge. Exactly one pin high selects a direction, both low is off.
//! Both high would short the bridge and is reported as a fault.

/// Observed motor drive state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Both direction pins low
    #[default]
    Off,
    /// Clockwise (volume up)
    Clockwise,
    /// Counter-clockwise (volume down)
    CounterClockwise,
}

/// Errors reported by a motor actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorFault {
    /// Direction pins read back a pattern outside {off, cw, ccw}
    InvalidPinState,
}

/// Direction-pin motor actuator
///
/// Implementations own the reversal sequence: commanding the opposite
/// direction of a running motor must switch it off, wait the settle
/// delay, then drive the new direction. Commanding the direction the
/// motor already runs in is a no-op.
pub trait MotorActuator {
    /// Read back the current drive state from the pins
    fn state(&mut self) -> Result<MotorState, MotorFault>;

    /// Switch both direction outputs off
    fn off(&mut self);

    /// Drive clockwise
    fn clockwise(&mut self);

    /// Drive counter-clockwise
    fn counter_clockwise(&mut self);
}
