//! H-bridge motor actuator
//!
//! Drives the potentiometer motor through two direction inputs of an
//! H-bridge. The pin levels are the single source of truth for the
//! motor state; they are read back rather than shadowed.
//!
//! Reversing a running motor switches both pins off and waits the settle
//! delay before the new direction is driven, so the bridge never sees
//! both inputs high and the motor is not plugged into reverse.
//!
//! ```ignore
//! let mut motor = HBridgeMotor::new(cw_pin, ccw_pin, Delay, 100);
//! motor.clockwise();
//! motor.counter_clockwise(); // off, 100 ms, ccw
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;
use volctrl_core::traits::{MotorActuator, MotorFault, MotorState};

/// Two-pin H-bridge motor driver
pub struct HBridgeMotor<CW, CCW, D> {
    cw: CW,
    ccw: CCW,
    delay: D,
    /// Off time between opposite directions (ms)
    settle_ms: u32,
}

impl<CW, CCW, D> HBridgeMotor<CW, CCW, D>
where
    CW: StatefulOutputPin,
    CCW: StatefulOutputPin,
    D: DelayNs,
{
    /// Create a driver with the motor switched off
    pub fn new(cw: CW, ccw: CCW, delay: D, settle_ms: u32) -> Self {
        let mut motor = Self {
            cw,
            ccw,
            delay,
            settle_ms,
        };
        motor.off();
        motor
    }

    fn drive(&mut self, target: MotorState) {
        match self.state() {
            Ok(current) if current == target => return,
            Ok(MotorState::Off) => {}
            _ => {
                self.off();
                self.delay.delay_ms(self.settle_ms);
            }
        }

        // Release the opposite input before asserting ours
        match target {
            MotorState::Clockwise => {
                let _ = self.ccw.set_low();
                let _ = self.cw.set_high();
            }
            MotorState::CounterClockwise => {
                let _ = self.cw.set_low();
                let _ = self.ccw.set_high();
            }
            MotorState::Off => self.off(),
        }
    }
}

impl<CW, CCW, D> MotorActuator for HBridgeMotor<CW, CCW, D>
where
    CW: StatefulOutputPin,
    CCW: StatefulOutputPin,
    D: DelayNs,
{
    fn state(&mut self) -> Result<MotorState, MotorFault> {
        let cw = self.cw.is_set_high().map_err(|_| MotorFault::InvalidPinState)?;
        let ccw = self.ccw.is_set_high().map_err(|_| MotorFault::InvalidPinState)?;
        match (cw, ccw) {
            (false, false) => Ok(MotorState::Off),
            (true, false) => Ok(MotorState::Clockwise),
            (false, true) => Ok(MotorState::CounterClockwise),
            (true, true) => Err(MotorFault::InvalidPinState),
        }
    }

    fn off(&mut self) {
        let _ = self.cw.set_low();
        let _ = self.ccw.set_low();
    }

    fn clockwise(&mut self) {
        self.drive(MotorState::Clockwise);
    }

    fn counter_clockwise(&mut self) {
        self.drive(MotorState::CounterClockwise);
    }
}
