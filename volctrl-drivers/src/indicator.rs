//! Indicator LED bank
//!
//! Front-panel LEDs on plain GPIO outputs. Each LED can be wired
//! active-high or active-low; the bank keeps the logical state.

use embedded_hal::digital::OutputPin;
use volctrl_core::traits::{Indicator, Indicators};

/// One LED output
pub struct Led<P> {
    pin: P,
    /// If true, LED on = pin low
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> Led<P> {
    /// Create an LED output, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            on: false,
        };
        led.set(false);
        led
    }

    /// Create an active-high LED output
    pub fn active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Switch the LED
    pub fn set(&mut self, on: bool) {
        self.on = on;
        let _ = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }

    /// Check if the LED is on
    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Error, 5V and 3.3V indicators
pub struct LedBank<E, P5, P3> {
    error: Led<E>,
    supply_5v: Led<P5>,
    supply_3v3: Led<P3>,
}

impl<E: OutputPin, P5: OutputPin, P3: OutputPin> LedBank<E, P5, P3> {
    /// Create a bank from its three LEDs
    pub fn new(error: Led<E>, supply_5v: Led<P5>, supply_3v3: Led<P3>) -> Self {
        Self {
            error,
            supply_5v,
            supply_3v3,
        }
    }
}

impl<E: OutputPin, P5: OutputPin, P3: OutputPin> Indicators for LedBank<E, P5, P3> {
    fn set(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Error => self.error.set(on),
            Indicator::Supply5v => self.supply_5v.set(on),
            Indicator::Supply3v3 => self.supply_3v3.set(on),
        }
    }

    fn is_on(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::Error => self.error.is_on(),
            Indicator::Supply5v => self.supply_5v.is_on(),
            Indicator::Supply3v3 => self.supply_3v3.is_on(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPin, Trace};

    #[test]
    fn test_starts_off() {
        let trace = Trace::default();
        let pin = MockPin::new("err", &trace);
        let level = pin.level();
        let led = Led::active_high(pin);
        assert!(!led.is_on());
        assert!(!level.get());
    }

    #[test]
    fn test_inverted_output() {
        let trace = Trace::default();
        let pin = MockPin::new("5v", &trace);
        let level = pin.level();
        let mut led = Led::new(pin, true);
        assert!(level.get());

        led.set(true);
        assert!(led.is_on());
        assert!(!level.get());
    }

    #[test]
    fn test_bank_routes_indicators() {
        let trace = Trace::default();
        let error = MockPin::new("err", &trace);
        let p5 = MockPin::new("5v", &trace);
        let p3 = MockPin::new("3v3", &trace);
        let (error_level, p3_level) = (error.level(), p3.level());
        let mut bank = LedBank::new(
            Led::active_high(error),
            Led::active_high(p5),
            Led::active_high(p3),
        );

        bank.set(Indicator::Error, true);
        bank.set(Indicator::Supply3v3, true);
        assert!(error_level.get());
        assert!(p3_level.get());
        assert!(bank.is_on(Indicator::Error));
        assert!(!bank.is_on(Indicator::Supply5v));
    }
}
