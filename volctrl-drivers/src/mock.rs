//! Pin and delay doubles for driver tests

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

/// Shared record of pin writes and delays, in order
#[derive(Debug, Default, Clone)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    DelayMs(u32),
}

impl Trace {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}

/// Output pin that records its writes
pub struct MockPin {
    name: &'static str,
    high: Rc<Cell<bool>>,
    trace: Trace,
}

impl MockPin {
    pub fn new(name: &'static str, trace: &Trace) -> Self {
        Self {
            name,
            high: Rc::new(Cell::new(false)),
            trace: trace.clone(),
        }
    }

    /// Handle to the pin level, usable after the pin is moved
    pub fn level(&self) -> Rc<Cell<bool>> {
        self.high.clone()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high.set(false);
        self.trace.push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high.set(true);
        self.trace.push(Event::Pin(self.name, true));
        Ok(())
    }
}

impl StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

/// Delay that records instead of sleeping
pub struct MockDelay {
    trace: Trace,
}

impl MockDelay {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.trace.push(Event::DelayMs(ms));
    }
}
