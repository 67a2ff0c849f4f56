//! Key learning wait
//!
//! `regrem` validates its request up front and then waits for the next
//! infrared key as a sub-state of the control loop. The wait is polled
//! once per tick and can only end with a key or a timeout.

use core::fmt::Write;

use crate::config::ControlConfig;
use crate::keys::{IrKey, KeyCode, PendingRegistration};

/// Outcome of one poll of the wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPoll {
    /// Still waiting
    Waiting,
    /// A key arrived
    Received(KeyCode),
    /// The deadline passed without a key
    TimedOut,
}

/// An in-progress key learning request
#[derive(Debug, Clone)]
pub struct RegistrationWait {
    pending: PendingRegistration,
    started_ms: u32,
    last_dot_ms: u32,
    dots: u8,
}

impl RegistrationWait {
    /// Start waiting at `now_ms`
    pub fn new(pending: PendingRegistration, now_ms: u32) -> Self {
        Self {
            pending,
            started_ms: now_ms,
            last_dot_ms: now_ms,
            dots: 0,
        }
    }

    /// Consume the wait, keeping its request
    pub fn into_pending(self) -> PendingRegistration {
        self.pending
    }

    /// Milliseconds since the wait started
    pub fn elapsed_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.started_ms)
    }

    /// Advance the wait by one tick
    ///
    /// Repeat frames of a held key are not accepted. A key arriving on
    /// the deadline tick still counts. While waiting, a dot is written
    /// every `waiting_dot_ms`, returning to the line start after
    /// `waiting_dots_per_line` dots. Dots that do not fit `out` are
    /// dropped.
    pub fn poll<W: Write>(
        &mut self,
        key: Option<IrKey>,
        now_ms: u32,
        config: &ControlConfig,
        out: &mut W,
    ) -> WaitPoll {
        if let Some(key) = key.filter(|k| !k.repeat) {
            return WaitPoll::Received(key.code);
        }

        if self.elapsed_ms(now_ms) >= config.registration_timeout_ms {
            return WaitPoll::TimedOut;
        }

        if now_ms.wrapping_sub(self.last_dot_ms) >= config.waiting_dot_ms {
            self.last_dot_ms = now_ms;
            if self.dots >= config.waiting_dots_per_line {
                let _ = out.write_char('\r');
                self.dots = 0;
            }
            let _ = out.write_char('.');
            self.dots += 1;
        }

        WaitPoll::Waiting
    }
}
