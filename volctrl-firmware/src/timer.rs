//! Run-timer handle for the control loop
//!
//! The countdown itself runs in [`crate::tasks::run_timer_task`]. The
//! active flag is raised here, synchronously, so the very next control
//! step already sees a running timer.

use volctrl_core::traits::RunTimer;

use crate::channels::{TimerCommand, SAMPLES, TIMER_CMD};

/// [`RunTimer`] backed by the run-timer task
pub struct SignalRunTimer {
    duration_ms: u16,
}

impl SignalRunTimer {
    pub const fn new(duration_ms: u16) -> Self {
        Self { duration_ms }
    }

    fn arm(&self) {
        SAMPLES.set_timer_active(true);
        TIMER_CMD.signal(TimerCommand::Arm(self.duration_ms));
    }
}

impl RunTimer for SignalRunTimer {
    fn start(&mut self) {
        self.arm();
    }

    fn restart(&mut self) {
        self.arm();
    }

    fn stop(&mut self) {
        SAMPLES.set_timer_active(false);
        TIMER_CMD.signal(TimerCommand::Stop);
    }

    fn set_duration(&mut self, duration_ms: u16) {
        self.duration_ms = duration_ms;
    }
}
