//! Inter-task communication channels
//!
//! Serial lines and timer commands use embassy-sync primitives. Positions,
//! the run-timer flag and IR keys go through the core's sample cells so the
//! control loop reads them in one snapshot per tick.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use volctrl_core::command::Line;
use volctrl_core::sync::{KeyMailbox, SampleChannel};

/// Completed lines waiting for the control loop
const LINE_CHANNEL_SIZE: usize = 2;

/// Command lines from the serial receiver
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> =
    Channel::new();

/// Set by the serial receiver when a line was discarded for length
pub static LINE_OVERFLOW: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Wiper position and run-timer state
pub static SAMPLES: SampleChannel = SampleChannel::new();

/// Latest decoded IR key
pub static KEYS: KeyMailbox = KeyMailbox::new();

/// Run-timer command
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum TimerCommand {
    /// Count down from the given length (ms), replacing any running countdown
    Arm(u16),
    /// Cancel the countdown
    Stop,
}

/// Run-timer commands (updated by the control loop)
pub static TIMER_CMD: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();
