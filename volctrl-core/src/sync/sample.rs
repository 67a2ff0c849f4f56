//! Shared sample cells
//!
//! - Position: written by the ADC handler, read by the control loop
//! - Timer active: set when the loop starts the run-timer, cleared by
//!   the expiry handler
//! - Key mailbox: single slot written by the infrared decoder

use core::cell::Cell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, Ordering};

use crate::keys::IrKey;

/// Consistent view of the shared state for one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Latest wiper position (0-1023)
    pub position: u16,
    /// Run-timer has not yet expired
    pub timer_active: bool,
}

/// Position and run-timer state shared with event handlers
pub struct SampleChannel {
    position: Mutex<Cell<u16>>,
    timer_active: AtomicBool,
}

impl Default for SampleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleChannel {
    /// Create a channel with position 0 and the timer idle
    pub const fn new() -> Self {
        Self {
            position: Mutex::new(Cell::new(0)),
            timer_active: AtomicBool::new(false),
        }
    }

    /// Publish a new position reading
    pub fn publish_position(&self, position: u16) {
        critical_section::with(|cs| self.position.borrow(cs).set(position));
    }

    /// Mark the run-timer running or expired
    pub fn set_timer_active(&self, active: bool) {
        self.timer_active.store(active, Ordering::Release);
    }

    /// Latest position reading
    pub fn position(&self) -> u16 {
        critical_section::with(|cs| self.position.borrow(cs).get())
    }

    /// Check if the run-timer is running
    pub fn timer_active(&self) -> bool {
        self.timer_active.load(Ordering::Acquire)
    }

    /// Take a tear-free snapshot of both values
    pub fn snapshot(&self) -> Sample {
        critical_section::with(|cs| Sample {
            position: self.position.borrow(cs).get(),
            timer_active: self.timer_active.load(Ordering::Acquire),
        })
    }
}

/// Single-slot mailbox for decoded infrared keys
///
/// A newer key overwrites an unread one; the loop only acts on the
/// latest press.
pub struct KeyMailbox {
    slot: Mutex<Cell<Option<IrKey>>>,
}

impl Default for KeyMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMailbox {
    /// Create an empty mailbox
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Post a decoded key
    pub fn post(&self, key: IrKey) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(key)));
    }

    /// Take the pending key, if any
    pub fn take(&self) -> Option<IrKey> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCode;

    #[test]
    fn test_snapshot_reflects_latest_values() {
        let channel = SampleChannel::new();
        assert_eq!(channel.snapshot(), Sample::default());

        channel.publish_position(512);
        channel.set_timer_active(true);
        assert_eq!(
            channel.snapshot(),
            Sample {
                position: 512,
                timer_active: true
            }
        );

        channel.set_timer_active(false);
        assert!(!channel.timer_active());
        assert_eq!(channel.position(), 512);
    }

    #[test]
    fn test_snapshot_never_tears() {
        static CHANNEL: SampleChannel = SampleChannel::new();
        let writer = std::thread::spawn(|| {
            for i in 0..10_000u32 {
                let value = if i % 2 == 0 { 0x00FF } else { 0xFF00 };
                CHANNEL.publish_position(value);
            }
        });
        for _ in 0..10_000 {
            let position = CHANNEL.snapshot().position;
            assert!(matches!(position, 0 | 0x00FF | 0xFF00));
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_mailbox_latest_wins() {
        let mailbox = KeyMailbox::new();
        assert_eq!(mailbox.take(), None);

        mailbox.post(IrKey::pressed(KeyCode::new(2, 1, 1)));
        mailbox.post(IrKey::repeated(KeyCode::new(2, 1, 2)));
        assert_eq!(mailbox.take(), Some(IrKey::repeated(KeyCode::new(2, 1, 2))));
        assert_eq!(mailbox.take(), None);
    }
}
