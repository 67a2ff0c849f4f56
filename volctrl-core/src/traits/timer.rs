//! Run-timer trait
//!
//! The run-timer bounds how long a single volup/voldown keeps the motor
//! turning. Expiry is reported asynchronously by clearing the
//! `timer_active` flag of the [`SampleChannel`](crate::sync::SampleChannel).

/// Retriggerable one-shot timer
pub trait RunTimer {
    /// Start the countdown and mark the timer active
    fn start(&mut self);

    /// Restart a running countdown from zero
    fn restart(&mut self);

    /// Stop the countdown and mark the timer inactive
    fn stop(&mut self);

    /// Reprogram the countdown length in milliseconds
    fn set_duration(&mut self, duration_ms: u16);
}
