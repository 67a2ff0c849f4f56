//! Run-timer task
//!
//! Counts down one volup/voldown run. A new command replaces the running
//! countdown; expiry clears the active flag the control loop watches.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use crate::channels::{TimerCommand, SAMPLES, TIMER_CMD};

#[embassy_executor::task]
pub async fn run_timer_task() {
    info!("Run-timer task started");

    let mut command = TIMER_CMD.wait().await;
    loop {
        command = match command {
            TimerCommand::Stop => TIMER_CMD.wait().await,
            TimerCommand::Arm(duration_ms) => {
                let expiry = Timer::after(Duration::from_millis(u64::from(duration_ms)));
                match select(expiry, TIMER_CMD.wait()).await {
                    Either::First(()) => {
                        trace!("Run-timer expired after {}ms", duration_ms);
                        // A restart racing the expiry keeps the run alive
                        if !TIMER_CMD.signaled() {
                            SAMPLES.set_timer_active(false);
                        }
                        TIMER_CMD.wait().await
                    }
                    Either::Second(next) => next,
                }
            }
        };
    }
}
