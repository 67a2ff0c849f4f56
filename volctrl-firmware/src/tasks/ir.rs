//! Infrared receiver task
//!
//! Times the edges of the demodulating IR receiver and feeds the
//! intervals to the NEC decoder. The receiver output is active low: low
//! while a carrier burst is present.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use volctrl_drivers::ir::{NecDecoder, Pulse};

use crate::channels::KEYS;

#[embassy_executor::task]
pub async fn ir_task(mut receiver: Input<'static>) {
    info!("IR task started");

    let mut decoder = NecDecoder::new();
    let mut last_edge = Instant::now();

    loop {
        receiver.wait_for_any_edge().await;
        let now = Instant::now();
        let us = now.duration_since(last_edge).as_micros();
        last_edge = now;

        let us = u32::try_from(us).unwrap_or(u32::MAX);
        // Low now means the interval that just ended was a space
        let pulse = if receiver.is_low() {
            Pulse::Space(us)
        } else {
            Pulse::Mark(us)
        };

        if let Some(key) = decoder.feed(pulse) {
            debug!(
                "IR key: address={:#x} command={:#x} repeat={}",
                key.code.address, key.code.command, key.repeat
            );
            KEYS.post(key);
        }
    }
}
