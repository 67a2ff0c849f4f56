//! Wiper position sampling task
//!
//! Reads the potentiometer wiper every millisecond, filters it and
//! publishes the 10-bit position for the control loop.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use volctrl_drivers::sensor::PositionFilter;

use crate::channels::SAMPLES;

/// Sampling interval in milliseconds
const SAMPLE_INTERVAL_MS: u64 = 1;

/// Readings averaged per published position
const FILTER_LEN: usize = 8;

#[embassy_executor::task]
pub async fn adc_task(mut adc: Adc<'static, Async>, mut wiper: Channel<'static>) {
    info!("ADC task started");

    let mut filter = PositionFilter::<FILTER_LEN>::new();
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));
    let mut failures: u32 = 0;

    loop {
        ticker.next().await;

        match adc.read(&mut wiper).await {
            Ok(raw) => {
                failures = 0;
                SAMPLES.publish_position(filter.push(raw));
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                // Keep the last published position; only report the first failure
                if failures == 1 {
                    warn!("ADC read failed: {:?}", e);
                }
            }
        }
    }
}
