//! Control loop task
//!
//! Polls the motion controller every millisecond: hands over at most one
//! pending serial line and the latest IR key, steps the state machine on a
//! fresh sample snapshot, then flushes the replies to the UART.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_io_async::Write;
use heapless::String;

use volctrl_core::command::OVERFLOW_MESSAGE;
use volctrl_core::control::{reply, Controller};
use volctrl_drivers::indicator::LedBank;
use volctrl_drivers::motor::HBridgeMotor;
use volctrl_hal_rp2040::flash::Rp2040FlashStorage;

use crate::channels::{KEYS, LINE_CHANNEL, LINE_OVERFLOW, SAMPLES};
use crate::timer::SignalRunTimer;

/// Control loop period in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1;

/// Reply buffer, sized for a full `showrem` listing
const OUTBOX_SIZE: usize = 2048;

type Motor = HBridgeMotor<Output<'static>, Output<'static>, Delay>;
type Leds = LedBank<Output<'static>, Output<'static>, Output<'static>>;

/// The controller as wired on this board
pub type VolumeController = Controller<Motor, SignalRunTimer, Leds, Rp2040FlashStorage<'static>>;

#[embassy_executor::task]
pub async fn control_task(mut controller: VolumeController, mut tx: BufferedUartTx) {
    info!("Control task started");

    let mut outbox: String<OUTBOX_SIZE> = String::new();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut state = controller.state();
    let mut faults = controller.faults().count();

    loop {
        ticker.next().await;

        if LINE_OVERFLOW.try_take().is_some() {
            reply(&mut outbox, OVERFLOW_MESSAGE);
        }

        if controller.can_accept_line() {
            if let Ok(line) = LINE_CHANNEL.try_receive() {
                if controller.submit_line(line).is_err() {
                    warn!("Controller rejected a line");
                }
            }
        }

        if let Some(key) = KEYS.take() {
            controller.submit_key(key);
        }

        let now_ms = Instant::now().as_millis() as u32;
        controller.step(SAMPLES.snapshot(), now_ms, &mut outbox);

        if controller.state() != state {
            debug!("State {:?} -> {:?}", state, controller.state());
            state = controller.state();
        }

        if controller.faults().count() != faults {
            faults = controller.faults().count();
            if let Some(kind) = controller.faults().last() {
                error!("Fault latched: {:?} (total {})", kind, faults);
            }
        }

        if !outbox.is_empty() {
            if let Err(e) = tx.write_all(outbox.as_bytes()).await {
                warn!("UART write error: {:?}", e);
            }
            outbox.clear();
        }
    }
}
