//! Serial receive task
//!
//! Assembles command lines from the UART and hands them to the control
//! loop. Blocks on a full line channel, so the UART buffer absorbs input
//! typed while a command is still running.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use volctrl_core::command::{LineBuffer, LineEvent};

use crate::channels::{LINE_CHANNEL, LINE_OVERFLOW};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut lines = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            match lines.push(byte) {
                LineEvent::Pending => {}
                LineEvent::Complete(line) => {
                    trace!("Line: {}", line.as_str());
                    LINE_CHANNEL.send(line).await;
                }
                LineEvent::Overflow => {
                    debug!("Line overflow, discarding input");
                    LINE_OVERFLOW.signal(());
                }
            }
        }
    }
}
