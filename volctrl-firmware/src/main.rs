//! volctrl - Motorized Potentiometer Volume Controller Firmware
//!
//! Main firmware binary for RP2040-based volume controller boards.
//! Accepts commands from a serial command line and an NEC infrared remote
//! and drives the potentiometer motor through an H-bridge.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use volctrl_core::control::Controller;
use volctrl_drivers::indicator::{Led, LedBank};
use volctrl_drivers::motor::HBridgeMotor;
use volctrl_hal_rp2040::flash::Rp2040FlashStorage;

use crate::config::board;
use crate::timer::SignalRunTimer;

mod channels;
mod config;
mod tasks;
mod timer;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("volctrl firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Restore settings and key bindings before anything moves
    let mut storage = Rp2040FlashStorage::new(p.FLASH);
    let settings = config::load_settings(&mut storage);
    let keys = config::load_keys(&mut storage);
    let control_config = config::control_config();
    info!(
        "Board config: limits {}..{}, tolerance {}, settle {}ms, echo={}, verbose={}",
        control_config.low_limit,
        control_config.high_limit,
        control_config.tolerance,
        control_config.settle_ms,
        control_config.echo,
        control_config.verbose
    );

    // Serial command line
    // Pin assignments are board-specific (TX=GPIO0, RX=GPIO1)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", board::BAUDRATE);

    // H-bridge direction pins (CW=GPIO2, CCW=GPIO3)
    let motor = HBridgeMotor::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Delay,
        u32::from(control_config.settle_ms),
    );

    // Error LED on the board LED (GPIO25), supply LEDs on GPIO6/GPIO7
    let leds = LedBank::new(
        Led::active_high(Output::new(p.PIN_25, Level::Low)),
        Led::active_high(Output::new(p.PIN_6, Level::Low)),
        Led::active_high(Output::new(p.PIN_7, Level::Low)),
    );

    let timer = SignalRunTimer::new(settings.inc_duration_ms);

    let mut controller: tasks::VolumeController = Controller::new(
        control_config,
        motor,
        timer,
        leds,
        storage,
        settings,
        keys,
    );
    controller.restore_outputs();

    info!("Outputs restored");

    // Potentiometer wiper (ADC0 on GPIO26)
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let wiper = Channel::new_pin(p.PIN_26, Pull::None);

    // IR receiver output, idle high (GPIO4)
    let ir_receiver = Input::new(p.PIN_4, Pull::Up);

    spawner.spawn(tasks::run_timer_task()).unwrap();
    spawner.spawn(tasks::adc_task(adc, wiper)).unwrap();
    spawner.spawn(tasks::ir_task(ir_receiver)).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::control_task(controller, tx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
