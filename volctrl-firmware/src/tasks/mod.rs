//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod adc;
pub mod control;
pub mod ir;
pub mod run_timer;
pub mod serial_rx;

pub use adc::adc_task;
pub use control::{control_task, VolumeController};
pub use ir::ir_task;
pub use run_timer::run_timer_task;
pub use serial_rx::serial_rx_task;
