//! Infrared remote decoders

pub mod nec;

pub use nec::{NecDecoder, Pulse};
