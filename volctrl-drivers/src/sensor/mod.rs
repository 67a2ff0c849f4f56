//! Sensor implementations

pub mod position;

pub use position::{PositionFilter, POSITION_MAX};
