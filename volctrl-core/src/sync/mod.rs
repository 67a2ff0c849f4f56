//! Interrupt-to-loop handoff
//!
//! Hardware event handlers publish single values into these cells; the
//! control loop snapshots them once per tick. Multi-byte values are only
//! touched inside a critical section.

pub mod sample;

pub use sample::{KeyMailbox, Sample, SampleChannel};
