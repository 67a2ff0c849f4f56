//! NEC infrared decoder
//!
//! Decodes NEC frames from the pulse train of an active-low IR receiver
//! module. The caller measures the time between pin edges and feeds each
//! interval as a [`Pulse`]: a mark (carrier present, pin low) or a space.
//!
//! # Frame timing
//!
//! ```text
//! [Lead mark][Lead space][32 data bits, LSB first][Stop mark]
//!    9 ms       4.5 ms     560 µs mark + 560 µs / 1690 µs space
//! ```
//!
//! A held key sends repeat frames (9 ms mark, 2.25 ms space, stop mark)
//! about every 108 ms; they are reported with the last decoded code.
//!
//! Standard frames carry an 8-bit address and its inverse; extended
//! frames use both bytes as a 16-bit address. The command byte must
//! always match its inverse.

use volctrl_core::keys::{IrKey, KeyCode, PROTOCOL_NEC};

/// Pulses shorter than this are receiver glitches and are dropped (µs)
pub const GLITCH_US: u32 = 120;

const LEAD_MARK_US: (u32, u32) = (8_000, 10_000);
const LEAD_SPACE_US: (u32, u32) = (3_500, 5_000);
const REPEAT_SPACE_US: (u32, u32) = (1_800, 2_700);
const BIT_MARK_US: (u32, u32) = (300, 800);
const ZERO_SPACE_US: (u32, u32) = (300, 800);
const ONE_SPACE_US: (u32, u32) = (1_300, 2_000);

/// Repeat frames more than this after the last frame are ignored (µs)
const REPEAT_WINDOW_US: u32 = 200_000;

/// One interval between two receiver edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pulse {
    /// Carrier burst (receiver output low)
    Mark(u32),
    /// Gap between bursts (receiver output high)
    Space(u32),
}

impl Pulse {
    fn duration_us(&self) -> u32 {
        match self {
            Pulse::Mark(us) | Pulse::Space(us) => *us,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for a lead mark
    Idle,
    /// Lead mark seen, space decides frame or repeat
    Lead,
    /// Collecting data bits
    Data { bits: u8, frame: u32, in_space: bool },
    /// Repeat space seen, waiting for the stop mark
    Repeat,
}

fn within(us: u32, (min, max): (u32, u32)) -> bool {
    (min..=max).contains(&us)
}

/// Split a raw 32-bit frame into address and command
///
/// Returns `None` if the command byte does not match its inverse.
pub fn decode_frame(frame: u32) -> Option<(u16, u16)> {
    let [addr, addr_inv, cmd, cmd_inv] = frame.to_le_bytes();
    if cmd ^ cmd_inv != 0xFF {
        return None;
    }

    let address = if addr ^ addr_inv == 0xFF {
        u16::from(addr)
    } else {
        u16::from_le_bytes([addr, addr_inv])
    };
    Some((address, u16::from(cmd)))
}

/// Edge-driven NEC decoder state machine
#[derive(Debug, Clone)]
pub struct NecDecoder {
    state: DecodeState,
    last: Option<KeyCode>,
    /// Time since the last complete frame, saturating (µs)
    since_frame_us: u32,
}

impl Default for NecDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NecDecoder {
    /// Create a decoder waiting for a lead mark
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Idle,
            last: None,
            since_frame_us: u32::MAX,
        }
    }

    /// Abandon a partially received frame
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
    }

    /// Feed one interval; returns a key when a frame completes
    pub fn feed(&mut self, pulse: Pulse) -> Option<IrKey> {
        let us = pulse.duration_us();
        if us < GLITCH_US {
            return None;
        }
        self.since_frame_us = self.since_frame_us.saturating_add(us);

        match self.advance(pulse) {
            Some(key) => Some(key),
            None if self.state == DecodeState::Idle => {
                // A broken frame may be followed directly by a new lead mark
                self.advance(pulse)
            }
            None => None,
        }
    }

    fn advance(&mut self, pulse: Pulse) -> Option<IrKey> {
        let (next, key) = match (self.state, pulse) {
            (DecodeState::Idle, Pulse::Mark(us)) if within(us, LEAD_MARK_US) => {
                (DecodeState::Lead, None)
            }
            (DecodeState::Idle, _) => return None,

            (DecodeState::Lead, Pulse::Space(us)) if within(us, LEAD_SPACE_US) => (
                DecodeState::Data {
                    bits: 0,
                    frame: 0,
                    in_space: false,
                },
                None,
            ),
            (DecodeState::Lead, Pulse::Space(us)) if within(us, REPEAT_SPACE_US) => {
                (DecodeState::Repeat, None)
            }

            (DecodeState::Repeat, Pulse::Mark(us)) if within(us, BIT_MARK_US) => {
                let key = self
                    .last
                    .filter(|_| self.since_frame_us <= REPEAT_WINDOW_US)
                    .map(IrKey::repeated);
                if key.is_some() {
                    self.since_frame_us = 0;
                }
                (DecodeState::Idle, key)
            }

            (
                DecodeState::Data {
                    bits,
                    frame,
                    in_space: false,
                },
                Pulse::Mark(us),
            ) if within(us, BIT_MARK_US) => (
                DecodeState::Data {
                    bits,
                    frame,
                    in_space: true,
                },
                None,
            ),
            (
                DecodeState::Data {
                    bits,
                    frame,
                    in_space: true,
                },
                Pulse::Space(us),
            ) if within(us, ZERO_SPACE_US) || within(us, ONE_SPACE_US) => {
                let bit = u32::from(within(us, ONE_SPACE_US));
                let frame = frame | (bit << bits);
                let bits = bits + 1;
                if bits == 32 {
                    (DecodeState::Idle, self.complete(frame))
                } else {
                    (
                        DecodeState::Data {
                            bits,
                            frame,
                            in_space: false,
                        },
                        None,
                    )
                }
            }

            _ => (DecodeState::Idle, None),
        };

        self.state = next;
        key
    }

    fn complete(&mut self, frame: u32) -> Option<IrKey> {
        let (address, command) = decode_frame(frame)?;
        let code = KeyCode::new(PROTOCOL_NEC, address, command);
        self.last = Some(code);
        self.since_frame_us = 0;
        Some(IrKey::pressed(code))
    }
}
