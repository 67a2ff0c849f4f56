//! Line assembly from the serial byte stream
//!
//! - `\r` submits the current line
//! - `\b` and DEL erase the most recent character
//! - `\n` is ignored so both CR and CRLF terminals work
//! - Overlong input is reported once and the line is discarded

use heapless::String;

/// Maximum line length in characters
pub const LINE_LEN: usize = 80;

/// One submitted command line
pub type Line = String<LINE_LEN>;

/// Reply sent when a line overflows the buffer
pub const OVERFLOW_MESSAGE: &str = "Line length exceeds buffer!";

/// Line delimiter
const DELIMITER: u8 = b'\r';
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const LINE_FEED: u8 = b'\n';

/// Result of feeding one byte into a [`LineBuffer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Byte consumed, no line complete yet
    Pending,
    /// A delimiter completed a line (possibly empty)
    Complete(Line),
    /// The line exceeded [`LINE_LEN`] and was discarded
    Overflow,
}

/// Incremental line editor for the serial receiver
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Line,
    overflowed: bool,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buf: String::new(),
            overflowed: false,
        }
    }

    /// Feed one received byte
    pub fn push(&mut self, byte: u8) -> LineEvent {
        match byte {
            DELIMITER => {
                if core::mem::take(&mut self.overflowed) {
                    self.buf.clear();
                    return LineEvent::Pending;
                }
                LineEvent::Complete(core::mem::take(&mut self.buf))
            }
            BACKSPACE | DELETE => {
                self.buf.pop();
                LineEvent::Pending
            }
            LINE_FEED => LineEvent::Pending,
            _ if self.overflowed || !byte.is_ascii() => LineEvent::Pending,
            _ => {
                if self.buf.push(byte as char).is_err() {
                    // Drop everything up to the next delimiter
                    self.overflowed = true;
                    self.buf.clear();
                    return LineEvent::Overflow;
                }
                LineEvent::Pending
            }
        }
    }

    /// Number of characters currently buffered
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
