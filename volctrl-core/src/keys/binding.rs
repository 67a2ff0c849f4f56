//! Key binding data types

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::command::parser::{MAX_ARGS, MAX_ARG_LEN};
use crate::command::{CommandId, Line};

/// Capacity of a bound argument string: one leading space per argument
pub const ARG_STRING_LEN: usize = (MAX_ARG_LEN + 1) * MAX_ARGS;

/// Bound arguments as typed, each preceded by a space (`" 40"`)
pub type ArgString = String<ARG_STRING_LEN>;

/// User label for a binding, one argument token long
pub type Description = String<MAX_ARG_LEN>;

/// Decoded infrared key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode {
    /// Protocol tag (see [`protocol_name`](super::protocol_name))
    pub protocol: u8,
    /// Device address
    pub address: u16,
    /// Key command code
    pub command: u16,
}

impl KeyCode {
    /// Create a new key code
    pub const fn new(protocol: u8, address: u16, command: u16) -> Self {
        Self {
            protocol,
            address,
            command,
        }
    }
}

/// A key event as delivered by the infrared decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrKey {
    /// Key identity
    pub code: KeyCode,
    /// Auto-repeat frame of a held key
    pub repeat: bool,
}

impl IrKey {
    /// First frame of a key press
    pub const fn pressed(code: KeyCode) -> Self {
        Self { code, repeat: false }
    }

    /// Repeat frame of a held key
    pub const fn repeated(code: KeyCode) -> Self {
        Self { code, repeat: true }
    }

    /// Decoder flags byte (bit 0 = repeat)
    pub fn flags(&self) -> u8 {
        self.repeat as u8
    }
}

/// A stored association between a key and a command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyBinding {
    /// Key that triggers the binding
    pub code: KeyCode,
    /// Bound command
    pub command: CommandId,
    /// Bound arguments
    pub args: ArgString,
}

impl KeyBinding {
    /// Rebuild the command line this binding stands for
    pub fn command_line(&self) -> Line {
        let mut line = Line::new();
        // Both parts are bounded well below the line length
        let _ = line.push_str(self.command.name());
        let _ = line.push_str(&self.args);
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let mut args = ArgString::new();
        args.push_str(" 40").unwrap();
        let binding = KeyBinding {
            code: KeyCode::new(2, 0x00FF, 0x0010),
            command: CommandId::SetVol,
            args,
        };
        assert_eq!(binding.command_line().as_str(), "setvol 40");
    }

    #[test]
    fn test_command_line_without_args() {
        let binding = KeyBinding {
            code: KeyCode::new(2, 0x00FF, 0x0011),
            command: CommandId::VolUp,
            args: ArgString::new(),
        };
        assert_eq!(binding.command_line().as_str(), "volup");
    }

    #[test]
    fn test_flags() {
        let code = KeyCode::new(2, 1, 2);
        assert_eq!(IrKey::pressed(code).flags(), 0);
        assert_eq!(IrKey::repeated(code).flags(), 1);
    }
}
