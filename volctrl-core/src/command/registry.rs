//! Command registry
//!
//! The fixed, ordered table of commands understood on the serial line and
//! bindable to infrared keys. Each entry carries the command word and the
//! number of arguments it requires. The table order is persisted inside
//! stored key bindings, so new commands are only ever appended.

use serde::{Deserialize, Serialize};

/// Identifier of a known command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandId {
    /// Run the motor clockwise for one run-timer period
    VolUp,
    /// Run the motor counter-clockwise for one run-timer period
    VolDown,
    /// Seek an absolute volume step (0-100)
    SetVol,
    /// Report the current position reading
    GetAdcVal,
    /// Learn an infrared key as alias for a command
    RegRem,
    /// Delete a learned key by index
    DelRem,
    /// List learned keys
    ShowRem,
    /// Switch the 5V indicator
    Set5vLed,
    /// Switch the 3.3V indicator
    Set3v3Led,
    /// Set the run-timer duration
    SetIncDur,
    /// Report the run-timer duration
    GetIncDur,
    /// Clear the latched fault indicator
    ClrErr,
    /// List the command set
    Help,
}

/// One registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command identifier
    pub id: CommandId,
    /// Command word (lowercase)
    pub name: &'static str,
    /// Required argument count
    pub arity: u8,
}

/// The command table, in persisted order
pub const COMMANDS: [CommandSpec; 13] = [
    CommandSpec::new(CommandId::VolUp, "volup", 0),
    CommandSpec::new(CommandId::VolDown, "voldown", 0),
    CommandSpec::new(CommandId::SetVol, "setvol", 1),
    CommandSpec::new(CommandId::GetAdcVal, "getadcval", 0),
    CommandSpec::new(CommandId::RegRem, "regrem", 2),
    CommandSpec::new(CommandId::DelRem, "delrem", 1),
    CommandSpec::new(CommandId::ShowRem, "showrem", 0),
    CommandSpec::new(CommandId::Set5vLed, "set5vled", 1),
    CommandSpec::new(CommandId::Set3v3Led, "set3v3led", 1),
    CommandSpec::new(CommandId::SetIncDur, "setincdur", 1),
    CommandSpec::new(CommandId::GetIncDur, "getincdur", 0),
    CommandSpec::new(CommandId::ClrErr, "clrerr", 0),
    CommandSpec::new(CommandId::Help, "help", 0),
];

impl CommandSpec {
    const fn new(id: CommandId, name: &'static str, arity: u8) -> Self {
        Self { id, name, arity }
    }
}

impl CommandId {
    fn spec(self) -> &'static CommandSpec {
        // Table order matches declaration order
        &COMMANDS[self as usize]
    }

    /// Command word
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Required argument count
    pub fn arity(self) -> u8 {
        self.spec().arity
    }
}

/// Resolve a command word, ignoring ASCII case
pub fn resolve(name: &str) -> Option<CommandId> {
    COMMANDS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.id)
}

/// How an argument count is compared against a command's arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArityPolicy {
    /// Extra arguments are tolerated (interactive command line)
    AtLeast,
    /// The count must match exactly (binding a command to a key)
    Exactly,
}

/// Argument count does not satisfy the command's arity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArityError {
    /// Fewer arguments than required
    Missing,
    /// More arguments than allowed under [`ArityPolicy::Exactly`]
    Unexpected,
}

impl ArityError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            ArityError::Missing => "Required arguments not present!",
            ArityError::Unexpected => "Invalid Argument count!",
        }
    }
}

/// Check an argument count against a command's arity
pub fn check_arity(id: CommandId, count: usize, policy: ArityPolicy) -> Result<(), ArityError> {
    let arity = id.arity() as usize;
    if count < arity {
        return Err(ArityError::Missing);
    }
    if policy == ArityPolicy::Exactly && count != arity {
        return Err(ArityError::Unexpected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_order_matches_ids() {
        for (i, spec) in COMMANDS.iter().enumerate() {
            assert_eq!(spec.id as usize, i);
        }
    }

    #[test]
    fn test_resolve_known_commands() {
        assert_eq!(resolve("volup"), Some(CommandId::VolUp));
        assert_eq!(resolve("setvol"), Some(CommandId::SetVol));
        assert_eq!(resolve("SetIncDur"), Some(CommandId::SetIncDur));
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(resolve("setvolume"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("vol"), None);
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(CommandId::VolUp.arity(), 0);
        assert_eq!(CommandId::SetVol.arity(), 1);
        assert_eq!(CommandId::RegRem.arity(), 2);
        assert_eq!(CommandId::SetIncDur.arity(), 1);
    }

    #[test]
    fn test_at_least_tolerates_extra() {
        assert_eq!(check_arity(CommandId::SetVol, 2, ArityPolicy::AtLeast), Ok(()));
        assert_eq!(
            check_arity(CommandId::SetVol, 0, ArityPolicy::AtLeast),
            Err(ArityError::Missing)
        );
    }

    #[test]
    fn test_exactly_rejects_extra() {
        assert_eq!(check_arity(CommandId::SetVol, 1, ArityPolicy::Exactly), Ok(()));
        assert_eq!(
            check_arity(CommandId::SetVol, 2, ArityPolicy::Exactly),
            Err(ArityError::Unexpected)
        );
        assert_eq!(
            check_arity(CommandId::VolUp, 1, ArityPolicy::Exactly),
            Err(ArityError::Unexpected)
        );
    }

    proptest! {
        #[test]
        fn prop_unknown_words_never_resolve(word in "[a-z0-9]{1,12}") {
            let known = COMMANDS.iter().any(|c| c.name == word);
            prop_assert_eq!(resolve(&word).is_some(), known);
        }

        #[test]
        fn prop_fewer_than_arity_always_missing(idx in 0usize..COMMANDS.len()) {
            let spec = COMMANDS[idx];
            if spec.arity > 0 {
                let count = spec.arity as usize - 1;
                prop_assert_eq!(
                    check_arity(spec.id, count, ArityPolicy::AtLeast),
                    Err(ArityError::Missing)
                );
                prop_assert_eq!(
                    check_arity(spec.id, count, ArityPolicy::Exactly),
                    Err(ArityError::Missing)
                );
            }
        }
    }
}
