//! Command line tokenizer
//!
//! Lines are lowercased and split on spaces and commas; runs of
//! delimiters produce no empty tokens. The first token names the command,
//! the rest are arguments. Limits are parser-wide and independent of the
//! resolved command's arity, which is checked later by the dispatcher.

use heapless::{String, Vec};

use super::line::Line;
use super::registry::{resolve, CommandId};

/// Maximum number of arguments after the command word
pub const MAX_ARGS: usize = 3;

/// Maximum characters in a single argument
pub const MAX_ARG_LEN: usize = 8;

/// Token delimiters
const DELIMITERS: [char; 2] = [' ', ','];

/// One argument token
pub type Arg = String<MAX_ARG_LEN>;

/// Argument vector for one invocation
pub type Args = Vec<Arg, MAX_ARGS>;

/// Errors from tokenizing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The line contains no tokens
    Empty,
    /// The command word is not in the registry
    UnknownCommand,
    /// More than [`MAX_ARGS`] arguments
    TooManyArguments,
    /// An argument is [`MAX_ARG_LEN`] + 1 characters or longer
    ArgumentTooLong,
    /// No free argument slot was available
    AllocationFailed,
}

impl ParseError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            ParseError::Empty => "",
            ParseError::UnknownCommand => "Unknown command!",
            ParseError::TooManyArguments => {
                "The number of arguments exceeds the specified parser limit!"
            }
            ParseError::ArgumentTooLong => "Max arg. string length exceeded!",
            ParseError::AllocationFailed => "Memory allocation failed!",
        }
    }
}

/// A tokenized, resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Resolved command
    pub command: CommandId,
    /// Arguments, lowercased
    pub args: Args,
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(DELIMITERS).filter(|t| !t.is_empty())
}

/// Tokenize and resolve a raw command line
///
/// The command word is resolved before any argument is inspected, so an
/// unknown command is reported even if its arguments would also fail.
pub fn parse(raw: &str) -> Result<ParsedLine, ParseError> {
    let mut line = Line::new();
    line.push_str(raw).map_err(|_| ParseError::AllocationFailed)?;
    line.make_ascii_lowercase();

    let mut tokens = tokens(&line);
    let word = tokens.next().ok_or(ParseError::Empty)?;
    let command = resolve(word).ok_or(ParseError::UnknownCommand)?;

    let mut args = Args::new();
    for token in tokens {
        if args.is_full() {
            return Err(ParseError::TooManyArguments);
        }
        if token.len() > MAX_ARG_LEN {
            return Err(ParseError::ArgumentTooLong);
        }
        let mut arg = Arg::new();
        arg.push_str(token).map_err(|_| ParseError::AllocationFailed)?;
        args.push(arg).map_err(|_| ParseError::AllocationFailed)?;
    }

    Ok(ParsedLine { command, args })
}

/// Motion commands recognized by [`peek_motion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// `volup`, arguments not inspected
    VolUp,
    /// `voldown`, arguments not inspected
    VolDown,
    /// `setvol` with exactly one well-formed argument
    SetVol,
}

/// Classify a pending line without executing it
///
/// Used while the motor is running to decide whether a new line
/// retriggers, redirects or interrupts the current motion.
pub fn peek_motion(raw: &str) -> Option<Motion> {
    let word = tokens(raw).next()?;
    match resolve(word)? {
        CommandId::VolUp => Some(Motion::VolUp),
        CommandId::VolDown => Some(Motion::VolDown),
        CommandId::SetVol => match parse(raw) {
            Ok(parsed) if parsed.args.len() == 1 => Some(Motion::SetVol),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_no_args() {
        let parsed = parse("volup").unwrap();
        assert_eq!(parsed.command, CommandId::VolUp);
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parsed = parse("SetVol 50").unwrap();
        assert_eq!(parsed.command, CommandId::SetVol);
        assert_eq!(parsed.args[0].as_str(), "50");
    }

    #[test]
    fn test_arguments_are_lowercased() {
        let parsed = parse("regrem MUTE volup").unwrap();
        assert_eq!(parsed.args[0].as_str(), "mute");
    }

    #[test]
    fn test_mixed_delimiters_skip_empty_tokens() {
        let parsed = parse("  regrem,, key1 ,setvol   40 ").unwrap();
        assert_eq!(parsed.command, CommandId::RegRem);
        let args: std::vec::Vec<&str> = parsed.args.iter().map(|a| a.as_str()).collect();
        assert_eq!(args, ["key1", "setvol", "40"]);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse(" ,, "), Err(ParseError::Empty));
    }

    #[test]
    fn test_unknown_command_checked_first() {
        assert_eq!(parse("jump"), Err(ParseError::UnknownCommand));
        assert_eq!(parse("jump a b c d e"), Err(ParseError::UnknownCommand));
    }

    #[test]
    fn test_too_many_arguments() {
        assert_eq!(parse("setvol 1 2 3").map(|p| p.args.len()), Ok(3));
        assert_eq!(parse("setvol 1 2 3 4"), Err(ParseError::TooManyArguments));
    }

    #[test]
    fn test_argument_length_limit() {
        assert!(parse("regrem abcdefgh volup").is_ok());
        assert_eq!(
            parse("regrem abcdefghi volup"),
            Err(ParseError::ArgumentTooLong)
        );
    }

    #[test]
    fn test_peek_motion() {
        assert_eq!(peek_motion("volup"), Some(Motion::VolUp));
        assert_eq!(peek_motion("VOLDOWN extra"), Some(Motion::VolDown));
        assert_eq!(peek_motion("setvol 20"), Some(Motion::SetVol));
        assert_eq!(peek_motion("setvol"), None);
        assert_eq!(peek_motion("setvol 20 30"), None);
        assert_eq!(peek_motion("setvol 123456789"), None);
        assert_eq!(peek_motion("getadcval"), None);
        assert_eq!(peek_motion(""), None);
    }

    proptest! {
        #[test]
        fn prop_argument_limits_always_enforced(
            args in proptest::collection::vec("[a-z0-9]{1,12}", 0..6)
        ) {
            let mut line = std::string::String::from("setvol");
            for a in &args {
                line.push(' ');
                line.push_str(a);
            }
            let result = parse(&line);
            let first_long = args.iter().position(|a| a.len() > MAX_ARG_LEN);
            let expected_err = match first_long {
                Some(pos) if pos < MAX_ARGS => Some(ParseError::ArgumentTooLong),
                _ if args.len() > MAX_ARGS => Some(ParseError::TooManyArguments),
                _ => None,
            };
            match expected_err {
                Some(err) => prop_assert_eq!(result, Err(err)),
                None => prop_assert_eq!(result.map(|p| p.args.len()), Ok(args.len())),
            }
        }

        #[test]
        fn prop_unknown_command_never_parses(word in "[a-z]{1,10}") {
            prop_assume!(resolve(&word).is_none());
            prop_assert_eq!(parse(&word), Err(ParseError::UnknownCommand));
        }
    }
}
