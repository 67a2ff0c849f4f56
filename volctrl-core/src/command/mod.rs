//! Serial command line handling
//!
//! Raw bytes are assembled into lines by [`LineBuffer`], tokenized and
//! resolved by [`parse`], and validated against the fixed
//! [`registry`] of known commands.

pub mod line;
pub mod parser;
pub mod registry;

pub use line::{Line, LineBuffer, LineEvent, LINE_LEN, OVERFLOW_MESSAGE};
pub use parser::{parse, peek_motion, Arg, Args, Motion, ParseError, ParsedLine};
pub use registry::{check_arity, resolve, ArityError, ArityPolicy, CommandId, COMMANDS};
