//! Reply lines
//!
//! Replies go to a bounded sink; text that does not fit is dropped.

use core::fmt::{Arguments, Write};

/// Line terminator for replies
pub const CRLF: &str = "\r\n";

/// Write one reply line
pub fn reply<W: Write>(out: &mut W, text: &str) {
    let _ = out.write_str(text);
    let _ = out.write_str(CRLF);
}

/// Write one formatted reply line
pub fn reply_fmt<W: Write>(out: &mut W, args: Arguments<'_>) {
    let _ = out.write_fmt(args);
    let _ = out.write_str(CRLF);
}
