//! Serial command interpreter
//!
//! Polled from the caller's loop, no dedicated task.
//! Zero heap allocation: frame storage and descriptors are caller-owned.

use core::fmt;

pub mod error;
pub mod frame_buffer;
pub mod interpreter;
pub mod invocation;
pub mod registry;
pub mod tokenizer;

pub use error::{ConsoleError, SetupError};
pub use frame_buffer::{Append, FrameBuffer, TerminatorMatch};
pub use interpreter::Interpreter;
pub use invocation::Invocation;
pub use registry::{
    CommandDescriptor, CommandKind, DefaultHandler, Handler, Registry, DEFAULT_REGISTRY_SIZE,
};
pub use tokenizer::{split, TokenCursor};

/// Display bytes with non-printables escaped (`\r`, `\xff`).
pub struct Escaped<'b>(pub &'b [u8]);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            for c in core::ascii::escape_default(b) {
                fmt::Write::write_char(f, c as char)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_display() {
        assert_eq!(format!("{}", Escaped(b"a\r\n")), "a\\r\\n");
        assert_eq!(Escaped(&[0xFF, b'A']).to_string(), "\\xffA");
    }
}
