//! Handler calling convention
//!
//! A handler sees the token that selected it, a cursor over the remaining
//! arguments, the channel (for replies) and the caller's context. All four
//! borrow disjoint parts of the interpreter, so an argument can be held
//! while writing to the channel.

use core::fmt;

use super::TokenCursor;
use crate::channel::ByteChannel;

/// View of the interpreter handed to a running handler.
pub struct Invocation<'i, Ch, C> {
    command: &'i [u8],
    args: TokenCursor<'i>,
    channel: Option<&'i mut Ch>,
    context: &'i mut C,
}

impl<'i, Ch, C> Invocation<'i, Ch, C> {
    pub(crate) fn new(
        command: &'i [u8],
        args: TokenCursor<'i>,
        channel: Option<&'i mut Ch>,
        context: &'i mut C,
    ) -> Self {
        Self { command, args, channel, context }
    }

    /// Token that selected this handler.
    ///
    /// For a one-key command this is the single key byte.
    pub fn command(&self) -> &'i [u8] {
        self.command
    }

    /// Pull the next argument token.
    ///
    /// Returns `None` once the frame is exhausted, and keeps returning it.
    pub fn next_token(&mut self) -> Option<&'i [u8]> {
        self.args.next()
    }

    /// Pull the next argument as UTF-8.
    ///
    /// A token that is not valid UTF-8 is consumed and reported as `None`;
    /// use [`next_token`](Self::next_token) to tell the two cases apart.
    pub fn next_arg(&mut self) -> Option<&'i str> {
        self.args.next_str()
    }

    /// Remaining argument cursor
    pub fn args(&mut self) -> &mut TokenCursor<'i> {
        &mut self.args
    }

    /// Attached channel, if any
    pub fn channel(&mut self) -> Option<&mut Ch> {
        self.channel.as_deref_mut()
    }

    pub fn context(&self) -> &C {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut *self.context
    }
}

/// Replies go to the channel; without one they are discarded.
impl<Ch: ByteChannel, C> fmt::Write for Invocation<'_, Ch, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(ch) = self.channel.as_deref_mut() {
            if ch.write(s.as_bytes()) < s.len() {
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}
