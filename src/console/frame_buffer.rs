//! Frame buffer for incoming bytes
//!
//! Caller-supplied storage, a write cursor and a terminator match cursor.
//! Nothing here allocates.

use super::SetupError;

/// Outcome of [`FrameBuffer::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Append {
    /// Byte stored
    Accepted,
    /// Buffer was already full; it has been cleared and the byte dropped
    Overflow,
}

/// Outcome of [`FrameBuffer::match_terminator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminatorMatch {
    /// Byte breaks (or never started) a terminator match
    NotMatched,
    /// Byte extends a partial match
    InProgress,
    /// Terminator fully matched; the frame is ready
    Complete,
}

/// Fixed-capacity frame accumulator.
pub struct FrameBuffer<'a> {
    buf: &'a mut [u8],
    len: usize,
    terminator: &'a [u8],
    term_pos: usize,
}

impl<'a> FrameBuffer<'a> {
    /// Wrap `storage`; capacity is its full length.
    pub fn new(storage: &'a mut [u8], terminator: &'a [u8]) -> Result<Self, SetupError> {
        if storage.is_empty() {
            return Err(SetupError::ZeroCapacity);
        }
        if terminator.is_empty() {
            return Err(SetupError::EmptyTerminator);
        }
        Ok(Self {
            buf: storage,
            len: 0,
            terminator,
            term_pos: 0,
        })
    }

    /// Store a byte at the write cursor.
    pub fn append(&mut self, byte: u8) -> Append {
        if self.len < self.buf.len() {
            self.buf[self.len] = byte;
            self.len += 1;
            Append::Accepted
        } else {
            self.clear();
            Append::Overflow
        }
    }

    /// Advance terminator matching with the byte just appended.
    ///
    /// A mismatch restarts matching at the first terminator byte without
    /// re-testing the mismatching byte, so with CR-LF the sequence
    /// `\r\r\n` does not complete a frame. On completion the terminator is
    /// cut from the stored content.
    pub fn match_terminator(&mut self, byte: u8) -> TerminatorMatch {
        if self.terminator[self.term_pos] != byte {
            self.term_pos = 0;
            return TerminatorMatch::NotMatched;
        }

        self.term_pos += 1;
        if self.term_pos < self.terminator.len() {
            return TerminatorMatch::InProgress;
        }

        self.len -= self.terminator.len();
        self.term_pos = 0;
        TerminatorMatch::Complete
    }

    /// Reset both cursors
    pub fn clear(&mut self) {
        self.len = 0;
        self.term_pos = 0;
    }

    /// Stored content (the frame body once the terminator matched)
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// First stored byte, if any
    pub fn first(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    /// Get write position
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total bytes the buffer can hold
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of terminator bytes matched so far
    pub fn terminator_pos(&self) -> usize {
        self.term_pos
    }

    /// Configured terminator
    pub fn terminator(&self) -> &'a [u8] {
        self.terminator
    }
}
