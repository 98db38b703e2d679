//! Byte channel abstraction
//!
//! The interpreter never owns the transport's lifecycle. It only asks how
//! many bytes are waiting, pulls them one at a time and lets handlers write
//! replies back.

use heapless::{Deque, Vec};

/// A polled, non-blocking byte source and sink (UART, USB CDC, socket, ...).
pub trait ByteChannel {
    /// Number of bytes that can be read right now without waiting.
    fn available(&self) -> usize;

    /// Read the next byte, or `None` if nothing is pending.
    fn read(&mut self) -> Option<u8>;

    /// Write as many bytes as the channel accepts; returns the count written.
    fn write(&mut self, bytes: &[u8]) -> usize;

    /// Write a UTF-8 string.
    fn write_str(&mut self, s: &str) -> usize {
        self.write(s.as_bytes())
    }
}

impl<T: ByteChannel + ?Sized> ByteChannel for &mut T {
    fn available(&self) -> usize {
        (**self).available()
    }

    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        (**self).write(bytes)
    }
}

/// In-memory channel with a receive queue and a transmit buffer.
///
/// `RX` bounds bytes waiting to be read, `TX` bounds captured output.
/// Bytes fed past `RX` and output past `TX` are dropped.
pub struct BufferedChannel<const RX: usize, const TX: usize> {
    rx: Deque<u8, RX>,
    tx: Vec<u8, TX>,
}

impl<const RX: usize, const TX: usize> BufferedChannel<RX, TX> {
    /// Create empty channel
    pub const fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes for the reader.
    ///
    /// Returns the number of bytes accepted.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &b in bytes {
            if self.rx.push_back(b).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Bytes written by handlers since the last `clear_output`.
    pub fn output(&self) -> &[u8] {
        &self.tx
    }

    /// Output as text, empty if it is not valid UTF-8.
    pub fn output_str(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap_or("")
    }

    /// Discard captured output
    pub fn clear_output(&mut self) {
        self.tx.clear();
    }

    /// Space left in the receive queue
    pub fn rx_space(&self) -> usize {
        RX - self.rx.len()
    }
}

impl<const RX: usize, const TX: usize> Default for BufferedChannel<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RX: usize, const TX: usize> ByteChannel for BufferedChannel<RX, TX> {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        let room = TX - self.tx.len();
        let n = bytes.len().min(room);
        // Cannot fail: n is clamped to the remaining capacity.
        let _ = self.tx.extend_from_slice(&bytes[..n]);
        n
    }
}
