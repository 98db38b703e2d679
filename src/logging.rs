//! Non-blocking log capture for the `log` facade.
//!
//! ```text
//! log::debug!() ──▶ StreamLogger ──▶ [E0][E1][E2] ──▶ log_drain ──▶ ByteChannel
//!                   format + clock     lock-free        any time
//!                                      ring buffer
//! ```
//!
//! - Records are formatted into fixed-size entries, never allocated
//! - Push never blocks; a full ring drops the record and counts it
//! - One consumer drains at leisure (see [`crate::log_drain`])

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Longest stored message; longer text is cut.
pub const MAX_MSG_LEN: usize = 120;

/// Default ring depth.
pub const LOG_BUFFER_SIZE: usize = 64;

/// One captured record.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Microseconds from the logger's clock
    pub timestamp_us: i64,
    pub level: Level,
    pub len: u8,
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const BLANK: Self = Self {
        timestamp_us: 0,
        level: Level::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message as text
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..usize::from(self.len)]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Lock-free log ring: any number of producers, one consumer.
///
/// `N` must be a power of two.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: UnsafeCell<[LogEntry; N]>,
    published: [AtomicBool; N],
    head: AtomicUsize,
    tail: AtomicUsize,
    lost: AtomicUsize,
}

// SAFETY: a slot is filled only by the producer that claimed it by
// advancing `head`, and read only by the consumer once `published` is set
// with Release ordering.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    /// Empty ring
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "ring depth must be a power of two");
        Self {
            slots: UnsafeCell::new([LogEntry::BLANK; N]),
            published: [const { AtomicBool::new(false) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            lost: AtomicUsize::new(0),
        }
    }

    fn slot(seq: usize) -> usize {
        seq & (N - 1)
    }

    /// Claim a slot and store a record in it.
    ///
    /// Returns `false` when the ring is full; the record is counted as lost.
    pub fn push(&self, timestamp_us: i64, level: Level, msg: &[u8]) -> bool {
        let mut seq = self.head.load(Ordering::Acquire);
        loop {
            if seq.wrapping_sub(self.tail.load(Ordering::Acquire)) >= N {
                self.lost.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self
                .head
                .compare_exchange_weak(seq, seq.wrapping_add(1), Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(now) => seq = now,
            }
        }

        let slot = Self::slot(seq);
        let mut len = msg.len().min(MAX_MSG_LEN);
        // Never split a UTF-8 sequence
        while len > 0 && len < msg.len() && msg[len] & 0xC0 == 0x80 {
            len -= 1;
        }
        // SAFETY: the CAS gave this slot to us alone and the consumer
        // ignores it until `published` is set.
        let entry = unsafe { &mut (*self.slots.get())[slot] };
        entry.timestamp_us = timestamp_us;
        entry.level = level;
        entry.len = len as u8;
        entry.msg[..len].copy_from_slice(&msg[..len]);
        self.published[slot].store(true, Ordering::Release);
        true
    }

    /// Take the oldest record.
    ///
    /// `None` when empty or while the oldest slot is still being filled.
    /// Single consumer only.
    pub fn drain(&self) -> Option<LogEntry> {
        let seq = self.tail.load(Ordering::Relaxed);
        if seq == self.head.load(Ordering::Acquire) {
            return None;
        }

        let slot = Self::slot(seq);
        if !self.published[slot].load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: published by its producer, which is done with it.
        let entry = unsafe { (*self.slots.get())[slot] };
        self.published[slot].store(false, Ordering::Relaxed);
        self.tail.store(seq.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Records lost to a full ring since the last reset
    pub fn dropped(&self) -> u32 {
        self.lost.load(Ordering::Relaxed) as u32
    }

    pub fn reset_dropped(&self) {
        self.lost.store(0, Ordering::Relaxed);
    }

    /// Claimed slots not yet drained
    pub fn pending(&self) -> u32 {
        let tail = self.tail.load(Ordering::Relaxed);
        self.head.load(Ordering::Acquire).wrapping_sub(tail) as u32
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// `fmt::Write` into a byte slice that cuts at the end, on a char boundary.
struct Truncating<'b> {
    out: &'b mut [u8],
    used: usize,
}

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let free = &mut self.out[self.used..];
        if s.len() <= free.len() {
            free[..s.len()].copy_from_slice(s.as_bytes());
            self.used += s.len();
            return Ok(());
        }

        let mut n = free.len();
        while !s.is_char_boundary(n) {
            n -= 1;
        }
        free[..n].copy_from_slice(&s.as_bytes()[..n]);
        self.used += n;
        // Full: stop formatting so later pieces cannot land after the cut
        Err(fmt::Error)
    }
}

/// Render `args` into `buf`, cutting at its end.
///
/// Returns the number of bytes written.
pub fn format_to_buffer(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    let mut w = Truncating { out: buf, used: 0 };
    let _ = fmt::write(&mut w, args);
    w.used
}

/// `log::Log` implementation that records into a [`LogStream`].
pub struct StreamLogger<const N: usize = LOG_BUFFER_SIZE> {
    stream: &'static LogStream<N>,
    clock: fn() -> i64,
    max_level: LevelFilter,
}

impl<const N: usize> StreamLogger<N> {
    /// Logger feeding `stream`, stamping entries with `clock` (microseconds).
    pub const fn new(stream: &'static LogStream<N>, clock: fn() -> i64, max_level: LevelFilter) -> Self {
        Self { stream, clock, max_level }
    }

    /// Register as the global logger.
    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    pub fn stream(&self) -> &'static LogStream<N> {
        self.stream
    }
}

impl<const N: usize> Log for StreamLogger<N> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut buf = [0u8; MAX_MSG_LEN];
        let len = format_to_buffer(&mut buf, format_args!("{}: {}", record.target(), record.args()));
        self.stream.push((self.clock)(), record.level(), &buf[..len]);
    }

    fn flush(&self) {}
}
