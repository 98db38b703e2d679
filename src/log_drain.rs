//! Log output over a byte channel.
//!
//! Drains a [`LogStream`] into any [`ByteChannel`]: the command channel
//! itself on a host, or a TX-only UART on a board.

use crate::channel::ByteChannel;
use crate::logging::{format_to_buffer, LogEntry, LogStream};

/// Large enough for the prefix plus a full message.
const LINE_LEN: usize = 160;

/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}\n",
            entry.timestamp_us,
            entry.level.as_str(),
            entry.message()
        ),
    )
}

/// Write every pending entry to `out`.
///
/// The ring is emptied either way. Returns the number of lines the sink
/// took in full; a line it cuts short is lost.
pub fn drain_to<Ch: ByteChannel, const N: usize>(stream: &LogStream<N>, out: &mut Ch) -> usize {
    let mut line = [0u8; LINE_LEN];
    let mut count = 0;
    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        if out.write(&line[..len]) == len {
            count += 1;
        }
    }
    count
}

/// Report and reset the dropped-message counter, if non-zero.
///
/// Returns `true` if a report was written. The counter is kept when the
/// sink cuts the report short, so it is retried on the next call.
pub fn report_dropped<Ch: ByteChannel, const N: usize>(stream: &LogStream<N>, out: &mut Ch) -> bool {
    let dropped = stream.dropped();
    if dropped == 0 {
        return false;
    }

    let mut line = [0u8; 64];
    let len = format_to_buffer(&mut line, format_args!("[WARN] log dropped: {}\n", dropped));
    if out.write(&line[..len]) < len {
        return false;
    }
    stream.reset_dropped();
    true
}
