//! Log capture and drain tests

use log::Level;
use serial_commands::log_drain::{drain_to, format_log_entry, report_dropped};
use serial_commands::{BufferedChannel, LogStream};

type Sink = BufferedChannel<1, 1024>;

#[test]
fn test_drain_writes_formatted_lines() {
    let stream = LogStream::<8>::new();
    stream.push(1_500, Level::Warn, b"console: E02: frame buffer full");
    stream.push(2_000, Level::Debug, b"[ON] matched #0");

    let mut sink = Sink::new();
    assert_eq!(drain_to(&stream, &mut sink), 2);

    let out = sink.output_str();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("WARN: console: E02: frame buffer full"));
    assert!(lines[1].contains("DEBUG"));
    assert_eq!(stream.pending(), 0);
}

#[test]
fn test_dropped_reported_once() {
    let stream = LogStream::<2>::new();
    for t in 0..5 {
        stream.push(t, Level::Info, b"x");
    }
    assert_eq!(stream.dropped(), 3);

    let mut sink = Sink::new();
    report_dropped(&stream, &mut sink);
    assert_eq!(sink.output_str(), "[WARN] log dropped: 3\n");

    sink.clear_output();
    report_dropped(&stream, &mut sink);
    assert!(sink.output().is_empty());
}

#[test]
fn test_format_entry_fits_buffer() {
    let stream = LogStream::<2>::new();
    stream.push(42, Level::Error, b"boom");
    let entry = stream.drain().unwrap();

    let mut buf = [0u8; 64];
    let len = format_log_entry(&entry, &mut buf);
    let line = std::str::from_utf8(&buf[..len]).unwrap();
    assert!(line.starts_with('['));
    assert!(line.ends_with("ERROR: boom\n"));
}

#[test]
fn test_short_sink_writes_not_counted() {
    let stream = LogStream::<4>::new();
    stream.push(1, Level::Info, b"this line does not fit the sink");
    for t in 0..6 {
        stream.push(t, Level::Info, b"x");
    }

    let mut tiny: BufferedChannel<1, 8> = BufferedChannel::new();
    assert_eq!(drain_to(&stream, &mut tiny), 0);
    assert_eq!(stream.pending(), 0);

    // Report does not fit either; the count survives for a later retry
    assert!(!report_dropped(&stream, &mut tiny));
    assert_eq!(stream.dropped(), 3);

    let mut sink = Sink::new();
    assert!(report_dropped(&stream, &mut sink));
    assert_eq!(stream.dropped(), 0);
}
