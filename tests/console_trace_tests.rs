//! Dispatch trace captured through the crate's own logger

use log::LevelFilter;
use serial_commands::console::{CommandDescriptor, Interpreter, Invocation};
use serial_commands::{BufferedChannel, LogStream, StreamLogger};

type Chan = BufferedChannel<32, 32>;

static STREAM: LogStream = LogStream::new();
static LOGGER: StreamLogger = StreamLogger::new(&STREAM, clock, LevelFilter::Trace);

fn clock() -> i64 {
    0
}

fn noop(_: &mut Invocation<'_, Chan, ()>) {}

#[test]
fn test_comparison_trace_shows_both_names() {
    LOGGER.install().unwrap();

    let led = CommandDescriptor::named("LED", noop);
    let leds = CommandDescriptor::named("LEDS", noop);
    let mut storage = [0u8; 16];
    let mut interp = Interpreter::new(&mut storage, ())
        .unwrap()
        .with_channel(Chan::new());
    interp.register(&led).unwrap();
    interp.register(&leds).unwrap();

    interp.channel_mut().unwrap().feed(b"LEDS\r\n");
    interp.poll().unwrap();

    let mut lines = Vec::new();
    while let Some(entry) = STREAM.drain() {
        lines.push(entry.message().to_string());
    }
    assert!(lines.iter().any(|l| l.ends_with("comparing [LEDS] to [LED]")));
    assert!(lines.iter().any(|l| l.ends_with("comparing [LEDS] to [LEDS]")));
}
