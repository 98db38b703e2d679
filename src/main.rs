//! serial-commands - LED demo
//!
//! `ON` / `OFF` drive an LED and count how often it was switched on,
//! `ECHO` repeats its arguments, `!` toggles the LED without waiting for
//! a line terminator. Anything else is reported as unrecognized.
//!
//! On ESP-IDF targets the console runs on UART0 and the LED on GPIO2.
//! On a host, stdin is fed through an in-memory channel and replies go to
//! stdout; set `SERIAL_COMMANDS_LOG=trace` to see the dispatch trace.

use core::fmt::Write;

use serial_commands::console::{Escaped, SetupError};
use serial_commands::{ByteChannel, CommandDescriptor, Interpreter, Invocation, VERSION};

/// Application state reached by the handlers.
struct App {
    led_on_count: u32,
    led_on: bool,
    set_led: Box<dyn FnMut(bool)>,
}

impl App {
    fn new(set_led: Box<dyn FnMut(bool)>) -> Self {
        Self {
            led_on_count: 0,
            led_on: false,
            set_led,
        }
    }

    fn switch(&mut self, on: bool) {
        if on && !self.led_on {
            self.led_on_count += 1;
        }
        self.led_on = on;
        (self.set_led)(on);
    }
}

fn commands<Ch: ByteChannel>() -> [CommandDescriptor<Ch, App>; 5] {
    [
        CommandDescriptor::named("ON", cmd_led_on).with_brief("switch the LED on"),
        CommandDescriptor::named("OFF", cmd_led_off).with_brief("switch the LED off"),
        CommandDescriptor::named("STATUS", cmd_status).with_brief("show LED state"),
        CommandDescriptor::named("ECHO", cmd_echo).with_brief("repeat the arguments"),
        CommandDescriptor::one_key("!", cmd_toggle).with_brief("toggle the LED (no Enter)"),
    ]
}

fn setup<'a, Ch: ByteChannel>(
    interp: &mut Interpreter<'a, Ch, App>,
    cmds: &'a [CommandDescriptor<Ch, App>],
) -> Result<(), SetupError> {
    for cmd in cmds {
        interp.register(cmd)?;
    }
    interp.set_default_handler(cmd_unrecognized);
    Ok(())
}

fn print_banner<Ch: ByteChannel>(interp: &mut Interpreter<'_, Ch, App>) {
    let mut text = String::new();
    let _ = write!(text, "\r\n{}\r\n", VERSION);
    for cmd in interp.registry().named() {
        let _ = write!(text, "  {:<8} {}\r\n", Escaped(cmd.name()).to_string(), cmd.brief());
    }
    for cmd in interp.registry().one_key() {
        let _ = write!(text, "  {:<8} {}\r\n", Escaped(cmd.name()).to_string(), cmd.brief());
    }
    if let Some(ch) = interp.channel_mut() {
        ByteChannel::write_str(ch, &text);
    }
}

// --- Command Implementations ---

fn cmd_unrecognized<Ch: ByteChannel>(inv: &mut Invocation<'_, Ch, App>, cmd: &[u8]) {
    let _ = write!(inv, "Unrecognized command [{}]\r\n", String::from_utf8_lossy(cmd));
}

fn cmd_led_on<Ch: ByteChannel>(inv: &mut Invocation<'_, Ch, App>) {
    let app = inv.context_mut();
    app.switch(true);
    let count = app.led_on_count;
    let _ = write!(inv, "Led was on {} times\r\nLed is on\r\n", count);
}

fn cmd_led_off<Ch: ByteChannel>(inv: &mut Invocation<'_, Ch, App>) {
    inv.context_mut().switch(false);
    let _ = write!(inv, "Led is off\r\n");
}

fn cmd_status<Ch: ByteChannel>(inv: &mut Invocation<'_, Ch, App>) {
    let (on, count) = (inv.context().led_on, inv.context().led_on_count);
    let _ = write!(inv, "led={} switched_on={}\r\n", if on { "on" } else { "off" }, count);
}

fn cmd_echo<Ch: ByteChannel>(inv: &mut Invocation<'_, Ch, App>) {
    let mut first = true;
    while let Some(token) = inv.next_token() {
        let sep = if first { "" } else { " " };
        first = false;
        let _ = write!(inv, "{}{}", sep, String::from_utf8_lossy(token));
    }
    let _ = write!(inv, "\r\n");
}

fn cmd_toggle<Ch: ByteChannel>(inv: &mut Invocation<'_, Ch, App>) {
    let app = inv.context_mut();
    let on = !app.led_on;
    app.switch(on);
    let _ = write!(inv, "Led is {}\r\n", if on { "on" } else { "off" });
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::PinDriver;
    use esp_idf_svc::hal::prelude::Peripherals;
    use serial_commands::hal::{init_uart, UartChannel, UartConfig};

    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;

    let mut led = PinDriver::output(peripherals.pins.gpio2)?;
    led.set_low()?;
    let app = App::new(Box::new(move |on| {
        let _ = if on { led.set_high() } else { led.set_low() };
    }));

    // ESP32-S3 UART0: TX=GPIO43, RX=GPIO44
    let uart = init_uart(
        peripherals.uart0,
        peripherals.pins.gpio43,
        peripherals.pins.gpio44,
        &UartConfig::default(),
    )?;

    let mut storage = [0u8; 32];
    let cmds = commands::<UartChannel<'static>>();
    let mut interp = Interpreter::new(&mut storage, app)?.with_channel(uart);
    setup(&mut interp, &cmds)?;
    print_banner(&mut interp);

    loop {
        if let Err(e) = interp.poll() {
            log::warn!("console: {}", e);
        }
        FreeRtos::delay_ms(10);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{self, Read, Write as _};
    use std::str::FromStr;
    use std::sync::OnceLock;
    use std::time::Instant;

    use log::LevelFilter;
    use serial_commands::log_drain;
    use serial_commands::{BufferedChannel, ByteChannel, Interpreter, InterpreterConfig};
    use serial_commands::{LogStream, StreamLogger};

    use super::{commands, print_banner, setup, App};

    type HostChannel = BufferedChannel<256, 2048>;

    static LOG_STREAM: LogStream = LogStream::new();
    static START: OnceLock<Instant> = OnceLock::new();
    static LOGGER: OnceLock<StreamLogger> = OnceLock::new();

    fn clock_us() -> i64 {
        START.get_or_init(Instant::now).elapsed().as_micros() as i64
    }

    /// Log sink that forwards drained lines to stderr.
    struct Stderr;

    impl ByteChannel for Stderr {
        fn available(&self) -> usize {
            0
        }

        fn read(&mut self) -> Option<u8> {
            None
        }

        fn write(&mut self, bytes: &[u8]) -> usize {
            io::stderr().write_all(bytes).map(|_| bytes.len()).unwrap_or(0)
        }
    }

    fn init_logging() {
        let level = std::env::var("SERIAL_COMMANDS_LOG")
            .ok()
            .and_then(|v| LevelFilter::from_str(&v).ok())
            .unwrap_or(LevelFilter::Warn);
        let logger = LOGGER.get_or_init(|| StreamLogger::new(&LOG_STREAM, clock_us, level));
        let _ = logger.install();
    }

    fn flush(interp: &mut Interpreter<'_, HostChannel, App>) -> io::Result<()> {
        if let Some(ch) = interp.channel_mut() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(ch.output())?;
            stdout.flush()?;
            ch.clear_output();
        }
        log_drain::drain_to(&LOG_STREAM, &mut Stderr);
        log_drain::report_dropped(&LOG_STREAM, &mut Stderr);
        Ok(())
    }

    pub fn run() -> anyhow::Result<()> {
        init_logging();

        // Terminals deliver bare LF
        let config = InterpreterConfig::default().with_terminator(b"\n");
        let app = App::new(Box::new(|_| {}));

        let mut storage = [0u8; 64];
        let cmds = commands::<HostChannel>();
        let mut interp = Interpreter::with_config(&mut storage, config, app)?.with_channel(HostChannel::new());
        setup(&mut interp, &cmds)?;
        print_banner(&mut interp);
        flush(&mut interp)?;

        let mut stdin = io::stdin().lock();
        let mut chunk = [0u8; 128];
        loop {
            let n = stdin.read(&mut chunk)?;
            if n == 0 {
                break;
            }

            let mut rest = &chunk[..n];
            while !rest.is_empty() {
                let fed = interp.channel_mut().map_or(0, |ch| ch.feed(rest));
                rest = &rest[fed..];
                if let Err(e) = interp.poll() {
                    log::warn!("console: {}", e);
                }
                flush(&mut interp)?;
            }
        }
        Ok(())
    }
}
