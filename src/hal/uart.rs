//! UART byte channel.
//!
//! Wraps an ESP-IDF UART driver so the interpreter can poll it. Reads use
//! `NON_BLOCK`; a poll never waits for the line.

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, Uart, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use crate::channel::ByteChannel;

/// UART line configuration.
pub struct UartConfig {
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 115200 }
    }
}

/// Initialize a full-duplex UART without flow control.
pub fn init_uart<'d, U: Uart>(
    uart: impl Peripheral<P = U> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    config: &UartConfig,
) -> Result<UartChannel<'d>, EspError> {
    let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

    let driver = UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )?;
    Ok(UartChannel::new(driver))
}

/// [`ByteChannel`] over an ESP-IDF UART driver.
pub struct UartChannel<'d> {
    driver: UartDriver<'d>,
}

impl<'d> UartChannel<'d> {
    pub fn new(driver: UartDriver<'d>) -> Self {
        Self { driver }
    }
}

impl ByteChannel for UartChannel<'_> {
    fn available(&self) -> usize {
        self.driver.remaining_read().unwrap_or(0)
    }

    fn read(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.driver.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        self.driver.write(bytes).unwrap_or(0)
    }
}
