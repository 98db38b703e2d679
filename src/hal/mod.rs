//! Hardware Abstraction Layer for ESP-IDF targets.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Command logic stays in the console, HAL is just I/O.

pub mod uart;

pub use uart::{init_uart, UartChannel, UartConfig};
