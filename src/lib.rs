//! # SerialCommands
//!
//! Line-oriented command interpreter for byte channels such as a UART.
//!
//! ## Architecture
//!
//! ```text
//! ByteChannel ──byte──▶ FrameBuffer ──frame──▶ Tokenizer ──name──▶ Registry
//!      ▲                    │ first byte                              │
//!      │                    └──────────▶ one-key lookup               ▼
//!      └──────────── replies ◀──────────── Invocation ◀──────── handler
//! ```
//!
//! - The caller owns the interpreter and polls it; nothing here blocks
//! - Frame storage and command descriptors are borrowed, never allocated
//! - Handlers reach arguments, the channel and caller state through
//!   [`Invocation`]

#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod config;
pub mod console;
pub mod logging;
pub mod log_drain;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use channel::{BufferedChannel, ByteChannel};
pub use config::InterpreterConfig;
pub use console::{
    CommandDescriptor, CommandKind, ConsoleError, Interpreter, Invocation, SetupError,
};
pub use logging::{LogStream, StreamLogger};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");
