//! Console error types

use thiserror::Error;

/// Result of a poll that could not run to completion.
///
/// Both conditions are recoverable: the interpreter stays usable and the
/// caller simply polls again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// E01: No byte channel attached
    #[error("E01: no channel attached")]
    NoChannel,
    /// E02: Frame exceeded the buffer capacity; partial frame discarded
    #[error("E02: buffer full")]
    BufferFull,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoChannel => "E01",
            Self::BufferFull => "E02",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoChannel => "no channel attached",
            Self::BufferFull => "buffer full",
        }
    }
}

/// Errors raised while building or populating an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    /// S01: Terminator sequence is empty
    #[error("S01: terminator must not be empty")]
    EmptyTerminator,
    /// S02: Delimiter set is empty
    #[error("S02: delimiter set must not be empty")]
    EmptyDelimiters,
    /// S03: Frame buffer storage has no room
    #[error("S03: frame buffer capacity must be at least 1")]
    ZeroCapacity,
    /// S04: Registry storage for this command kind is exhausted
    #[error("S04: command registry full")]
    RegistryFull,
}

impl SetupError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTerminator => "S01",
            Self::EmptyDelimiters => "S02",
            Self::ZeroCapacity => "S03",
            Self::RegistryFull => "S04",
        }
    }
}
