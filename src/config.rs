//! Interpreter configuration
//!
//! Framing parameters are fixed when the interpreter is built.

use crate::console::SetupError;

/// Default frame terminator: CR-LF.
pub const DEFAULT_TERMINATOR: &[u8] = b"\r\n";

/// Default token delimiter set: a single space.
pub const DEFAULT_DELIMITERS: &[u8] = b" ";

/// Framing and tokenizing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig<'a> {
    /// Byte sequence that completes a frame.
    pub terminator: &'a [u8],
    /// Any of these bytes separates tokens.
    pub delimiters: &'a [u8],
}

impl<'a> InterpreterConfig<'a> {
    /// Config with explicit terminator and delimiters
    pub const fn new(terminator: &'a [u8], delimiters: &'a [u8]) -> Self {
        Self { terminator, delimiters }
    }

    /// Replace the terminator
    pub const fn with_terminator(mut self, terminator: &'a [u8]) -> Self {
        self.terminator = terminator;
        self
    }

    /// Replace the delimiter set
    pub const fn with_delimiters(mut self, delimiters: &'a [u8]) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Check that both byte sets are usable.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.terminator.is_empty() {
            return Err(SetupError::EmptyTerminator);
        }
        if self.delimiters.is_empty() {
            return Err(SetupError::EmptyDelimiters);
        }
        Ok(())
    }
}

impl Default for InterpreterConfig<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATOR, DEFAULT_DELIMITERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_crlf_space() {
        let cfg = InterpreterConfig::default();
        assert_eq!(cfg.terminator, b"\r\n");
        assert_eq!(cfg.delimiters, b" ");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_sets() {
        let cfg = InterpreterConfig::default().with_terminator(b"");
        assert_eq!(cfg.validate(), Err(SetupError::EmptyTerminator));

        let cfg = InterpreterConfig::default().with_delimiters(b"");
        assert_eq!(cfg.validate(), Err(SetupError::EmptyDelimiters));
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = InterpreterConfig::default()
            .with_terminator(b"\n")
            .with_delimiters(b" ,");
        assert_eq!(cfg.terminator, b"\n");
        assert_eq!(cfg.delimiters, b" ,");
    }
}
