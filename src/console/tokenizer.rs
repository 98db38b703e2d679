//! Frame tokenizer
//!
//! Split on any byte of a delimiter set, collapsing runs of delimiters.
//! The cursor only moves forward: a pulled token cannot be pulled again.

use core::iter::FusedIterator;

/// Pull-based cursor over the tokens left in a frame.
#[derive(Debug, Clone)]
pub struct TokenCursor<'f> {
    rest: &'f [u8],
    delimiters: &'f [u8],
}

impl<'f> TokenCursor<'f> {
    /// Cursor that yields nothing
    pub const fn empty() -> Self {
        Self { rest: &[], delimiters: &[] }
    }

    /// Pull the next token as UTF-8.
    ///
    /// A non-UTF-8 token is consumed and reported as `None`.
    pub fn next_str(&mut self) -> Option<&'f str> {
        self.next().and_then(|t| core::str::from_utf8(t).ok())
    }

    /// Unconsumed remainder of the frame, delimiters included
    pub fn remainder(&self) -> &'f [u8] {
        self.rest
    }

    fn is_delimiter(&self, b: u8) -> bool {
        self.delimiters.contains(&b)
    }
}

impl<'f> Iterator for TokenCursor<'f> {
    type Item = &'f [u8];

    fn next(&mut self) -> Option<&'f [u8]> {
        let rest = self.rest;
        let start = match rest.iter().position(|&b| !self.is_delimiter(b)) {
            Some(i) => i,
            None => {
                self.rest = &[];
                return None;
            }
        };

        let body = &rest[start..];
        let end = body
            .iter()
            .position(|&b| self.is_delimiter(b))
            .unwrap_or(body.len());

        let (token, tail) = body.split_at(end);
        self.rest = tail;
        Some(token)
    }
}

impl FusedIterator for TokenCursor<'_> {}

/// Split a frame into its command token and a cursor over the arguments.
///
/// The command token is `None` for an empty or delimiter-only frame.
pub fn split<'f>(frame: &'f [u8], delimiters: &'f [u8]) -> (Option<&'f [u8]>, TokenCursor<'f>) {
    let mut cursor = TokenCursor { rest: frame, delimiters };
    let first = cursor.next();
    (first, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_and_args() {
        let (cmd, mut args) = split(b"SET a b", b" ");
        assert_eq!(cmd, Some(&b"SET"[..]));
        assert_eq!(args.next(), Some(&b"a"[..]));
        assert_eq!(args.next(), Some(&b"b"[..]));
        assert_eq!(args.next(), None);
        assert_eq!(args.next(), None);
    }

    #[test]
    fn test_collapses_delimiter_runs() {
        let (cmd, args) = split(b"  go,, now ", b" ,");
        assert_eq!(cmd, Some(&b"go"[..]));
        let rest: Vec<&[u8]> = args.collect();
        assert_eq!(rest, vec![&b"now"[..]]);
    }

    #[test]
    fn test_empty_and_delimiter_only_frames() {
        assert_eq!(split(b"", b" ").0, None);
        assert_eq!(split(b"   ", b" ").0, None);
    }

    #[test]
    fn test_next_str_consumes_invalid_utf8() {
        let (_, mut args) = split(b"X \xff ok", b" ");
        assert_eq!(args.next_str(), None);
        assert_eq!(args.next_str(), Some("ok"));
    }

    #[test]
    fn test_empty_cursor() {
        let mut c = TokenCursor::empty();
        assert_eq!(c.next(), None);
        assert!(c.remainder().is_empty());
    }
}
