//! Command registry
//!
//! Two append-only sequences, one for named commands and one for one-key
//! commands. Descriptors are borrowed, never copied, so a registry can be
//! filled from `static` tables without allocating.

use heapless::Vec;
use log::trace;

use super::{Escaped, Invocation, SetupError};

/// Default number of descriptors per kind.
pub const DEFAULT_REGISTRY_SIZE: usize = 16;

/// Handler for named and one-key commands.
pub type Handler<Ch, C> = fn(&mut Invocation<'_, Ch, C>);

/// Fallback handler; receives the unmatched command token.
pub type DefaultHandler<Ch, C> = fn(&mut Invocation<'_, Ch, C>, &[u8]);

/// How a descriptor is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Matched against the first token of a terminated frame
    Named,
    /// Matched against the first byte of a fresh frame, no terminator needed
    OneKey,
}

/// Command descriptor
pub struct CommandDescriptor<Ch, C> {
    name: &'static [u8],
    brief: &'static str,
    handler: Handler<Ch, C>,
    kind: CommandKind,
}

impl<Ch, C> CommandDescriptor<Ch, C> {
    /// Descriptor of the given kind. Names are raw bytes.
    pub const fn new(name: &'static [u8], handler: Handler<Ch, C>, kind: CommandKind) -> Self {
        Self { name, brief: "", handler, kind }
    }

    /// Named command, dispatched on an exact match of the first token
    pub const fn named(name: &'static str, handler: Handler<Ch, C>) -> Self {
        Self::named_bytes(name.as_bytes(), handler)
    }

    /// Named command with a name that need not be UTF-8
    pub const fn named_bytes(name: &'static [u8], handler: Handler<Ch, C>) -> Self {
        Self::new(name, handler, CommandKind::Named)
    }

    /// One-key command; only the first byte of `key` is significant.
    ///
    /// For keys at or above 0x80 use [`one_key_bytes`](Self::one_key_bytes):
    /// `"\u{ff}"` is encoded as `C3 BF` and would trigger on `0xC3`.
    pub const fn one_key(key: &'static str, handler: Handler<Ch, C>) -> Self {
        Self::one_key_bytes(key.as_bytes(), handler)
    }

    /// One-key command on a raw byte, e.g. `one_key_bytes(b"\xff", ..)`
    pub const fn one_key_bytes(key: &'static [u8], handler: Handler<Ch, C>) -> Self {
        Self::new(key, handler, CommandKind::OneKey)
    }

    /// Attach a one-line description for help listings
    pub const fn with_brief(mut self, brief: &'static str) -> Self {
        self.brief = brief;
        self
    }

    pub fn name(&self) -> &'static [u8] {
        self.name
    }

    pub fn brief(&self) -> &'static str {
        self.brief
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn handler(&self) -> Handler<Ch, C> {
        self.handler
    }

    /// Byte that triggers a one-key command. An empty name never triggers.
    pub fn key(&self) -> Option<u8> {
        self.name.first().copied()
    }

    /// Length-exact comparison against a command token.
    ///
    /// A registered name that is a prefix of the token does not match:
    /// with "ON" registered, "ONN" goes to the default handler.
    pub fn matches(&self, token: &[u8]) -> bool {
        self.name == token
    }
}

/// Ordered descriptor storage plus the default handler.
pub struct Registry<'a, Ch, C, const R: usize = DEFAULT_REGISTRY_SIZE> {
    named: Vec<&'a CommandDescriptor<Ch, C>, R>,
    one_key: Vec<&'a CommandDescriptor<Ch, C>, R>,
    default_handler: Option<DefaultHandler<Ch, C>>,
}

impl<'a, Ch, C, const R: usize> Registry<'a, Ch, C, R> {
    /// Create empty registry
    pub const fn new() -> Self {
        Self {
            named: Vec::new(),
            one_key: Vec::new(),
            default_handler: None,
        }
    }

    /// Append a descriptor to the sequence selected by its kind.
    ///
    /// Names are not deduplicated; the earliest registration wins.
    pub fn register(&mut self, cmd: &'a CommandDescriptor<Ch, C>) -> Result<(), SetupError> {
        let list = match cmd.kind {
            CommandKind::Named => &mut self.named,
            CommandKind::OneKey => &mut self.one_key,
        };
        list.push(cmd).map_err(|_| SetupError::RegistryFull)
    }

    /// Install the fallback handler, replacing any previous one
    pub fn set_default_handler(&mut self, handler: DefaultHandler<Ch, C>) {
        self.default_handler = Some(handler);
    }

    pub fn default_handler(&self) -> Option<DefaultHandler<Ch, C>> {
        self.default_handler
    }

    /// First named descriptor whose name equals `token`, with its index
    pub(crate) fn find_named(&self, token: &[u8]) -> Option<(usize, &'a CommandDescriptor<Ch, C>)> {
        self.named
            .iter()
            .copied()
            .enumerate()
            .find(|(_, c)| {
                trace!("comparing [{}] to [{}]", Escaped(token), Escaped(c.name));
                c.matches(token)
            })
    }

    /// First one-key descriptor triggered by `byte`, with its index
    pub(crate) fn find_one_key(&self, byte: u8) -> Option<(usize, &'a CommandDescriptor<Ch, C>)> {
        self.one_key
            .iter()
            .copied()
            .enumerate()
            .find(|(_, c)| c.key() == Some(byte))
    }

    /// Named descriptors in registration order
    pub fn named(&self) -> impl Iterator<Item = &'a CommandDescriptor<Ch, C>> + '_ {
        self.named.iter().copied()
    }

    /// One-key descriptors in registration order
    pub fn one_key(&self) -> impl Iterator<Item = &'a CommandDescriptor<Ch, C>> + '_ {
        self.one_key.iter().copied()
    }

    pub fn has_one_key(&self) -> bool {
        !self.one_key.is_empty()
    }
}

impl<Ch, C, const R: usize> Default for Registry<'_, Ch, C, R> {
    fn default() -> Self {
        Self::new()
    }
}
