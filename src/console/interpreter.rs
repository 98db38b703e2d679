//! Dispatch engine
//!
//! ```text
//!            first byte matches a one-key command
//!        ┌──────────────────────────────────────────┐
//!        ▼                                          │
//!      Idle ──byte──▶ Accumulating ──terminator──▶ Complete
//!        ▲                  │ overflow                │ dispatch
//!        └──────────────────┴─────────────────────────┘
//! ```
//!
//! Polled from one thread. A poll drains only what the channel already
//! holds and never waits.

use log::{debug, trace, warn};

use super::frame_buffer::{Append, FrameBuffer, TerminatorMatch};
use super::registry::{CommandDescriptor, CommandKind, DefaultHandler, Registry, DEFAULT_REGISTRY_SIZE};
use super::tokenizer::{self, TokenCursor};
use super::{ConsoleError, Escaped, Invocation, SetupError};
use crate::channel::ByteChannel;
use crate::config::InterpreterConfig;

/// Line-oriented command interpreter bound to an optional byte channel.
///
/// `Ch` is the channel type (pass `&mut T` to keep ownership elsewhere),
/// `C` is caller state handed to every handler and `R` bounds each
/// command registry.
pub struct Interpreter<'a, Ch, C, const R: usize = DEFAULT_REGISTRY_SIZE> {
    channel: Option<Ch>,
    frame: FrameBuffer<'a>,
    delimiters: &'a [u8],
    registry: Registry<'a, Ch, C, R>,
    context: C,
}

impl<'a, Ch, C> Interpreter<'a, Ch, C> {
    /// Interpreter over `storage` with CR-LF framing and space delimiters.
    ///
    /// The frame capacity is `storage.len()`, terminator included.
    pub fn new(storage: &'a mut [u8], context: C) -> Result<Self, SetupError> {
        Self::build(storage, InterpreterConfig::default(), context)
    }

    /// Interpreter with explicit framing parameters
    pub fn with_config(
        storage: &'a mut [u8],
        config: InterpreterConfig<'a>,
        context: C,
    ) -> Result<Self, SetupError> {
        Self::build(storage, config, context)
    }
}

impl<'a, Ch, C, const R: usize> Interpreter<'a, Ch, C, R> {
    /// Interpreter with a non-default registry size, e.g.
    /// `Interpreter::<_, _, 4>::build(..)`.
    pub fn build(
        storage: &'a mut [u8],
        config: InterpreterConfig<'a>,
        context: C,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            channel: None,
            frame: FrameBuffer::new(storage, config.terminator)?,
            delimiters: config.delimiters,
            registry: Registry::new(),
            context,
        })
    }

    /// Builder form of [`attach`](Self::attach)
    pub fn with_channel(mut self, channel: Ch) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Add a command; its kind selects the named or one-key sequence.
    pub fn register(&mut self, cmd: &'a CommandDescriptor<Ch, C>) -> Result<(), SetupError> {
        debug!(
            "adding {:?} cmd=[{}] #{}",
            cmd.kind(),
            Escaped(cmd.name()),
            match cmd.kind() {
                CommandKind::Named => self.registry.named().count(),
                CommandKind::OneKey => self.registry.one_key().count(),
            }
        );
        self.registry.register(cmd)
    }

    /// Handler for frames whose command token matches no named command
    pub fn set_default_handler(&mut self, handler: DefaultHandler<Ch, C>) {
        self.registry.set_default_handler(handler);
    }

    /// Attach a channel, returning the one it replaces
    pub fn attach(&mut self, channel: Ch) -> Option<Ch> {
        self.channel.replace(channel)
    }

    /// Detach the channel; later polls report [`ConsoleError::NoChannel`]
    pub fn detach(&mut self) -> Option<Ch> {
        self.channel.take()
    }

    pub fn channel(&self) -> Option<&Ch> {
        self.channel.as_ref()
    }

    pub fn channel_mut(&mut self) -> Option<&mut Ch> {
        self.channel.as_mut()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Consume the interpreter, returning the context and the channel
    pub fn into_parts(self) -> (C, Option<Ch>) {
        (self.context, self.channel)
    }

    /// Drop any partial frame
    pub fn clear_buffer(&mut self) {
        self.frame.clear();
    }

    /// Bytes accumulated for the frame in progress
    pub fn pending(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    /// Number of terminator bytes matched so far
    pub fn terminator_pos(&self) -> usize {
        self.frame.terminator_pos()
    }

    /// Frame capacity in bytes
    pub fn capacity(&self) -> usize {
        self.frame.capacity()
    }

    pub fn registry(&self) -> &Registry<'a, Ch, C, R> {
        &self.registry
    }
}

impl<'a, Ch: ByteChannel, C, const R: usize> Interpreter<'a, Ch, C, R> {
    /// Drain the channel, dispatching every completed frame.
    ///
    /// Returns as soon as the channel reports no pending bytes. On overflow
    /// the partial frame is dropped and the rest of the input is left in
    /// the channel for the next poll.
    pub fn poll(&mut self) -> Result<(), ConsoleError> {
        let Self {
            channel,
            frame,
            delimiters,
            registry,
            context,
        } = self;
        let channel = channel.as_mut().ok_or(ConsoleError::NoChannel)?;

        while channel.available() > 0 {
            let byte = match channel.read() {
                Some(b) if b != 0 => b,
                _ => continue,
            };

            trace!(
                "read: cap={} pos={} term={} ch={}",
                frame.capacity(),
                frame.len(),
                frame.terminator_pos(),
                Escaped(&[byte])
            );

            if frame.append(byte) == Append::Overflow {
                warn!("buffer full, frame of {} bytes dropped", frame.capacity());
                return Err(ConsoleError::BufferFull);
            }

            if frame.len() == 1 && registry.has_one_key() {
                trace!("testing for one-key commands");
                if let Some((idx, cmd)) = registry.find_one_key(byte) {
                    debug!("one-key [{}] matched #{}", Escaped(&[byte]), idx);
                    let key = [byte];
                    let mut inv = Invocation::new(&key, TokenCursor::empty(), Some(&mut *channel), &mut *context);
                    (cmd.handler())(&mut inv);
                    frame.clear();
                    continue;
                }
            }

            if frame.match_terminator(byte) != TerminatorMatch::Complete {
                continue;
            }

            trace!("received: [{}]", Escaped(frame.as_bytes()));
            let (name, args) = tokenizer::split(frame.as_bytes(), *delimiters);
            if let Some(name) = name {
                let mut inv = Invocation::new(name, args, Some(&mut *channel), &mut *context);
                match registry.find_named(name) {
                    Some((idx, cmd)) => {
                        debug!("[{}] matched #{}", Escaped(name), idx);
                        (cmd.handler())(&mut inv);
                    }
                    None => match registry.default_handler() {
                        Some(fallback) => {
                            debug!("[{}] unmatched, default handler", Escaped(name));
                            fallback(&mut inv, name);
                        }
                        None => debug!("[{}] unmatched, no default handler", Escaped(name)),
                    },
                }
            }

            frame.clear();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::BufferedChannel;
    use core::fmt::Write;

    type Chan = BufferedChannel<64, 256>;
    type Cmd = CommandDescriptor<Chan, Vec<String>>;

    fn record(inv: &mut Invocation<'_, Chan, Vec<String>>) {
        let name = String::from_utf8_lossy(inv.command()).into_owned();
        inv.context_mut().push(name);
    }

    fn fallback(inv: &mut Invocation<'_, Chan, Vec<String>>, name: &[u8]) {
        let name = String::from_utf8_lossy(name).into_owned();
        let _ = write!(inv, "?{}", name);
        inv.context_mut().push(format!("default:{}", name));
    }

    #[test]
    fn test_rejects_bad_setup() {
        let mut empty: [u8; 0] = [];
        let r: Result<Interpreter<'_, Chan, ()>, _> = Interpreter::new(&mut empty, ());
        assert_eq!(r.err(), Some(SetupError::ZeroCapacity));

        let mut storage = [0u8; 8];
        let cfg = InterpreterConfig::default().with_delimiters(b"");
        let r: Result<Interpreter<'_, Chan, ()>, _> = Interpreter::with_config(&mut storage, cfg, ());
        assert_eq!(r.err(), Some(SetupError::EmptyDelimiters));
    }

    #[test]
    fn test_dispatches_named_command() {
        let on = Cmd::named("ON", record);
        let mut storage = [0u8; 32];
        let mut interp = Interpreter::new(&mut storage, Vec::new())
            .unwrap()
            .with_channel(Chan::new());
        interp.register(&on).unwrap();

        interp.channel_mut().unwrap().feed(b"ON\r\n");
        assert_eq!(interp.poll(), Ok(()));
        assert_eq!(interp.context(), &vec!["ON".to_string()]);
        assert!(interp.pending().is_empty());
    }

    #[test]
    fn test_default_handler_gets_unmatched_name() {
        let on = Cmd::named("ON", record);
        let mut storage = [0u8; 32];
        let mut interp = Interpreter::new(&mut storage, Vec::new())
            .unwrap()
            .with_channel(Chan::new());
        interp.register(&on).unwrap();
        interp.set_default_handler(fallback);

        interp.channel_mut().unwrap().feed(b"ONN\r\n");
        interp.poll().unwrap();
        assert_eq!(interp.context(), &vec!["default:ONN".to_string()]);
        assert_eq!(interp.channel().unwrap().output_str(), "?ONN");
    }

    #[test]
    fn test_one_key_preempts_framing() {
        let help = Cmd::one_key("?", record);
        let mut storage = [0u8; 32];
        let mut interp = Interpreter::new(&mut storage, Vec::new())
            .unwrap()
            .with_channel(Chan::new());
        interp.register(&help).unwrap();

        interp.channel_mut().unwrap().feed(b"??");
        interp.poll().unwrap();
        assert_eq!(interp.context().len(), 2);
        assert!(interp.pending().is_empty());
    }

    #[test]
    fn test_no_channel_leaves_state() {
        let mut storage = [0u8; 8];
        let mut interp: Interpreter<'_, Chan, ()> = Interpreter::new(&mut storage, ()).unwrap();
        assert_eq!(interp.poll(), Err(ConsoleError::NoChannel));
    }
}
