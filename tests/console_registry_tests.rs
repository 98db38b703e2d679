//! Command registry tests

use serial_commands::console::{
    CommandDescriptor, CommandKind, Invocation, Registry, SetupError, DEFAULT_REGISTRY_SIZE,
};
use serial_commands::BufferedChannel;

type Chan = BufferedChannel<4, 4>;

fn noop(_: &mut Invocation<'_, Chan, ()>) {}

#[test]
fn test_descriptor_builders() {
    let on = CommandDescriptor::named("ON", noop).with_brief("switch on");
    assert_eq!(on.name(), b"ON");
    assert_eq!(on.brief(), "switch on");
    assert_eq!(on.kind(), CommandKind::Named);

    let bang = CommandDescriptor::one_key("!", noop);
    assert_eq!(bang.kind(), CommandKind::OneKey);
    assert_eq!(bang.key(), Some(b'!'));
    assert_eq!(bang.brief(), "");
}

#[test]
fn test_empty_one_key_never_triggers() {
    let empty = CommandDescriptor::one_key("", noop);
    assert_eq!(empty.key(), None);
}

#[test]
fn test_match_is_length_exact() {
    let led = CommandDescriptor::named("LED", noop);
    assert!(led.matches(b"LED"));
    assert!(!led.matches(b"LEDS"));
    assert!(!led.matches(b"LE"));
    assert!(!led.matches(b"led"));
}

#[test]
fn test_kinds_kept_apart_in_order() {
    let a = CommandDescriptor::named("A", noop);
    let b = CommandDescriptor::named("B", noop);
    let x = CommandDescriptor::one_key("x", noop);

    let mut reg: Registry<'_, Chan, ()> = Registry::new();
    assert!(!reg.has_one_key());
    reg.register(&a).unwrap();
    reg.register(&x).unwrap();
    reg.register(&b).unwrap();

    let named: Vec<&[u8]> = reg.named().map(|c| c.name()).collect();
    let keys: Vec<&[u8]> = reg.one_key().map(|c| c.name()).collect();
    assert_eq!(named, vec![&b"A"[..], &b"B"[..]]);
    assert_eq!(keys, vec![&b"x"[..]]);
    assert!(reg.has_one_key());
}

#[test]
fn test_capacity_per_kind() {
    let a = CommandDescriptor::named("A", noop);
    let b = CommandDescriptor::named("B", noop);
    let x = CommandDescriptor::one_key("x", noop);

    let mut reg: Registry<'_, Chan, (), 1> = Registry::new();
    reg.register(&a).unwrap();
    assert_eq!(reg.register(&b), Err(SetupError::RegistryFull));
    assert!(reg.register(&x).is_ok());
}

#[test]
fn test_default_size_holds_sixteen() {
    let cmd = CommandDescriptor::named("A", noop);
    let mut reg: Registry<'_, Chan, ()> = Registry::default();
    for _ in 0..DEFAULT_REGISTRY_SIZE {
        reg.register(&cmd).unwrap();
    }
    assert_eq!(reg.register(&cmd), Err(SetupError::RegistryFull));
}

#[test]
fn test_default_handler_replaced() {
    fn first(_: &mut Invocation<'_, Chan, ()>, _: &[u8]) {}

    let mut reg: Registry<'_, Chan, ()> = Registry::new();
    assert!(reg.default_handler().is_none());
    reg.set_default_handler(first);
    reg.set_default_handler(first);
    assert!(reg.default_handler().is_some());
}
