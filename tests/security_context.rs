mod common;

use proptest::collection;
use proptest::prelude::*;
use spnego::{ContextRole, NegotiateFlags, SecurityContext, SIGNATURE_SIZE};

use crate::common::*;

const MESSAGES: [&[u8]; 3] = [b"Hello, World!!!", b"", b"a somewhat longer application message"];

fn extended_session_security() -> NegotiateFlags {
    NegotiateFlags::NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY
        | NegotiateFlags::NTLM_SSP_NEGOTIATE_KEY_EXCH
        | NegotiateFlags::NTLM_SSP_NEGOTIATE128
        | NegotiateFlags::NTLM_SSP_NEGOTIATE_SEAL
        | NegotiateFlags::NTLM_SSP_NEGOTIATE_SIGN
}

fn legacy() -> NegotiateFlags {
    NegotiateFlags::NTLM_SSP_NEGOTIATE_SEAL | NegotiateFlags::NTLM_SSP_NEGOTIATE_SIGN
}

fn wire_message(signature: [u8; SIGNATURE_SIZE], sealed: &[u8]) -> Vec<u8> {
    let mut message = signature.to_vec();
    message.extend_from_slice(sealed);

    message
}

#[test]
fn same_key_and_flags_seal_identically() {
    init_tracing();

    let mut first = SecurityContext::new(extended_session_security(), &SESSION_KEY).unwrap();
    let mut second = SecurityContext::new(extended_session_security(), &SESSION_KEY).unwrap();

    for message in MESSAGES {
        assert_eq!(first.seal(message).unwrap(), second.seal(message).unwrap());
    }
}

#[test]
fn extended_session_security_changes_the_keystream() {
    let mut extended = SecurityContext::new(extended_session_security(), &SESSION_KEY).unwrap();
    let mut legacy = SecurityContext::new(legacy(), &SESSION_KEY).unwrap();

    let (_, extended_sealed) = extended.seal(MESSAGES[0]).unwrap();
    let (_, legacy_sealed) = legacy.seal(MESSAGES[0]).unwrap();

    assert_ne!(extended_sealed, legacy_sealed);
}

#[test]
fn first_message_unseals_with_matching_signature() {
    init_tracing();

    for flags in [extended_session_security(), legacy()] {
        let mut initiator = SecurityContext::new(flags, &SESSION_KEY).unwrap();
        let mut acceptor = SecurityContext::with_role(flags, &SESSION_KEY, ContextRole::Acceptor).unwrap();

        let (signature, sealed) = initiator.seal(MESSAGES[0]).unwrap();
        let (expected_signature, plaintext) = acceptor.unseal(&wire_message(signature, &sealed)).unwrap();

        assert_eq!(plaintext, MESSAGES[0]);
        assert_eq!(expected_signature, signature, "flags: {:?}", flags);
    }
}

#[test]
fn acceptor_reply_unseals_on_initiator() {
    for flags in [extended_session_security(), legacy()] {
        let mut initiator = SecurityContext::new(flags, &SESSION_KEY).unwrap();
        let mut acceptor = SecurityContext::with_role(flags, &SESSION_KEY, ContextRole::Acceptor).unwrap();

        let (signature, sealed) = initiator.seal(b"request").unwrap();
        acceptor.unseal(&wire_message(signature, &sealed)).unwrap();

        let (signature, sealed) = acceptor.seal(b"response").unwrap();
        let (_, plaintext) = initiator.unseal(&wire_message(signature, &sealed)).unwrap();

        assert_eq!(plaintext, b"response");
    }
}

#[test]
fn tampered_message_changes_expected_signature() {
    let mut initiator = SecurityContext::new(extended_session_security(), &SESSION_KEY).unwrap();
    let mut acceptor =
        SecurityContext::with_role(extended_session_security(), &SESSION_KEY, ContextRole::Acceptor).unwrap();

    let (signature, mut sealed) = initiator.seal(MESSAGES[0]).unwrap();
    sealed[0] ^= 0x01;

    let (expected_signature, plaintext) = acceptor.unseal(&wire_message(signature, &sealed)).unwrap();

    assert_ne!(plaintext, MESSAGES[0]);
    assert_ne!(expected_signature, signature);
}

#[test]
fn reset_cipher_state_replays_keystream_but_keeps_sequence_number() {
    let mut context = SecurityContext::new(extended_session_security(), &SESSION_KEY).unwrap();

    let (_, first) = context.seal(MESSAGES[0]).unwrap();
    context.reset_cipher_state();
    let (signature, second) = context.seal(MESSAGES[0]).unwrap();

    assert_eq!(first, second);
    assert_eq!(signature[12..], 1u32.to_le_bytes());
    assert_eq!(context.sequence_number(), 2);
}

#[test]
fn sign_uses_caller_sequence_number() {
    let mut context = SecurityContext::new(extended_session_security(), &SESSION_KEY).unwrap();

    let signature = context.sign(MESSAGES[0], 42, false).unwrap();

    assert_eq!(signature[..4], [0x01, 0x00, 0x00, 0x00]);
    assert_eq!(signature[12..], 42u32.to_le_bytes());
    assert_eq!(context.sequence_number(), 1);
}

proptest! {
    #[test]
    fn acceptor_recovers_every_plaintext(
        extended in any::<bool>(),
        messages in collection::vec(collection::vec(any::<u8>(), 0..128), 1..8),
    ) {
        let flags = if extended { extended_session_security() } else { legacy() };
        let mut initiator = SecurityContext::new(flags, &SESSION_KEY).unwrap();
        let mut acceptor = SecurityContext::with_role(flags, &SESSION_KEY, ContextRole::Acceptor).unwrap();

        for message in &messages {
            let (signature, sealed) = initiator.seal(message).unwrap();
            let (_, plaintext) = acceptor.unseal(&wire_message(signature, &sealed)).unwrap();

            prop_assert_eq!(&plaintext, message);
        }
    }
}
