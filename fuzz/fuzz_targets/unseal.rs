#![no_main]

extern crate libfuzzer_sys;
extern crate spnego;

use spnego::{ContextRole, NegotiateFlags, SecurityContext};

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    let Some((&[flags_byte, key_len], rest)) = data.split_first_chunk::<2>() else {
        return;
    };

    let key_len = usize::from(key_len % 17);
    if rest.len() < key_len {
        return;
    }
    let (session_key, message) = rest.split_at(key_len);

    let mut flags = NegotiateFlags::NTLM_SSP_NEGOTIATE_SEAL | NegotiateFlags::NTLM_SSP_NEGOTIATE_SIGN;
    if flags_byte & 0x01 != 0 {
        flags |= NegotiateFlags::NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY;
    }
    if flags_byte & 0x02 != 0 {
        flags |= NegotiateFlags::NTLM_SSP_NEGOTIATE_KEY_EXCH;
    }
    if flags_byte & 0x04 != 0 {
        flags |= NegotiateFlags::NTLM_SSP_NEGOTIATE128;
    } else if flags_byte & 0x08 != 0 {
        flags |= NegotiateFlags::NTLM_SSP_NEGOTIATE56;
    }

    if let Ok(mut context) = SecurityContext::with_role(flags, session_key, ContextRole::Acceptor) {
        let _ = context.unseal(message);
        let _ = context.sign(message, 0, flags_byte & 0x10 != 0);
    }
});
