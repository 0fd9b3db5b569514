use super::{KeyDirection, NegotiateFlags};
use crate::crypto::{compute_md5, HASH_SIZE};

const CLIENT_SIGN_MAGIC: &[u8] = b"session key to client-to-server signing key magic constant\0";
const SERVER_SIGN_MAGIC: &[u8] = b"session key to server-to-client signing key magic constant\0";
const CLIENT_SEAL_MAGIC: &[u8] = b"session key to client-to-server sealing key magic constant\0";
const SERVER_SEAL_MAGIC: &[u8] = b"session key to server-to-client sealing key magic constant\0";

const SEAL_KEY_56_SIZE: usize = 7;
const SEAL_KEY_40_SIZE: usize = 5;
const SEAL_KEY_56_SUFFIX: [u8; 1] = [0xa0];
const SEAL_KEY_40_SUFFIX: [u8; 3] = [0xe5, 0x38, 0xb0];

/// SIGNKEY: only defined with extended session security, `None` otherwise.
pub fn sign_key(flags: NegotiateFlags, session_key: &[u8], direction: KeyDirection) -> Option<[u8; HASH_SIZE]> {
    if !flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY) {
        return None;
    }

    let magic = match direction {
        KeyDirection::ClientToServer => CLIENT_SIGN_MAGIC,
        KeyDirection::ServerToClient => SERVER_SIGN_MAGIC,
    };

    Some(generate_key(session_key, magic))
}

/// SEALKEY: the session key weakened to the negotiated strength.
pub fn seal_key(flags: NegotiateFlags, session_key: &[u8], direction: KeyDirection) -> Vec<u8> {
    if flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY) {
        let key = if flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE128) {
            session_key
        } else if flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE56) {
            truncate(session_key, SEAL_KEY_56_SIZE)
        } else {
            truncate(session_key, SEAL_KEY_40_SIZE)
        };

        let magic = match direction {
            KeyDirection::ClientToServer => CLIENT_SEAL_MAGIC,
            KeyDirection::ServerToClient => SERVER_SEAL_MAGIC,
        };

        generate_key(key, magic).to_vec()
    } else if flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE56) {
        [truncate(session_key, SEAL_KEY_56_SIZE), &SEAL_KEY_56_SUFFIX].concat()
    } else {
        [truncate(session_key, SEAL_KEY_40_SIZE), &SEAL_KEY_40_SUFFIX].concat()
    }
}

fn generate_key(key: &[u8], magic: &[u8]) -> [u8; HASH_SIZE] {
    let mut value = key.to_vec();
    value.extend_from_slice(magic);

    compute_md5(&value)
}

fn truncate(key: &[u8], len: usize) -> &[u8] {
    &key[..key.len().min(len)]
}
