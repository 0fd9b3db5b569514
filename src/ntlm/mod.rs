//! NTLM session security: the message signature and sealing primitives a [`SecurityContext`] is built from.
//!
//! # MSDN
//!
//! * [[MS-NLMP] 3.4 Session Security Details](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-nlmp/d1c86e81-eb66-47fd-8a6f-970050121347)
//!
//! [`SecurityContext`]: crate::SecurityContext

mod computations;

use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};

pub use self::computations::{seal_key, sign_key};
use crate::crypto::{compute_crc32, compute_hmac_md5, Rc4, HASH_SIZE};
use crate::Result;

pub const SIGNATURE_SIZE: usize = SIGNATURE_VERSION_SIZE + SIGNATURE_CHECKSUM_SIZE + SIGNATURE_SEQ_NUM_SIZE;

const SIGNATURE_VERSION_SIZE: usize = 4;
const SIGNATURE_SEQ_NUM_SIZE: usize = 4;
const SIGNATURE_CHECKSUM_SIZE: usize = 8;
const SIGNATURE_RANDOM_PAD_SIZE: usize = 4;
const MESSAGES_VERSION: u32 = 1;

bitflags! {
    /// Negotiated NTLM capabilities, with the MS-NLMP 2.2.2.5 bit layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NegotiateFlags: u32 {
        /// W-bit
        /// 56-bit sealing keys
        const NTLM_SSP_NEGOTIATE56 = 0x8000_0000;

        /// V-bit
        /// the signature checksum is encrypted as well
        const NTLM_SSP_NEGOTIATE_KEY_EXCH = 0x4000_0000;

        /// U-bit
        /// 128-bit sealing keys
        const NTLM_SSP_NEGOTIATE128 = 0x2000_0000;

        const NTLM_SSP_NEGOTIATE_VERSION = 0x0200_0000;

        const NTLM_SSP_NEGOTIATE_TARGET_INFO = 0x0080_0000;

        /// P-bit
        /// NTLMv2 session security: per-direction keys and HMAC-MD5 signatures
        const NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY = 0x0008_0000;

        const NTLM_SSP_NEGOTIATE_ALWAYS_SIGN = 0x0000_8000;

        const NTLM_SSP_NEGOTIATE_NTLM = 0x0000_0200;

        /// G-bit
        const NTLM_SSP_NEGOTIATE_LM_KEY = 0x0000_0080;

        /// E-bit
        const NTLM_SSP_NEGOTIATE_SEAL = 0x0000_0020;

        /// D-bit
        const NTLM_SSP_NEGOTIATE_SIGN = 0x0000_0010;

        const NTLM_SSP_NEGOTIATE_REQUEST_TARGET = 0x0000_0004;

        const NTLM_SSP_NEGOTIATE_OEM = 0x0000_0002;

        const NTLM_SSP_NEGOTIATE_UNICODE = 0x0000_0001;
    }
}

/// Which side of the connection a derived key protects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyDirection {
    ClientToServer,
    ServerToClient,
}

/// Computes the 16-byte message signature of `message`.
///
/// With extended session security the checksum is HMAC-MD5 keyed with `signing_key`, encrypted with `keystream`
/// only when key exchange was negotiated. Without it the checksum is a CRC-32 and `signing_key` is unused, but the
/// keystream always advances by 12 bytes.
pub fn mac(
    flags: NegotiateFlags,
    keystream: &mut Rc4,
    signing_key: &[u8],
    seq_num: u32,
    message: &[u8],
) -> Result<[u8; SIGNATURE_SIZE]> {
    if flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY) {
        let digest = compute_digest(signing_key, seq_num, message)?;

        let checksum = if flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE_KEY_EXCH) {
            keystream.process(&digest[..SIGNATURE_CHECKSUM_SIZE])
        } else {
            digest[..SIGNATURE_CHECKSUM_SIZE].to_vec()
        };

        Ok(compute_signature(&checksum, seq_num))
    } else {
        // the random pad is sent as zero even though it consumes keystream
        keystream.process(&[0x00; SIGNATURE_RANDOM_PAD_SIZE]);

        let mut crc = [0x00; 4];
        LittleEndian::write_u32(&mut crc, compute_crc32(message));

        let mut checksum = vec![0x00; SIGNATURE_RANDOM_PAD_SIZE];
        checksum.extend(keystream.process(&crc));

        // RC4(0) XOR seq_num
        let mut seq_num_bytes = [0x00; SIGNATURE_SEQ_NUM_SIZE];
        seq_num_bytes.copy_from_slice(&keystream.process(&seq_num.to_le_bytes()));

        Ok(compute_signature(&checksum, LittleEndian::read_u32(&seq_num_bytes)))
    }
}

/// Encrypts `message` with `keystream`, then signs the plaintext.
///
/// Returns the sealed message and its signature.
pub fn seal(
    flags: NegotiateFlags,
    signing_key: &[u8],
    message: &[u8],
    seq_num: u32,
    keystream: &mut Rc4,
) -> Result<(Vec<u8>, [u8; SIGNATURE_SIZE])> {
    let sealed_message = keystream.process(message);
    let signature = mac(flags, keystream, signing_key, seq_num, message)?;

    Ok((sealed_message, signature))
}

/// Decrypts `sealed_message` with `keystream`, then signs the recovered plaintext.
///
/// Returns the plaintext and the signature the peer is expected to have sent with it.
pub fn unseal(
    flags: NegotiateFlags,
    signing_key: &[u8],
    sealed_message: &[u8],
    seq_num: u32,
    keystream: &mut Rc4,
) -> Result<(Vec<u8>, [u8; SIGNATURE_SIZE])> {
    let message = keystream.process(sealed_message);
    let signature = mac(flags, keystream, signing_key, seq_num, &message)?;

    Ok((message, signature))
}

fn compute_digest(key: &[u8], seq_num: u32, data: &[u8]) -> Result<[u8; HASH_SIZE]> {
    let mut digest_data = vec![0x00; SIGNATURE_SEQ_NUM_SIZE];
    LittleEndian::write_u32(&mut digest_data, seq_num);
    digest_data.extend_from_slice(data);

    compute_hmac_md5(key, &digest_data)
}

fn compute_signature(checksum: &[u8], seq_num: u32) -> [u8; SIGNATURE_SIZE] {
    let mut signature = [0x00; SIGNATURE_SIZE];
    LittleEndian::write_u32(&mut signature[..SIGNATURE_VERSION_SIZE], MESSAGES_VERSION);
    signature[SIGNATURE_VERSION_SIZE..SIGNATURE_VERSION_SIZE + SIGNATURE_CHECKSUM_SIZE].clone_from_slice(checksum);
    LittleEndian::write_u32(&mut signature[SIGNATURE_VERSION_SIZE + SIGNATURE_CHECKSUM_SIZE..], seq_num);

    signature
}
