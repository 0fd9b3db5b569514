mod rc4;

use crc::{Crc, CRC_32_ISO_HDLC};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};

pub use self::rc4::Rc4;
use crate::{Error, Result};

pub const HASH_SIZE: usize = 16;

const CRC_32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

pub fn compute_md5(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut context = Md5::new();
    let mut result = [0x00; HASH_SIZE];
    context.update(data);
    result.clone_from_slice(&context.finalize());

    result
}

pub fn compute_hmac_md5(key: &[u8], input: &[u8]) -> Result<[u8; HASH_SIZE]> {
    let mut mac = Hmac::<Md5>::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("failed to compute HMAC-MD5: {}", e)))?;
    let mut result = [0x00; HASH_SIZE];
    mac.update(input);
    result.clone_from_slice(&mac.finalize().into_bytes());

    Ok(result)
}

/// CRC-32 as used by the legacy NTLM message signature (ISO-HDLC, the zlib polynomial).
pub fn compute_crc32(data: &[u8]) -> u32 {
    CRC_32.checksum(data)
}
