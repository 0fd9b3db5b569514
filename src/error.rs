use thiserror::Error;

use crate::oids::MechType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("truncated {name}: expected at least {expected} bytes but got {received}")]
    TruncatedInput {
        name: &'static str,
        expected: usize,
        received: usize,
    },

    #[error("unexpected tag {found:#04x} at offset {position}: expected one of {expected:02x?}")]
    UnexpectedTag {
        expected: Vec<u8>,
        found: u8,
        position: usize,
    },

    #[error("length {0} cannot be represented by a BER length determinant")]
    UnsupportedLength(u64),

    #[error("unsupported BER length form {octet:#04x} at offset {position}")]
    UnsupportedLengthForm { octet: u8, position: usize },

    #[error("incomplete {0}")]
    IncompleteStructure(&'static str),

    #[error("invalid negState value: {0}")]
    InvalidNegState(u64),

    #[error("unexpected mechanism in GSS-API header: {0}")]
    UnexpectedMechanism(MechType),

    #[error("token is too large: {actual} bytes, the limit is {max}")]
    TokenTooLarge { max: usize, actual: usize },

    #[error(
        "NegTokenResp cannot be encoded with negState: {neg_state}, supportedMech: {supported_mech}, responseToken: {response_token}, mechListMIC: {mech_list_mic}"
    )]
    InvalidFieldCombination {
        neg_state: bool,
        supported_mech: bool,
        response_token: bool,
        mech_list_mic: bool,
    },

    #[error("invalid session key: {0}")]
    InvalidSessionKey(&'static str),

    #[error("crypto error: {0}")]
    Crypto(String),
}

pub type Result<T> = core::result::Result<T, Error>;
