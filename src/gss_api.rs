//! GSS-API generic token framing (RFC 2743, section 3.1).
//!
//! ```not_rust
//! InitialContextToken ::= [APPLICATION 0] IMPLICIT SEQUENCE {
//!     thisMech          MechType,
//!     innerContextToken ANY DEFINED BY thisMech
//! }
//! ```

use crate::ber::{self, ReadCursor, APPLICATION_TAG, OBJECT_IDENTIFIER_TAG};
use crate::negotiate::NegotiateConfig;
use crate::oids::MechType;
use crate::{Decode, Encode, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GssApiToken {
    pub mech_type: MechType,
    /// Everything that follows the mechanism OID inside the outer length.
    pub payload: Vec<u8>,
}

impl GssApiToken {
    pub fn new(mech_type: MechType, payload: Vec<u8>) -> Self {
        Self { mech_type, payload }
    }

    /// Creates a token framed with the SPNEGO mechanism OID.
    pub fn spnego(payload: Vec<u8>) -> Self {
        Self::new(MechType::spnego(), payload)
    }

    #[instrument(level = "trace", ret, skip(config))]
    pub fn decode_with_config(src: &[u8], config: &NegotiateConfig) -> Result<Self> {
        let mut cursor = ReadCursor::new(src);
        let (mech_type, mut payload) = read_header(&mut cursor, config)?;

        Ok(Self {
            mech_type,
            payload: payload.read_remaining().to_vec(),
        })
    }
}

impl Decode for GssApiToken {
    fn decode(src: &[u8]) -> Result<Self> {
        Self::decode_with_config(src, &NegotiateConfig::default())
    }

    fn decode_cursor(src: &mut ReadCursor<'_>) -> Result<Self> {
        let (mech_type, mut payload) = read_header(src, &NegotiateConfig::default())?;

        Ok(Self {
            mech_type,
            payload: payload.read_remaining().to_vec(),
        })
    }
}

impl Encode for GssApiToken {
    fn encode_buf(&self, dst: &mut Vec<u8>) -> Result<()> {
        write_header(dst, &self.mech_type, &self.payload)
    }
}

/// Reads the `[APPLICATION 0]` envelope and the mechanism OID.
///
/// Returns the mechanism and a cursor over the rest of the envelope.
pub(crate) fn read_header<'a>(
    src: &mut ReadCursor<'a>,
    config: &NegotiateConfig,
) -> Result<(MechType, ReadCursor<'a>)> {
    config.check_token_len(src.len())?;

    let mut inner = ber::read_tag(src, APPLICATION_TAG, "GSS-API token")?;
    let oid = ber::read_primitive(&mut inner, OBJECT_IDENTIFIER_TAG, "GSS-API mechanism")?;

    if !src.is_empty() {
        trace!(trailing = src.len(), "bytes after the GSS-API token are ignored");
    }

    Ok((MechType::from(oid), inner))
}

pub(crate) fn write_header(dst: &mut Vec<u8>, mech_type: &MechType, payload: &[u8]) -> Result<()> {
    let oid = mech_type.as_bytes();

    let mut inner = Vec::with_capacity(1 + ber::sizeof_length(oid.len()) + oid.len() + payload.len());
    ber::write_tlv(&mut inner, OBJECT_IDENTIFIER_TAG, oid)?;
    inner.extend_from_slice(payload);

    ber::write_tlv(dst, APPLICATION_TAG, &inner)
}
