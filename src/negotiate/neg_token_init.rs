use crate::ber::{
    self, ReadCursor, CONTEXT_TAG_0, CONTEXT_TAG_1, CONTEXT_TAG_2, CONTEXT_TAG_3, OBJECT_IDENTIFIER_TAG, SEQUENCE_TAG,
};
use crate::negotiate::NegotiateConfig;
use crate::oids::{self, MechType};
use crate::{gss_api, Decode, Encode, Error, Result};

/// The initiator's first SPNEGO message, always framed by a GSS-API header.
///
/// ```not_rust
/// NegTokenInit ::= SEQUENCE {
///     mechTypes       [0] MechTypeList,
///     reqFlags        [1] ContextFlags  OPTIONAL,
///     mechToken       [2] OCTET STRING  OPTIONAL,
///     mechListMIC     [3] OCTET STRING  OPTIONAL,
///     ...
/// }
/// ```
///
/// `reqFlags` is skipped on decode and never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegTokenInit {
    /// Ordered by preference, the first entry is the mechanism `mech_token` belongs to.
    pub mech_types: Vec<MechType>,
    pub mech_token: Option<Vec<u8>>,
    /// Emitted by [`Encode`] when set. Decoding never fills it in: MIC handling belongs to the caller.
    pub mech_list_mic: Option<Vec<u8>>,
}

impl NegTokenInit {
    pub fn new(mech_types: Vec<MechType>) -> Self {
        Self {
            mech_types,
            mech_token: None,
            mech_list_mic: None,
        }
    }

    pub fn with_mech_token(mut self, mech_token: Vec<u8>) -> Self {
        self.mech_token = Some(mech_token);
        self
    }

    /// Returns the initiator's preferred mechanism.
    pub fn preferred_mech_type(&self) -> Option<&MechType> {
        self.mech_types.first()
    }

    #[instrument(level = "trace", ret, skip(config))]
    pub fn decode_with_config(src: &[u8], config: &NegotiateConfig) -> Result<Self> {
        let mut cursor = ReadCursor::new(src);
        Self::decode_cursor_with_config(&mut cursor, config)
    }

    pub fn decode_cursor_with_config(src: &mut ReadCursor<'_>, config: &NegotiateConfig) -> Result<Self> {
        let (mech_type, mut payload) = gss_api::read_header(src, config)?;

        if config.require_spnego_oid && mech_type.as_bytes() != oids::SPNEGO {
            return Err(Error::UnexpectedMechanism(mech_type));
        }

        let mut neg_token_init = ber::read_tag(&mut payload, CONTEXT_TAG_0, "NegTokenInit")?;
        let mut sequence = ber::read_tag(&mut neg_token_init, SEQUENCE_TAG, "NegTokenInit")?;

        let mut mech_types_field = ber::read_tag(&mut sequence, CONTEXT_TAG_0, "mechTypes")?;
        let mut mech_type_list = ber::read_tag(&mut mech_types_field, SEQUENCE_TAG, "mechTypes")?;
        let mech_types = read_mech_type_list(&mut mech_type_list)?;

        if next_tag(&sequence)? == Some(CONTEXT_TAG_1) {
            ber::skip_tlv(&mut sequence, "reqFlags")?;
        }

        let mech_token = if next_tag(&sequence)? == Some(CONTEXT_TAG_2) {
            Some(ber::read_sequence_octet_string(&mut sequence, CONTEXT_TAG_2, "mechToken")?.to_vec())
        } else {
            None
        };

        if !sequence.is_empty() {
            trace!(remaining = sequence.len(), "NegTokenInit fields after mechToken are not decoded");
        }

        Ok(Self {
            mech_types,
            mech_token,
            mech_list_mic: None,
        })
    }
}

impl Decode for NegTokenInit {
    fn decode(src: &[u8]) -> Result<Self> {
        Self::decode_with_config(src, &NegotiateConfig::default())
    }

    fn decode_cursor(src: &mut ReadCursor<'_>) -> Result<Self> {
        Self::decode_cursor_with_config(src, &NegotiateConfig::default())
    }
}

impl Encode for NegTokenInit {
    #[instrument(level = "trace", skip_all, fields(mech_types = self.mech_types.len()))]
    fn encode_buf(&self, dst: &mut Vec<u8>) -> Result<()> {
        if self.mech_types.is_empty() {
            return Err(Error::IncompleteStructure("mechTypes"));
        }

        let mut mech_type_list = Vec::new();
        for mech_type in &self.mech_types {
            ber::write_tlv(&mut mech_type_list, OBJECT_IDENTIFIER_TAG, mech_type.as_bytes())?;
        }

        let mut mech_types_field = Vec::new();
        ber::write_tlv(&mut mech_types_field, SEQUENCE_TAG, &mech_type_list)?;

        let mut fields = Vec::new();
        ber::write_tlv(&mut fields, CONTEXT_TAG_0, &mech_types_field)?;

        if let Some(mech_token) = &self.mech_token {
            ber::write_sequence_octet_string(&mut fields, CONTEXT_TAG_2, mech_token)?;
        }

        if let Some(mech_list_mic) = &self.mech_list_mic {
            ber::write_sequence_octet_string(&mut fields, CONTEXT_TAG_3, mech_list_mic)?;
        }

        let mut sequence = Vec::new();
        ber::write_tlv(&mut sequence, SEQUENCE_TAG, &fields)?;

        let mut payload = Vec::new();
        ber::write_tlv(&mut payload, CONTEXT_TAG_0, &sequence)?;

        gss_api::write_header(dst, &MechType::spnego(), &payload)
    }
}

/// Collects OIDs until the list ends or something other than an OID shows up.
fn read_mech_type_list(src: &mut ReadCursor<'_>) -> Result<Vec<MechType>> {
    let mut mech_types = Vec::new();

    while next_tag(src)? == Some(OBJECT_IDENTIFIER_TAG) {
        let oid = ber::read_primitive(src, OBJECT_IDENTIFIER_TAG, "MechType")?;
        mech_types.push(MechType::from(oid));
    }

    if mech_types.is_empty() {
        return Err(Error::IncompleteStructure("mechTypes"));
    }

    Ok(mech_types)
}

fn next_tag(src: &ReadCursor<'_>) -> Result<Option<u8>> {
    if src.is_empty() {
        Ok(None)
    } else {
        ber::peek_tag(src, "NegTokenInit field").map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NegTokenInit { mechTypes: [NTLMSSP], mechToken: "NTLMSSP\0" }
    const NTLM_NEG_TOKEN_INIT: [u8; 42] = [
        0x60, 0x28, 0x06, 0x06, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x02, 0xa0, 0x1e, 0x30, 0x1c, 0xa0, 0x0e, 0x30, 0x0c,
        0x06, 0x0a, 0x2b, 0x06, 0x01, 0x04, 0x01, 0x82, 0x37, 0x02, 0x02, 0x0a, 0xa2, 0x0a, 0x04, 0x08, 0x4e, 0x54,
        0x4c, 0x4d, 0x53, 0x53, 0x50, 0x00,
    ];

    #[test]
    fn encodes_mech_token() {
        let token = NegTokenInit::new(vec![MechType::ntlm_ssp()]).with_mech_token(b"NTLMSSP\0".to_vec());

        assert_eq!(token.encode().unwrap(), NTLM_NEG_TOKEN_INIT);
    }

    #[test]
    fn decodes_mech_token() {
        let token = NegTokenInit::decode(&NTLM_NEG_TOKEN_INIT).unwrap();

        assert_eq!(token.mech_types, [MechType::ntlm_ssp()]);
        assert_eq!(token.preferred_mech_type(), Some(&MechType::ntlm_ssp()));
        assert_eq!(token.mech_token.as_deref(), Some(&b"NTLMSSP\0"[..]));
        assert_eq!(token.mech_list_mic, None);
    }

    #[test]
    fn decode_skips_req_flags() {
        // same token with `reqFlags [1] BIT STRING` inserted before mechToken
        let mut data = NTLM_NEG_TOKEN_INIT[..30].to_vec();
        data.extend_from_slice(&[0xa1, 0x04, 0x03, 0x02, 0x00, 0x30]);
        data.extend_from_slice(&NTLM_NEG_TOKEN_INIT[30..]);
        data[1] += 6;
        data[11] += 6;
        data[13] += 6;

        let token = NegTokenInit::decode(&data).unwrap();

        assert_eq!(token.mech_types, [MechType::ntlm_ssp()]);
        assert_eq!(token.mech_token.as_deref(), Some(&b"NTLMSSP\0"[..]));
    }

    #[test]
    fn decode_ignores_trailing_mech_list_mic() {
        let token = NegTokenInit {
            mech_types: vec![MechType::ntlm_ssp()],
            mech_token: Some(vec![0x01]),
            mech_list_mic: Some(vec![0x02, 0x03]),
        };

        let decoded = NegTokenInit::decode(&token.encode().unwrap()).unwrap();

        assert_eq!(decoded.mech_token, Some(vec![0x01]));
        assert_eq!(decoded.mech_list_mic, None);
    }

    #[test]
    fn decode_stops_mech_type_list_at_first_non_oid() {
        let mut data = NTLM_NEG_TOKEN_INIT.to_vec();
        // turn the OID into an OCTET STRING: the list is then empty
        data[18] = 0x04;

        assert!(matches!(
            NegTokenInit::decode(&data),
            Err(Error::IncompleteStructure("mechTypes"))
        ));
    }

    #[test]
    fn decode_rejects_foreign_mechanism_unless_allowed() {
        let mut data = NTLM_NEG_TOKEN_INIT.to_vec();
        // 1.3.6.1.5.5.3
        data[9] = 0x03;

        assert!(matches!(
            NegTokenInit::decode(&data),
            Err(Error::UnexpectedMechanism(_))
        ));

        let config = NegotiateConfig {
            require_spnego_oid: false,
            ..Default::default()
        };
        let token = NegTokenInit::decode_with_config(&data, &config).unwrap();

        assert_eq!(token.mech_types, [MechType::ntlm_ssp()]);
    }

    #[test]
    fn encode_requires_at_least_one_mech_type() {
        assert!(matches!(
            NegTokenInit::new(Vec::new()).encode(),
            Err(Error::IncompleteStructure("mechTypes"))
        ));
    }
}
