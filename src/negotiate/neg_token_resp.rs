use num_traits::FromPrimitive;

use crate::ber::{
    self, ReadCursor, CONTEXT_TAG_0, CONTEXT_TAG_1, CONTEXT_TAG_2, CONTEXT_TAG_3, ENUMERATED_TAG,
    OBJECT_IDENTIFIER_TAG, SEQUENCE_TAG,
};
use crate::negotiate::{NegState, NegotiateConfig};
use crate::oids::MechType;
use crate::{Decode, Encode, Error, Result};

const FIELD_TAGS: [u8; 4] = [CONTEXT_TAG_0, CONTEXT_TAG_1, CONTEXT_TAG_2, CONTEXT_TAG_3];

/// Every SPNEGO message after the initial one, in both directions. Never framed by a GSS-API header.
///
/// ```not_rust
/// NegTokenResp ::= SEQUENCE {
///     negState       [0] ENUMERATED     OPTIONAL,
///     supportedMech  [1] MechType       OPTIONAL,
///     responseToken  [2] OCTET STRING   OPTIONAL,
///     mechListMIC    [3] OCTET STRING   OPTIONAL,
///     ...
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegTokenResp {
    /// Required in the acceptor's first reply.
    pub neg_state: Option<NegState>,
    /// Only present in the acceptor's first reply.
    pub supported_mech: Option<MechType>,
    pub response_token: Option<Vec<u8>>,
    /// Emitted by [`Encode`] in the continuation shape. Decoding never fills it in: MIC handling belongs to the
    /// caller.
    pub mech_list_mic: Option<Vec<u8>>,
}

/// The field layouts [`NegTokenResp`] can be encoded with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NegTokenRespShape {
    /// Acceptor's first reply: `negState`, `supportedMech` and `responseToken`.
    FirstReply,
    /// Acceptor's first reply without a token: `negState` and `supportedMech`.
    MechSelection,
    /// Final accept or reject: `negState` alone.
    Terminal,
    /// Subsequent legs: `responseToken` with an optional `mechListMIC`.
    Continuation,
}

impl NegTokenResp {
    pub fn first_reply(neg_state: NegState, supported_mech: MechType, response_token: Vec<u8>) -> Self {
        Self {
            neg_state: Some(neg_state),
            supported_mech: Some(supported_mech),
            response_token: Some(response_token),
            mech_list_mic: None,
        }
    }

    pub fn mech_selection(neg_state: NegState, supported_mech: MechType) -> Self {
        Self {
            neg_state: Some(neg_state),
            supported_mech: Some(supported_mech),
            ..Default::default()
        }
    }

    pub fn terminal(neg_state: NegState) -> Self {
        Self {
            neg_state: Some(neg_state),
            ..Default::default()
        }
    }

    pub fn continuation(response_token: Vec<u8>, mech_list_mic: Option<Vec<u8>>) -> Self {
        Self {
            response_token: Some(response_token),
            mech_list_mic,
            ..Default::default()
        }
    }

    /// Returns the layout this token is encoded with, or `None` when the set fields match no layout.
    pub fn shape(&self) -> Option<NegTokenRespShape> {
        match (
            &self.neg_state,
            &self.supported_mech,
            &self.response_token,
            &self.mech_list_mic,
        ) {
            (Some(_), Some(_), Some(_), None) => Some(NegTokenRespShape::FirstReply),
            (Some(_), Some(_), None, None) => Some(NegTokenRespShape::MechSelection),
            (Some(_), None, None, None) => Some(NegTokenRespShape::Terminal),
            (None, None, Some(_), _) => Some(NegTokenRespShape::Continuation),
            _ => None,
        }
    }

    #[instrument(level = "trace", ret, skip(config))]
    pub fn decode_with_config(src: &[u8], config: &NegotiateConfig) -> Result<Self> {
        let mut cursor = ReadCursor::new(src);
        Self::decode_cursor_with_config(&mut cursor, config)
    }

    /// Reads whichever of the optional fields are present, in field order.
    pub fn decode_cursor_with_config(src: &mut ReadCursor<'_>, config: &NegotiateConfig) -> Result<Self> {
        config.check_token_len(src.len())?;

        let mut neg_token_resp = ber::read_tag(src, CONTEXT_TAG_1, "NegTokenResp")?;
        let mut sequence = ber::read_tag(&mut neg_token_resp, SEQUENCE_TAG, "NegTokenResp")?;

        let mut token = Self::default();
        let mut next_field = 0;

        if next_tag(&sequence)? == Some(CONTEXT_TAG_0) {
            let mut field = ber::read_tag(&mut sequence, CONTEXT_TAG_0, "negState")?;
            let value = ber::read_primitive(&mut field, ENUMERATED_TAG, "negState")?;
            token.neg_state = Some(decode_neg_state(value)?);
            next_field = 1;
        }

        if next_tag(&sequence)? == Some(CONTEXT_TAG_1) {
            let mut field = ber::read_tag(&mut sequence, CONTEXT_TAG_1, "supportedMech")?;
            let oid = ber::read_primitive(&mut field, OBJECT_IDENTIFIER_TAG, "supportedMech")?;
            token.supported_mech = Some(MechType::from(oid));
            next_field = 2;
        }

        if next_tag(&sequence)? == Some(CONTEXT_TAG_2) {
            let response_token = ber::read_sequence_octet_string(&mut sequence, CONTEXT_TAG_2, "responseToken")?;
            token.response_token = Some(response_token.to_vec());
            next_field = 3;
        }

        match next_tag(&sequence)? {
            None => {}
            Some(CONTEXT_TAG_3) => {
                ber::skip_tlv(&mut sequence, "mechListMIC")?;
                trace!("mechListMIC is left to the caller");
            }
            Some(found) => {
                return Err(ber::unexpected_tag(
                    &FIELD_TAGS[next_field..],
                    found,
                    sequence.position(),
                ))
            }
        }

        Ok(token)
    }

    fn invalid_field_combination(&self) -> Error {
        Error::InvalidFieldCombination {
            neg_state: self.neg_state.is_some(),
            supported_mech: self.supported_mech.is_some(),
            response_token: self.response_token.is_some(),
            mech_list_mic: self.mech_list_mic.is_some(),
        }
    }
}

impl Decode for NegTokenResp {
    fn decode(src: &[u8]) -> Result<Self> {
        Self::decode_with_config(src, &NegotiateConfig::default())
    }

    fn decode_cursor(src: &mut ReadCursor<'_>) -> Result<Self> {
        Self::decode_cursor_with_config(src, &NegotiateConfig::default())
    }
}

impl Encode for NegTokenResp {
    #[instrument(level = "trace", skip_all, fields(shape = ?self.shape()))]
    fn encode_buf(&self, dst: &mut Vec<u8>) -> Result<()> {
        let mut fields = Vec::new();

        match (
            self.neg_state,
            &self.supported_mech,
            &self.response_token,
            &self.mech_list_mic,
        ) {
            (Some(neg_state), Some(supported_mech), Some(response_token), None) => {
                write_neg_state(&mut fields, neg_state)?;
                write_supported_mech(&mut fields, supported_mech)?;
                ber::write_sequence_octet_string(&mut fields, CONTEXT_TAG_2, response_token)?;
            }
            (Some(neg_state), Some(supported_mech), None, None) => {
                write_neg_state(&mut fields, neg_state)?;
                write_supported_mech(&mut fields, supported_mech)?;
            }
            (Some(neg_state), None, None, None) => {
                write_neg_state(&mut fields, neg_state)?;
            }
            (None, None, Some(response_token), mech_list_mic) => {
                ber::write_sequence_octet_string(&mut fields, CONTEXT_TAG_2, response_token)?;

                if let Some(mech_list_mic) = mech_list_mic {
                    ber::write_sequence_octet_string(&mut fields, CONTEXT_TAG_3, mech_list_mic)?;
                }
            }
            _ => return Err(self.invalid_field_combination()),
        }

        let mut sequence = Vec::new();
        ber::write_tlv(&mut sequence, SEQUENCE_TAG, &fields)?;

        ber::write_tlv(dst, CONTEXT_TAG_1, &sequence)
    }
}

fn write_neg_state(dst: &mut Vec<u8>, neg_state: NegState) -> Result<()> {
    let mut enumerated = Vec::with_capacity(3);
    ber::write_tlv(&mut enumerated, ENUMERATED_TAG, &[neg_state.as_u8()])?;

    ber::write_tlv(dst, CONTEXT_TAG_0, &enumerated)
}

fn write_supported_mech(dst: &mut Vec<u8>, supported_mech: &MechType) -> Result<()> {
    let mut oid = Vec::new();
    ber::write_tlv(&mut oid, OBJECT_IDENTIFIER_TAG, supported_mech.as_bytes())?;

    ber::write_tlv(dst, CONTEXT_TAG_1, &oid)
}

fn decode_neg_state(value: &[u8]) -> Result<NegState> {
    if value.is_empty() {
        return Err(Error::IncompleteStructure("negState"));
    }

    let raw = value
        .iter()
        .fold(0u64, |acc, byte| acc.saturating_mul(0x100).saturating_add(u64::from(*byte)));

    NegState::from_u64(raw).ok_or(Error::InvalidNegState(raw))
}

fn next_tag(src: &ReadCursor<'_>) -> Result<Option<u8>> {
    if src.is_empty() {
        Ok(None)
    } else {
        ber::peek_tag(src, "NegTokenResp field").map(Some)
    }
}
