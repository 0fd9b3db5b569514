#![allow(dead_code)]

use proptest::collection;
use proptest::prelude::*;
use spnego::{MechType, NegState, NegTokenInit, NegTokenResp};

/// NegTokenInit { mechTypes: [NTLMSSP, KRB5] }
pub const TWO_MECH_NEG_TOKEN_INIT: [u8; 41] = [
    0x60, 0x27, 0x06, 0x06, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x02, 0xa0, 0x1d, 0x30, 0x1b, 0xa0, 0x19, 0x30, 0x17, 0x06,
    0x0a, 0x2b, 0x06, 0x01, 0x04, 0x01, 0x82, 0x37, 0x02, 0x02, 0x0a, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x12,
    0x01, 0x02, 0x02,
];

pub const RESPONSE_TOKEN: [u8; 4] = [0x01, 0x02, 0x03, 0x04];
pub const MECH_LIST_MIC: [u8; 2] = [0xaa, 0xbb];

/// NegTokenResp { negState: accept-incomplete, supportedMech: NTLMSSP, responseToken: 01 02 03 04 }
pub const FIRST_REPLY: [u8; 31] = [
    0xa1, 0x1d, 0x30, 0x1b, 0xa0, 0x03, 0x0a, 0x01, 0x01, 0xa1, 0x0c, 0x06, 0x0a, 0x2b, 0x06, 0x01, 0x04, 0x01, 0x82,
    0x37, 0x02, 0x02, 0x0a, 0xa2, 0x06, 0x04, 0x04, 0x01, 0x02, 0x03, 0x04,
];

/// NegTokenResp { responseToken: 01 02 03 04 }
pub const BARE_RESPONSE: [u8; 12] = [0xa1, 0x0a, 0x30, 0x08, 0xa2, 0x06, 0x04, 0x04, 0x01, 0x02, 0x03, 0x04];

/// NegTokenResp { responseToken: 01 02 03 04, mechListMIC: aa bb }
pub const RESPONSE_WITH_MIC: [u8; 18] = [
    0xa1, 0x10, 0x30, 0x0e, 0xa2, 0x06, 0x04, 0x04, 0x01, 0x02, 0x03, 0x04, 0xa3, 0x04, 0x04, 0x02, 0xaa, 0xbb,
];

/// NegTokenResp { negState: accept-completed }
pub const ACCEPT_COMPLETED: [u8; 9] = [0xa1, 0x07, 0x30, 0x05, 0xa0, 0x03, 0x0a, 0x01, 0x00];

pub const SESSION_KEY: [u8; 16] = [
    0x9d, 0x2b, 0x41, 0x6e, 0x07, 0xc8, 0x53, 0xf1, 0x38, 0xaa, 0x04, 0x6b, 0xe2, 0x19, 0x7f, 0xc0,
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn arb_mech_type() -> impl Strategy<Value = MechType> {
    prop_oneof![
        Just(MechType::ntlm_ssp()),
        Just(MechType::krb5()),
        Just(MechType::ms_krb5()),
        collection::vec(any::<u8>(), 1..24).prop_map(MechType::from),
    ]
}

pub fn arb_neg_state() -> impl Strategy<Value = NegState> {
    prop_oneof![
        Just(NegState::AcceptCompleted),
        Just(NegState::AcceptIncomplete),
        Just(NegState::Reject),
        Just(NegState::RequestMic),
    ]
}

pub fn arb_token() -> impl Strategy<Value = Vec<u8>> {
    collection::vec(any::<u8>(), 0..600)
}

prop_compose! {
    pub fn arb_neg_token_init()(
        mech_types in collection::vec(arb_mech_type(), 1..6),
        mech_token in proptest::option::of(arb_token()),
    ) -> NegTokenInit {
        NegTokenInit {
            mech_types,
            mech_token,
            mech_list_mic: None,
        }
    }
}

/// NegTokenResp values that survive a decode, which never fills in `mech_list_mic`.
pub fn arb_neg_token_resp() -> impl Strategy<Value = NegTokenResp> {
    prop_oneof![
        (arb_neg_state(), arb_mech_type(), arb_token()).prop_map(|(neg_state, supported_mech, response_token)| {
            NegTokenResp::first_reply(neg_state, supported_mech, response_token)
        }),
        (arb_neg_state(), arb_mech_type())
            .prop_map(|(neg_state, supported_mech)| NegTokenResp::mech_selection(neg_state, supported_mech)),
        arb_neg_state().prop_map(NegTokenResp::terminal),
        arb_token().prop_map(|response_token| NegTokenResp::continuation(response_token, None)),
    ]
}
