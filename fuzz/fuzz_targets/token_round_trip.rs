#![no_main]

extern crate libfuzzer_sys;
extern crate spnego;

use spnego::{Decode, Encode, GssApiToken, NegTokenInit, NegTokenResp};

fn round_trip<T: Decode + Encode + PartialEq + std::fmt::Debug>(data: &[u8]) {
    let Ok(token) = T::decode(data) else {
        return;
    };

    // NegTokenResp field combinations outside the encodable shapes are rejected on encode
    if let Ok(encoded) = token.encode() {
        let round_tripped = T::decode(&encoded).expect("decode should not fail");
        assert_eq!(token, round_tripped);
    }
}

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    round_trip::<GssApiToken>(data);
    round_trip::<NegTokenInit>(data);
    round_trip::<NegTokenResp>(data);
});
