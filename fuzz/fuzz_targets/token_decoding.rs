#![no_main]

extern crate libfuzzer_sys;
extern crate spnego;

use spnego::{Decode, GssApiToken, NegTokenInit, NegTokenResp};

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    let _ = spnego::ber::decode_length(data);
    let _ = GssApiToken::decode(data);
    let _ = NegTokenInit::decode(data);
    let _ = NegTokenResp::decode(data);
});
