//! SPNEGO negotiation tokens (RFC 4178).
//!
//! The initiator opens with a GSS-API framed [`NegTokenInit`], every later leg in both directions is a bare
//! [`NegTokenResp`]:
//!
//! ```not_rust
//! initiator -> NegTokenInit(mechTypes, mechToken?)
//! acceptor  -> NegTokenResp(accept-incomplete | request-mic, supportedMech, responseToken)
//! initiator -> NegTokenResp(responseToken, mechListMIC?)
//! acceptor  -> NegTokenResp(accept-completed | reject)
//! ```
//!
//! The codec serializes each leg faithfully and leaves the transition rules to the caller.

mod config;
mod neg_token_init;
mod neg_token_resp;

use num_derive::FromPrimitive;

pub use self::config::{NegotiateConfig, WINDOWS_MAX_TOKEN_LEN};
pub use self::neg_token_init::NegTokenInit;
pub use self::neg_token_resp::{NegTokenResp, NegTokenRespShape};

/// ```not_rust
/// negState [0] ENUMERATED {
///     accept-completed    (0),
///     accept-incomplete   (1),
///     reject              (2),
///     request-mic         (3)
/// }
/// ```
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum NegState {
    AcceptCompleted = 0,
    AcceptIncomplete = 1,
    Reject = 2,
    RequestMic = 3,
}

impl NegState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
