//! SPNEGO (RFC 4178) negotiation token codec and the NTLM session security context used once negotiation is
//! complete.
//!
//! ```
//! use spnego::{Decode, Encode, MechType, NegState, NegTokenInit, NegTokenResp};
//!
//! let init = NegTokenInit::new(vec![MechType::ntlm_ssp()]).with_mech_token(b"NTLMSSP\0".to_vec());
//! let decoded = NegTokenInit::decode(&init.encode().unwrap()).unwrap();
//! assert_eq!(decoded, init);
//!
//! let reply = NegTokenResp::first_reply(NegState::AcceptIncomplete, MechType::ntlm_ssp(), vec![0x01]);
//! assert_eq!(NegTokenResp::decode(&reply.encode().unwrap()).unwrap(), reply);
//! ```

#[macro_use]
extern crate tracing;

pub mod ber;
pub mod crypto;
pub mod gss_api;
pub mod negotiate;
pub mod ntlm;
pub mod oids;

mod decode;
mod encode;
mod error;
mod security_context;

pub use crate::decode::Decode;
pub use crate::encode::Encode;
pub use crate::error::{Error, Result};
pub use crate::gss_api::GssApiToken;
pub use crate::negotiate::{
    NegState, NegTokenInit, NegTokenResp, NegTokenRespShape, NegotiateConfig, WINDOWS_MAX_TOKEN_LEN,
};
pub use crate::ntlm::{NegotiateFlags, SIGNATURE_SIZE};
pub use crate::oids::MechType;
pub use crate::security_context::{ContextRole, SecurityContext};
