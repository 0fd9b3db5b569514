use crate::{Error, Result};

/// Maximum token length accepted by Windows (48 000 bytes).
pub const WINDOWS_MAX_TOKEN_LEN: usize = 0xbb80;

/// Decoding policy for incoming negotiation tokens.
///
/// The default accepts tokens of any length the BER length codec can express. Peers that want the Windows
/// limit opt in with [`NegotiateConfig::windows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiateConfig {
    /// Reject a NegTokenInit whose GSS-API header names a mechanism other than SPNEGO.
    pub require_spnego_oid: bool,
    /// Upper bound on the size of an incoming token, checked before parsing starts. `None` means unbounded.
    pub max_token_len: Option<usize>,
}

impl NegotiateConfig {
    pub fn new(require_spnego_oid: bool, max_token_len: Option<usize>) -> Self {
        Self {
            require_spnego_oid,
            max_token_len,
        }
    }

    /// Strict SPNEGO OID check and the Windows maximum token length.
    pub fn windows() -> Self {
        Self::new(true, Some(WINDOWS_MAX_TOKEN_LEN))
    }

    pub(crate) fn check_token_len(&self, actual: usize) -> Result<()> {
        match self.max_token_len {
            Some(max) if actual > max => Err(Error::TokenTooLarge { max, actual }),
            _ => Ok(()),
        }
    }
}

impl Default for NegotiateConfig {
    fn default() -> Self {
        Self::new(true, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_does_not_bound_token_len() {
        let config = NegotiateConfig::default();

        assert!(config.require_spnego_oid);
        assert!(config.check_token_len(WINDOWS_MAX_TOKEN_LEN + 1).is_ok());
        assert!(config.check_token_len(u32::MAX as usize).is_ok());
    }

    #[test]
    fn windows_config_bounds_token_len() {
        let config = NegotiateConfig::windows();

        assert!(config.check_token_len(WINDOWS_MAX_TOKEN_LEN).is_ok());
        assert!(matches!(
            config.check_token_len(WINDOWS_MAX_TOKEN_LEN + 1),
            Err(Error::TokenTooLarge {
                max: WINDOWS_MAX_TOKEN_LEN,
                actual: 48_001
            })
        ));
    }
}
