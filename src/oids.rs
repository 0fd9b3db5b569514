//! Mechanism object identifiers, kept as their DER content octets.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// 1.3.6.1.5.5.2
pub const SPNEGO: &[u8] = &[0x2b, 0x06, 0x01, 0x05, 0x05, 0x02];
/// 1.3.6.1.4.1.311.2.2.10
pub const NTLMSSP: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x82, 0x37, 0x02, 0x02, 0x0a];
/// 1.2.840.48018.1.2.2
pub const MS_KRB5: &[u8] = &[0x2a, 0x86, 0x48, 0x82, 0xf7, 0x12, 0x01, 0x02, 0x02];
/// 1.2.840.113554.1.2.2
pub const KRB5: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x12, 0x01, 0x02, 0x02];
/// 1.2.840.113554.1.2.2.3
pub const KRB5_USER_TO_USER: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x12, 0x01, 0x02, 0x02, 0x03];
/// 1.3.6.1.4.1.311.2.2.30
pub const NEGOEX: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x82, 0x37, 0x02, 0x02, 0x1e];

const KNOWN_MECH_TYPES: [(&[u8], &str); 5] = [
    (NTLMSSP, "NTLMSSP - Microsoft NTLM Security Support Provider"),
    (MS_KRB5, "MS KRB5 - Microsoft Kerberos 5"),
    (KRB5, "KRB5 - Kerberos 5"),
    (KRB5_USER_TO_USER, "KRB5 - Kerberos 5 - User to User"),
    (NEGOEX, "NEGOEX - SPNEGO Extended Negotiation Security Mechanism"),
];

static MECH_TYPE_NAMES: LazyLock<HashMap<&'static [u8], &'static str>> =
    LazyLock::new(|| KNOWN_MECH_TYPES.iter().copied().collect());

static MECH_TYPE_OIDS: LazyLock<HashMap<&'static str, &'static [u8]>> =
    LazyLock::new(|| KNOWN_MECH_TYPES.iter().map(|(oid, name)| (*name, *oid)).collect());

/// Negotiation mechanism identifier.
///
/// The object identifier is not decoded into arcs: SPNEGO only ever compares them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MechType(Vec<u8>);

impl MechType {
    pub fn new(oid: impl Into<Vec<u8>>) -> Self {
        Self(oid.into())
    }

    pub fn spnego() -> Self {
        Self::new(SPNEGO)
    }

    pub fn ntlm_ssp() -> Self {
        Self::new(NTLMSSP)
    }

    pub fn ms_krb5() -> Self {
        Self::new(MS_KRB5)
    }

    pub fn krb5() -> Self {
        Self::new(KRB5)
    }

    /// Looks the mechanism up by its human-readable name.
    pub fn from_name(name: &str) -> Option<Self> {
        MECH_TYPE_OIDS.get(name).map(|oid| Self::new(*oid))
    }

    /// Returns the human-readable name for well-known mechanisms.
    pub fn name(&self) -> Option<&'static str> {
        MECH_TYPE_NAMES.get(self.0.as_slice()).copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<&[u8]> for MechType {
    fn from(oid: &[u8]) -> Self {
        Self::new(oid)
    }
}

impl From<Vec<u8>> for MechType {
    fn from(oid: Vec<u8>) -> Self {
        Self(oid)
    }
}

impl AsRef<[u8]> for MechType {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for MechType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.0 == SPNEGO => f.write_str("SPNEGO"),
            None => {
                for byte in &self.0 {
                    write!(f, "{:02x}", byte)?;
                }

                Ok(())
            }
        }
    }
}

impl fmt::Debug for MechType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MechType({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_mech_types_round_trip_through_both_tables() {
        for (oid, name) in KNOWN_MECH_TYPES {
            let mech_type = MechType::new(oid);

            assert_eq!(mech_type.name(), Some(name));
            assert_eq!(MechType::from_name(name), Some(mech_type));
        }
    }

    #[test]
    fn unknown_mech_type_is_passed_through() {
        let mech_type = MechType::new(vec![0x2a, 0x03, 0x04]);

        assert_eq!(mech_type.name(), None);
        assert_eq!(mech_type.to_string(), "2a0304");
        assert_eq!(MechType::from_name("KRB5 - Kerberos 6"), None);
    }

    #[test]
    fn display_uses_mechanism_name() {
        assert_eq!(MechType::krb5().to_string(), "KRB5 - Kerberos 5");
        assert_eq!(MechType::spnego().to_string(), "SPNEGO");
    }
}
