//! Post-negotiation message protection keyed by an NTLM session key.

use std::fmt;

use zeroize::Zeroizing;

use crate::ber::ReadCursor;
use crate::crypto::Rc4;
use crate::ntlm::{self, KeyDirection, NegotiateFlags, SIGNATURE_SIZE};
use crate::{Error, Result};

/// Which end of the connection a [`SecurityContext`] protects messages for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ContextRole {
    /// Seals with the client-to-server keys and unseals with the server-to-client keys.
    #[default]
    Initiator,
    Acceptor,
}

enum Keystreams {
    /// Without extended session security both directions draw from one keystream.
    Shared(Rc4),
    Split { client: Rc4, server: Rc4 },
}

impl Keystreams {
    fn new(client_sealing_key: &[u8], server_sealing_key: &[u8], shared: bool) -> Self {
        if shared {
            Self::Shared(Rc4::new(client_sealing_key))
        } else {
            Self::Split {
                client: Rc4::new(client_sealing_key),
                server: Rc4::new(server_sealing_key),
            }
        }
    }

    fn client(&mut self) -> &mut Rc4 {
        match self {
            Self::Shared(keystream) => keystream,
            Self::Split { client, .. } => client,
        }
    }

    fn server(&mut self) -> &mut Rc4 {
        match self {
            Self::Shared(keystream) => keystream,
            Self::Split { server, .. } => server,
        }
    }
}

/// Seals, unseals and signs application messages once negotiation has produced a session key.
///
/// Every operation consumes keystream, so calls have to be made in the same order as the messages travel on the
/// wire. The context is not synchronized: share it between threads behind a lock.
pub struct SecurityContext {
    flags: NegotiateFlags,
    role: ContextRole,

    client_signing_key: Zeroizing<Vec<u8>>,
    server_signing_key: Zeroizing<Vec<u8>>,
    client_sealing_key: Zeroizing<Vec<u8>>,
    server_sealing_key: Zeroizing<Vec<u8>>,

    keystreams: Keystreams,
    sequence_number: u32,
}

impl SecurityContext {
    /// Creates the initiator side of the context.
    pub fn new(flags: NegotiateFlags, session_key: &[u8]) -> Result<Self> {
        Self::with_role(flags, session_key, ContextRole::Initiator)
    }

    #[instrument(level = "debug", skip(session_key))]
    pub fn with_role(flags: NegotiateFlags, session_key: &[u8], role: ContextRole) -> Result<Self> {
        if session_key.is_empty() {
            return Err(Error::InvalidSessionKey("the session key is empty"));
        }

        let extended_session_security = flags.contains(NegotiateFlags::NTLM_SSP_NEGOTIATE_EXTENDED_SESSION_SECURITY);

        let (client_signing_key, server_signing_key, client_sealing_key, server_sealing_key) =
            match (
                ntlm::sign_key(flags, session_key, KeyDirection::ClientToServer),
                ntlm::sign_key(flags, session_key, KeyDirection::ServerToClient),
            ) {
                (Some(client_signing_key), Some(server_signing_key)) => (
                    client_signing_key.to_vec(),
                    server_signing_key.to_vec(),
                    ntlm::seal_key(flags, session_key, KeyDirection::ClientToServer),
                    ntlm::seal_key(flags, session_key, KeyDirection::ServerToClient),
                ),
                _ => (
                    session_key.to_vec(),
                    session_key.to_vec(),
                    session_key.to_vec(),
                    session_key.to_vec(),
                ),
            };

        let keystreams = Keystreams::new(&client_sealing_key, &server_sealing_key, !extended_session_security);

        Ok(Self {
            flags,
            role,
            client_signing_key: Zeroizing::new(client_signing_key),
            server_signing_key: Zeroizing::new(server_signing_key),
            client_sealing_key: Zeroizing::new(client_sealing_key),
            server_sealing_key: Zeroizing::new(server_sealing_key),
            keystreams,
            sequence_number: 0,
        })
    }

    pub fn flags(&self) -> NegotiateFlags {
        self.flags
    }

    pub fn role(&self) -> ContextRole {
        self.role
    }

    /// The sequence number the next [`seal`](Self::seal) will use.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Returns the signature and the sealed message.
    #[instrument(level = "debug", fields(sequence_number = self.sequence_number), skip_all)]
    pub fn seal(&mut self, plaintext: &[u8]) -> Result<([u8; SIGNATURE_SIZE], Vec<u8>)> {
        let flags = self.flags;
        let sequence_number = self.sequence_number;
        let (signing_key, keystream) = self.outbound();

        let (sealed_message, signature) = ntlm::seal(flags, signing_key, plaintext, sequence_number, keystream)?;

        self.sequence_number = self.sequence_number.wrapping_add(1);

        Ok((signature, sealed_message))
    }

    /// Takes `signature ‖ sealed message` and returns the signature computed over the recovered plaintext together
    /// with the plaintext.
    ///
    /// The sequence number is neither advanced nor checked, and the signature carried by `message` is not verified:
    /// compare it with the returned one.
    #[instrument(level = "debug", fields(sequence_number = self.sequence_number), skip_all)]
    pub fn unseal(&mut self, message: &[u8]) -> Result<([u8; SIGNATURE_SIZE], Vec<u8>)> {
        let mut src = ReadCursor::new(message);
        src.read_array::<SIGNATURE_SIZE>("message signature")?;
        let sealed_message = src.read_remaining();

        let flags = self.flags;
        let sequence_number = self.sequence_number;
        let (signing_key, keystream) = self.inbound();

        let (plaintext, signature) = ntlm::unseal(flags, signing_key, sealed_message, sequence_number, keystream)?;

        Ok((signature, plaintext))
    }

    /// Signs `data` with the caller's `sequence_number`.
    ///
    /// With `reset_cipher` both keystreams are restarted from their sealing keys once the signature is computed.
    #[instrument(level = "debug", fields(sequence_number = sequence_number, reset_cipher = reset_cipher), skip_all)]
    pub fn sign(&mut self, data: &[u8], sequence_number: u32, reset_cipher: bool) -> Result<[u8; SIGNATURE_SIZE]> {
        let flags = self.flags;
        let (signing_key, keystream) = self.outbound();

        let signature = ntlm::mac(flags, keystream, signing_key, sequence_number, data)?;

        if reset_cipher {
            self.reset_cipher_state();
        }

        self.sequence_number = self.sequence_number.wrapping_add(1);

        Ok(signature)
    }

    /// Restarts both keystreams from their sealing keys. Keys and the sequence number are kept.
    pub fn reset_cipher_state(&mut self) {
        debug!("resetting cipher state");

        let shared = matches!(self.keystreams, Keystreams::Shared(_));
        self.keystreams = Keystreams::new(&self.client_sealing_key, &self.server_sealing_key, shared);
    }

    fn outbound(&mut self) -> (&[u8], &mut Rc4) {
        match self.role {
            ContextRole::Initiator => (self.client_signing_key.as_slice(), self.keystreams.client()),
            ContextRole::Acceptor => (self.server_signing_key.as_slice(), self.keystreams.server()),
        }
    }

    fn inbound(&mut self) -> (&[u8], &mut Rc4) {
        match self.role {
            ContextRole::Initiator => (self.server_signing_key.as_slice(), self.keystreams.server()),
            ContextRole::Acceptor => (self.client_signing_key.as_slice(), self.keystreams.client()),
        }
    }
}

impl fmt::Debug for SecurityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityContext")
            .field("flags", &self.flags)
            .field("role", &self.role)
            .field("sequence_number", &self.sequence_number)
            .finish_non_exhaustive()
    }
}
