//! Сессия согласования ключей
//!
//! ```text
//! INIT ──build_client_hello──▶ HELLO_BUILT ──────────────────────────┐
//!   │                              │ (two-pass)                      │ (one-pass)
//!   │                              ▼                                 ▼
//!   │                     process_server_hello ──▶ HELLO_PROCESSED ──derive_secret──▶ COMPLETE
//!   │                                                  ▲
//!   └────────process_client_hello (responder)──────────┘
//! ```
//!
//! `clear` из любого состояния переводит сессию в COMPLETE.
//!
//! Один экземпляр принадлежит одной стороне протокола и не разделяется
//! между потоками.

use super::messages::{ClientHello, ServerHello};
use super::{Role, SessionState, SharedSecret};
use crate::crypto::keys::{KeyPair, PublicKey};
use crate::crypto::provider::CryptoProvider;
use crate::error::{CryptoError, Result};
use crate::spec::{AgreementKind, AgreementSpec};
use crate::validation::SpecValidator;
use std::sync::Arc;
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

pub struct AgreementSession {
    id: Uuid,
    spec: AgreementSpec,
    role: Role,
    provider: Arc<dyn CryptoProvider>,
    state: SessionState,
    secret: Option<Zeroizing<Vec<u8>>>,
    encapsulation: Option<Vec<u8>>,
    local: Option<KeyPair>,
    peer: Option<PublicKey>,
    ephemeral: Option<KeyPair>,
    signing: Option<KeyPair>,
    peer_verifying: Option<PublicKey>,
}

impl AgreementSession {
    pub fn new(provider: Arc<dyn CryptoProvider>, spec: AgreementSpec, role: Role) -> Result<Self> {
        use tracing::debug;

        SpecValidator::for_provider(Arc::clone(&provider)).check_agreement_spec(&spec)?;
        if spec.kind == AgreementKind::Mqv {
            return Err(CryptoError::UnsupportedAgreement(spec.to_string()));
        }

        let id = Uuid::new_v4();
        debug!(
            target: "crypto::agreement",
            session_id = %id,
            spec = %spec,
            role = ?role,
            provider = provider.name(),
            "Agreement session created"
        );

        Ok(Self {
            id,
            spec,
            role,
            provider,
            state: SessionState::Init,
            secret: None,
            encapsulation: None,
            local: None,
            peer: None,
            ephemeral: None,
            signing: None,
            peer_verifying: None,
        })
    }

    /// Own static key pair (KEM recipient, DH static key).
    pub fn with_local_key_pair(mut self, key_pair: KeyPair) -> Self {
        self.local = Some(key_pair);
        self
    }

    /// Peer's static public key.
    pub fn with_peer_public_key(mut self, key: PublicKey) -> Self {
        self.peer = Some(key);
        self
    }

    /// Responder's signing key for SIGNED agreements.
    pub fn with_signing_key(mut self, key_pair: KeyPair) -> Self {
        self.signing = Some(key_pair);
        self
    }

    /// Responder's verifying key, checked by the initiator for SIGNED agreements.
    pub fn with_peer_verifying_key(mut self, key: PublicKey) -> Self {
        self.peer_verifying = Some(key);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn spec(&self) -> AgreementSpec {
        self.spec
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Encapsulation produced by `build_client_hello` for KEM agreements.
    pub fn encapsulation(&self) -> Option<&[u8]> {
        self.encapsulation.as_deref()
    }

    pub fn build_client_hello(&mut self) -> Result<ClientHello> {
        use tracing::debug;

        self.expect_role(Role::Initiator)?;
        self.expect_state(SessionState::Init)?;

        let mut hello = ClientHello {
            session_id: self.id,
            spec: self.spec,
            static_public: None,
            ephemeral_public: None,
            encapsulation: None,
        };

        match self.spec.kind {
            AgreementKind::Kem => {
                let peer = self.peer_key()?;
                let kem = self.provider.kem(self.spec.key_pair)?;
                let (raw, encapsulation) = kem.encapsulate(peer).map_err(encapsulation_failure)?;
                self.secret = Some(take_secret(raw, |s| kem.destroy_secret(s))?);
                hello.encapsulation = Some(encapsulation.clone());
                self.encapsulation = Some(encapsulation);
            }
            AgreementKind::Anon => {
                let peer = self.peer_key()?;
                let dh = self.provider.agreement(self.spec.key_pair)?;
                let ephemeral = dh.generate_key_pair()?;
                let raw = dh.agree(&ephemeral, peer)?;
                self.secret = Some(take_secret(raw, |s| dh.destroy_secret(s))?);
                hello.ephemeral_public = Some(ephemeral.public_key().as_bytes().to_vec());
            }
            AgreementKind::Basic => {
                let local = self.local_key()?;
                let peer = self.peer_key()?;
                let dh = self.provider.agreement(self.spec.key_pair)?;
                let raw = dh.agree(local, peer)?;
                hello.static_public = Some(local.public_key().as_bytes().to_vec());
                self.secret = Some(take_secret(raw, |s| dh.destroy_secret(s))?);
            }
            AgreementKind::Unified => {
                let local = self.local_key()?;
                self.peer_key()?;
                let ephemeral = self.provider.agreement(self.spec.key_pair)?.generate_key_pair()?;
                hello.static_public = Some(local.public_key().as_bytes().to_vec());
                hello.ephemeral_public = Some(ephemeral.public_key().as_bytes().to_vec());
                self.ephemeral = Some(ephemeral);
            }
            AgreementKind::Signed => {
                let ephemeral = self.provider.agreement(self.spec.key_pair)?.generate_key_pair()?;
                hello.ephemeral_public = Some(ephemeral.public_key().as_bytes().to_vec());
                self.ephemeral = Some(ephemeral);
            }
            AgreementKind::Mqv => return Err(CryptoError::UnsupportedAgreement(self.spec.to_string())),
        }

        self.state = SessionState::HelloBuilt;
        debug!(
            target: "crypto::agreement",
            session_id = %self.id,
            kind = self.spec.kind.name(),
            "Client hello built"
        );
        Ok(hello)
    }

    /// Responder side. Returns a server hello for two-pass kinds.
    pub fn process_client_hello(&mut self, hello: &ClientHello) -> Result<Option<ServerHello>> {
        use tracing::debug;

        self.expect_role(Role::Responder)?;
        self.expect_state(SessionState::Init)?;
        if hello.spec.key_pair != self.spec.key_pair {
            return Err(CryptoError::InvalidKeyPairType);
        }
        if hello.spec.kind != self.spec.kind {
            return Err(CryptoError::InvalidInput(format!(
                "client hello is for {}, session is {}",
                hello.spec, self.spec
            )));
        }

        let key_type = self.spec.key_pair;
        let mut reply = None;
        match self.spec.kind {
            AgreementKind::Kem => {
                let local = self.local_key()?;
                let encapsulation = required(&hello.encapsulation, "encapsulation")?;
                let kem = self.provider.kem(key_type)?;
                let raw = kem.extract(local, encapsulation).map_err(encapsulation_failure)?;
                self.secret = Some(take_secret(raw, |s| kem.destroy_secret(s))?);
            }
            AgreementKind::Anon => {
                let local = self.local_key()?;
                let peer_ephemeral = self.hello_key(&hello.ephemeral_public, "ephemeral key")?;
                let dh = self.provider.agreement(key_type)?;
                let raw = dh.agree(local, &peer_ephemeral)?;
                self.secret = Some(take_secret(raw, |s| dh.destroy_secret(s))?);
            }
            AgreementKind::Basic => {
                let local = self.local_key()?;
                let peer_static = self.hello_static(hello)?;
                let dh = self.provider.agreement(key_type)?;
                let raw = dh.agree(local, &peer_static)?;
                self.secret = Some(take_secret(raw, |s| dh.destroy_secret(s))?);
            }
            AgreementKind::Unified => {
                let local = self.local_key()?;
                let peer_static = self.hello_static(hello)?;
                let peer_ephemeral = self.hello_key(&hello.ephemeral_public, "ephemeral key")?;
                let dh = self.provider.agreement(key_type)?;
                let ephemeral = dh.generate_key_pair()?;

                let static_part = take_secret(dh.agree(local, &peer_static)?, |s| dh.destroy_secret(s))?;
                let ephemeral_part =
                    take_secret(dh.agree(&ephemeral, &peer_ephemeral)?, |s| dh.destroy_secret(s))?;
                self.secret = Some(concat(&static_part, &ephemeral_part));

                reply = Some(ServerHello {
                    session_id: hello.session_id,
                    ephemeral_public: ephemeral.public_key().as_bytes().to_vec(),
                    signature: None,
                });
            }
            AgreementKind::Signed => {
                let peer_ephemeral = self.hello_key(&hello.ephemeral_public, "ephemeral key")?;
                let signing = self
                    .signing
                    .as_ref()
                    .ok_or_else(|| missing("signing key"))?;
                let signer = self.provider.signer(signing.key_type())?;
                let dh = self.provider.agreement(key_type)?;
                let ephemeral = dh.generate_key_pair()?;

                let transcript = signed_transcript(peer_ephemeral.as_bytes(), ephemeral.public_key().as_bytes());
                let signature = signer.sign(signing, &transcript)?;
                let raw = dh.agree(&ephemeral, &peer_ephemeral)?;
                self.secret = Some(take_secret(raw, |s| dh.destroy_secret(s))?);

                reply = Some(ServerHello {
                    session_id: hello.session_id,
                    ephemeral_public: ephemeral.public_key().as_bytes().to_vec(),
                    signature: Some(signature),
                });
            }
            AgreementKind::Mqv => return Err(CryptoError::UnsupportedAgreement(self.spec.to_string())),
        }

        self.state = SessionState::HelloProcessed;
        debug!(
            target: "crypto::agreement",
            session_id = %self.id,
            peer_session = %hello.session_id,
            kind = self.spec.kind.name(),
            replied = reply.is_some(),
            "Client hello processed"
        );
        Ok(reply)
    }

    /// Initiator side of two-pass kinds.
    pub fn process_server_hello(&mut self, hello: &ServerHello) -> Result<()> {
        use tracing::debug;

        self.expect_role(Role::Initiator)?;
        self.expect_state(SessionState::HelloBuilt)?;
        if !self.spec.kind.is_two_pass() {
            return Err(CryptoError::InvalidInput(format!(
                "{} is one-pass and takes no server hello",
                self.spec
            )));
        }
        if hello.session_id != self.id {
            return Err(CryptoError::InvalidInput("server hello for another session".to_string()));
        }

        let key_type = self.spec.key_pair;
        let peer_ephemeral = PublicKey::new(key_type, hello.ephemeral_public.clone());
        let ephemeral = self.ephemeral.as_ref().ok_or_else(|| missing("ephemeral key"))?;
        let dh = self.provider.agreement(key_type)?;

        let secret = match self.spec.kind {
            AgreementKind::Unified => {
                let local = self.local_key()?;
                let peer = self.peer_key()?;
                let static_part = take_secret(dh.agree(local, peer)?, |s| dh.destroy_secret(s))?;
                let ephemeral_part =
                    take_secret(dh.agree(ephemeral, &peer_ephemeral)?, |s| dh.destroy_secret(s))?;
                concat(&static_part, &ephemeral_part)
            }
            AgreementKind::Signed => {
                let verifying = self
                    .peer_verifying
                    .as_ref()
                    .ok_or_else(|| missing("peer verifying key"))?;
                let signature = required(&hello.signature, "signature")?;
                let transcript =
                    signed_transcript(ephemeral.public_key().as_bytes(), &hello.ephemeral_public);
                self.provider
                    .signer(verifying.key_type())?
                    .verify(verifying, &transcript, signature)?;
                take_secret(dh.agree(ephemeral, &peer_ephemeral)?, |s| dh.destroy_secret(s))?
            }
            _ => return Err(CryptoError::UnsupportedAgreement(self.spec.to_string())),
        };

        self.secret = Some(secret);
        self.ephemeral = None;
        self.state = SessionState::HelloProcessed;
        debug!(target: "crypto::agreement", session_id = %self.id, "Server hello processed");
        Ok(())
    }

    /// Hands the agreed secret to the caller and completes the session.
    pub fn derive_secret(&mut self) -> Result<SharedSecret> {
        use tracing::debug;

        let ready = match (self.role, self.state) {
            (_, SessionState::HelloProcessed) => true,
            (Role::Initiator, SessionState::HelloBuilt) => !self.spec.kind.is_two_pass(),
            _ => false,
        };
        if !ready {
            return Err(CryptoError::InvalidState {
                expected: SessionState::HelloProcessed.name(),
                actual: self.state.name(),
            });
        }
        let secret = self.secret.take().ok_or(CryptoError::InvalidState {
            expected: SessionState::HelloProcessed.name(),
            actual: self.state.name(),
        })?;

        self.state = SessionState::Complete;
        self.ephemeral = None;
        debug!(target: "crypto::agreement", session_id = %self.id, "Shared secret derived");
        Ok(SharedSecret::new(secret))
    }

    /// Zeroes and drops any secret material still held and ends the session.
    /// Every later operation fails with `InvalidState`.
    pub fn clear(&mut self) {
        use tracing::debug;

        self.secret = None;
        self.ephemeral = None;
        if let Some(mut enc) = self.encapsulation.take() {
            enc.zeroize();
        }
        self.state = SessionState::Complete;
        debug!(target: "crypto::agreement", session_id = %self.id, "Session cleared");
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state != expected {
            return Err(CryptoError::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    fn expect_role(&self, role: Role) -> Result<()> {
        if self.role != role {
            return Err(CryptoError::InvalidInput(format!(
                "operation is for the {:?}, session is the {:?}",
                role, self.role
            )));
        }
        Ok(())
    }

    /// Local static key pair, checked against the agreement's key pair type.
    fn local_key(&self) -> Result<&KeyPair> {
        let local = self.local.as_ref().ok_or_else(|| missing("local key pair"))?;
        if local.key_type() != self.spec.key_pair {
            return Err(CryptoError::InvalidKeyPairType);
        }
        Ok(local)
    }

    /// Peer static key; must share the local key's family when both are set.
    fn peer_key(&self) -> Result<&PublicKey> {
        let peer = self.peer.as_ref().ok_or_else(|| missing("peer public key"))?;
        peer.check_same_family(self.spec.key_pair)?;
        if let Some(local) = &self.local {
            peer.check_same_family(local.key_type())?;
        }
        Ok(peer)
    }

    fn hello_key(&self, field: &Option<Vec<u8>>, what: &'static str) -> Result<PublicKey> {
        Ok(PublicKey::new(self.spec.key_pair, required(field, what)?.to_vec()))
    }

    /// Initiator static key from the hello; must match a preconfigured peer key.
    fn hello_static(&self, hello: &ClientHello) -> Result<PublicKey> {
        let key = self.hello_key(&hello.static_public, "static key")?;
        if let Some(expected) = &self.peer {
            expected.check_same_family(key.key_type())?;
            if expected != &key {
                return Err(CryptoError::InvalidInput(
                    "client static key does not match the expected peer".to_string(),
                ));
            }
        }
        Ok(key)
    }
}

impl std::fmt::Debug for AgreementSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgreementSession")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .field("role", &self.role)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Copies a primitive's secret into session-owned memory, then has the
/// primitive destroy its copy. A failed destroy is fatal.
fn take_secret(mut raw: Vec<u8>, destroy: impl FnOnce(&mut [u8]) -> Result<()>) -> Result<Zeroizing<Vec<u8>>> {
    let owned = Zeroizing::new(raw.clone());
    let destroyed = destroy(&mut raw);
    raw.zeroize();
    destroyed.map_err(|_| CryptoError::SecretDestructionFailure)?;
    Ok(owned)
}

fn concat(a: &[u8], b: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(a.len() + b.len()));
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

fn signed_transcript(initiator_ephemeral: &[u8], responder_ephemeral: &[u8]) -> Vec<u8> {
    let mut transcript = Vec::with_capacity(initiator_ephemeral.len() + responder_ephemeral.len());
    transcript.extend_from_slice(initiator_ephemeral);
    transcript.extend_from_slice(responder_ephemeral);
    transcript
}

fn encapsulation_failure(err: CryptoError) -> CryptoError {
    match err {
        CryptoError::EncapsulationFailure(_) | CryptoError::InvalidKeyPairType => err,
        other => CryptoError::EncapsulationFailure(other.to_string()),
    }
}

fn required<'a>(field: &'a Option<Vec<u8>>, what: &str) -> Result<&'a [u8]> {
    field
        .as_deref()
        .ok_or_else(|| CryptoError::InvalidInput(format!("hello is missing the {}", what)))
}

fn missing(what: &str) -> CryptoError {
    CryptoError::InvalidInput(format!("session has no {}", what))
}
