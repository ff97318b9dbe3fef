//! Фабрика: единая точка входа поверх провайдера
//!
//! Связывает провайдер, валидатор и реестр идентификаторов. Реестр
//! строится лениво при первом обращении и дальше не меняется.

use crate::agreement::{AgreementSession, Role};
use crate::crypto::keys::KeyPair;
use crate::crypto::provider::CryptoProvider;
use crate::crypto::suites::classic::ClassicSuiteProvider;
use crate::error::{CryptoError, Result};
use crate::pbe;
use crate::registry::IdentityRegistry;
use crate::spec::{AgreementKind, AgreementSpec, CipherSpec, KeyPairType, PbeCipherSpec, SymKeySpec};
use crate::validation::SpecValidator;
use crate::wrap::{KeyWrapCodec, WrappedKeyEnvelope};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use zeroize::Zeroizing;

pub struct CryptoFactory {
    provider: Arc<dyn CryptoProvider>,
    validator: SpecValidator,
    registry: OnceCell<IdentityRegistry>,
}

impl CryptoFactory {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        let validator = SpecValidator::for_provider(provider.clone());
        Self {
            provider,
            validator,
            registry: OnceCell::new(),
        }
    }

    /// Factory over the built-in AES/X25519/Ed25519 provider.
    pub fn classic() -> Self {
        Self::new(Arc::new(ClassicSuiteProvider::new()))
    }

    pub fn provider(&self) -> &Arc<dyn CryptoProvider> {
        &self.provider
    }

    pub fn validator(&self) -> &SpecValidator {
        &self.validator
    }

    pub fn registry(&self) -> Result<&IdentityRegistry> {
        self.registry
            .get_or_try_init(|| IdentityRegistry::build(&self.validator))
    }

    /// Key wrap codec over the provider's block primitive for `key_spec`.
    pub fn wrap_codec(&self, key_spec: &SymKeySpec) -> Result<KeyWrapCodec> {
        self.validator
            .check_cipher_spec(&CipherSpec::wrap(*key_spec))?;
        KeyWrapCodec::new(self.provider.symmetric(key_spec)?)
    }

    /// Wraps `key_bytes` under `wrapping_key` and labels the result with the
    /// identifier of the wrapping spec.
    pub fn secure_key(
        &self,
        key_spec: &SymKeySpec,
        wrapping_key: &[u8],
        key_bytes: &[u8],
    ) -> Result<WrappedKeyEnvelope> {
        use tracing::debug;

        check_key_length(key_spec, wrapping_key)?;
        let identifier = self
            .registry()?
            .identifier_for(CipherSpec::wrap(*key_spec))?
            .clone();
        let mut codec = self.wrap_codec(key_spec)?;
        let wrapped = codec.secure_bytes(wrapping_key, key_bytes)?;

        debug!(
            target: "crypto::factory",
            id = %identifier,
            wrapped_len = wrapped.len(),
            "Key secured"
        );
        Ok(WrappedKeyEnvelope::new(identifier, wrapped))
    }

    /// Inverse of [`Self::secure_key`].
    pub fn derive_key(
        &self,
        envelope: &WrappedKeyEnvelope,
        wrapping_key: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let key_spec = self.wrap_key_spec(envelope)?;
        check_key_length(&key_spec, wrapping_key)?;
        self.wrap_codec(&key_spec)?
            .derive_bytes(wrapping_key, envelope.wrapped_bytes(), 0)
    }

    pub fn secure_private_key(
        &self,
        key_spec: &SymKeySpec,
        wrapping_key: &[u8],
        key_pair: &KeyPair,
    ) -> Result<WrappedKeyEnvelope> {
        let encoder = self.provider.key_pair_encoder(key_pair.key_type())?;
        let encoded = encoder.encode_private(key_pair)?;
        self.secure_key(key_spec, wrapping_key, &encoded)
    }

    pub fn derive_private_key(
        &self,
        envelope: &WrappedKeyEnvelope,
        wrapping_key: &[u8],
        key_type: KeyPairType,
    ) -> Result<KeyPair> {
        let encoder = self.provider.key_pair_encoder(key_type)?;
        let encoded = self.derive_key(envelope, wrapping_key)?;
        encoder.decode_private(key_type, &encoded)
    }

    pub fn new_agreement_session(&self, spec: AgreementSpec, role: Role) -> Result<AgreementSession> {
        AgreementSession::new(self.provider.clone(), spec, role)
    }

    pub fn generate_key_pair(&self, spec: &AgreementSpec) -> Result<KeyPair> {
        self.validator.check_agreement_spec(spec)?;
        let key_type = spec.key_pair;
        match spec.kind {
            AgreementKind::Kem => self.provider.kem(key_type)?.generate_key_pair(),
            _ => self.provider.agreement(key_type)?.generate_key_pair(),
        }
    }

    pub fn derive_pbe_key(
        &self,
        spec: &PbeCipherSpec,
        password: &[u8],
        salt: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        pbe::derive_pbe_key(&self.validator, spec, password, salt)
    }

    fn wrap_key_spec(&self, envelope: &WrappedKeyEnvelope) -> Result<SymKeySpec> {
        let spec = self.registry()?.cipher_spec_for(envelope.identifier())?;
        if !spec.is_wrap() {
            return Err(CryptoError::UnknownIdentifier(format!(
                "{} names {}, not a key wrap",
                envelope.identifier(),
                spec
            )));
        }
        Ok(spec.key_spec)
    }
}

impl std::fmt::Debug for CryptoFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoFactory")
            .field("provider", &self.provider.name())
            .field("registry_built", &self.registry.get().is_some())
            .finish()
    }
}

fn check_key_length(key_spec: &SymKeySpec, key: &[u8]) -> Result<()> {
    let expected = key_spec.key_length.bytes();
    if key.len() != expected {
        return Err(CryptoError::InvalidInput(format!(
            "{} needs a {}-byte key, got {}",
            key_spec,
            expected,
            key.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CipherMode, Length, PbeSpec};

    #[test]
    fn test_secure_and_derive_key() {
        let factory = CryptoFactory::classic();
        let spec = SymKeySpec::aes(Length::Len256);
        let kek = [7u8; 32];
        let key = [0x42u8; 32];

        let envelope = factory.secure_key(&spec, &kek, &key).unwrap();
        assert_eq!(
            envelope.identifier().to_string(),
            "1.3.6.1.4.1.52299.1.1.2.4.1.1"
        );
        let decoded = WrappedKeyEnvelope::decode(&envelope.encode()).unwrap();
        assert_eq!(*factory.derive_key(&decoded, &kek).unwrap(), key);
        assert!(matches!(
            factory.derive_key(&decoded, &[8u8; 32]),
            Err(CryptoError::IntegrityCheckFailed)
        ));
    }

    #[test]
    fn test_derive_key_rejects_non_wrap_identifier() {
        let factory = CryptoFactory::classic();
        let gcm = factory
            .registry()
            .unwrap()
            .identifier_for(CipherSpec::unpadded(
                SymKeySpec::aes(Length::Len128),
                CipherMode::Gcm,
            ))
            .unwrap()
            .clone();
        let envelope = WrappedKeyEnvelope::new(gcm, vec![0u8; 32]);
        assert!(matches!(
            factory.derive_key(&envelope, &[0u8; 16]),
            Err(CryptoError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_wrong_kek_length() {
        let factory = CryptoFactory::classic();
        let spec = SymKeySpec::aes(Length::Len128);
        assert!(matches!(
            factory.secure_key(&spec, &[0u8; 32], b"key"),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_private_key_round_trip() {
        let factory = CryptoFactory::classic();
        let spec = SymKeySpec::aes(Length::Len128);
        let kek = [1u8; 16];
        let pair = factory
            .generate_key_pair(&AgreementSpec::kem(KeyPairType::X25519))
            .unwrap();

        let envelope = factory.secure_private_key(&spec, &kek, &pair).unwrap();
        let restored = factory
            .derive_private_key(&envelope, &kek, KeyPairType::X25519)
            .unwrap();
        assert_eq!(restored.public_key(), pair.public_key());
    }

    #[test]
    fn test_pbe_through_factory() {
        let factory = CryptoFactory::classic();
        let spec = PbeCipherSpec::new(
            PbeSpec::new(crate::spec::DigestType::Sha2_512, 1000),
            CipherSpec::unpadded(SymKeySpec::aes(Length::Len128), CipherMode::Gcm),
        );
        let key = factory.derive_pbe_key(&spec, b"password", &[9u8; 32]).unwrap();
        assert_eq!(key.len(), 16);
    }
}
