use crate::asn1::{self, DerReader, TAG_OCTET_STRING, TAG_SEQUENCE};
use crate::crypto::keys::{to_array, KeyPair, PublicKey};
use crate::crypto::provider::{
    unsupported_key_pair, AgreementPrimitive, CryptoProvider, KemPrimitive, KeyPairEncoder,
    KeyTypePolicy, SignaturePrimitive, SymmetricPrimitive,
};
use crate::crypto::suites::aes::AesEngine;
use crate::error::{CryptoError, Result, SpecError};
use crate::spec::{KeyPairType, StreamKeyType, SymKeySpec, SymKeyType};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519Public, StaticSecret};
use zeroize::Zeroizing;

const PROVIDER_NAME: &str = "classic";

/// X25519 used as a KEM: the encapsulation is a fresh ephemeral public key.
#[derive(Debug, Default, Clone, Copy)]
pub struct X25519Kem;

/// Plain X25519 Diffie-Hellman.
#[derive(Debug, Default, Clone, Copy)]
pub struct X25519Agreement;

#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Signer;

/// `SEQUENCE { OCTET STRING private, OCTET STRING public }`.
///
/// For key types whose public key is a function of the private key, decoding
/// recomputes it and rejects a mismatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawKeyPairEncoder;

fn x25519_key_pair() -> KeyPair {
    let secret = StaticSecret::random_from_rng(OsRng);
    let public = X25519Public::from(&secret);
    KeyPair::new(
        KeyPairType::X25519,
        public.to_bytes().to_vec(),
        secret.to_bytes().to_vec(),
    )
}

fn x25519_static(key_pair: &KeyPair) -> Result<StaticSecret> {
    if key_pair.key_type() != KeyPairType::X25519 {
        return Err(CryptoError::InvalidKeyPairType);
    }
    let bytes = key_pair.private_array::<32>()?;
    Ok(StaticSecret::from(*bytes))
}

fn x25519_public(key: &PublicKey) -> Result<X25519Public> {
    if key.key_type() != KeyPairType::X25519 {
        return Err(CryptoError::InvalidKeyPairType);
    }
    Ok(X25519Public::from(to_array::<32>(key.as_bytes(), "X25519 public key")?))
}

impl KemPrimitive for X25519Kem {
    fn key_type(&self) -> KeyPairType {
        KeyPairType::X25519
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        Ok(x25519_key_pair())
    }

    fn encapsulate(&self, public_key: &PublicKey) -> Result<(Vec<u8>, Vec<u8>)> {
        let recipient = x25519_public(public_key)?;
        let ephemeral_secret = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = X25519Public::from(&ephemeral_secret);

        let shared = ephemeral_secret.diffie_hellman(&recipient);
        if !shared.was_contributory() {
            return Err(CryptoError::EncapsulationFailure(
                "Recipient public key is a low-order point".to_string(),
            ));
        }
        Ok((shared.to_bytes().to_vec(), ephemeral_public.to_bytes().to_vec()))
    }

    fn extract(&self, key_pair: &KeyPair, encapsulation: &[u8]) -> Result<Vec<u8>> {
        let secret = x25519_static(key_pair)?;
        let ephemeral = X25519Public::from(to_array::<32>(encapsulation, "X25519 encapsulation")?);

        let shared = secret.diffie_hellman(&ephemeral);
        if !shared.was_contributory() {
            return Err(CryptoError::EncapsulationFailure(
                "Encapsulation is a low-order point".to_string(),
            ));
        }
        Ok(shared.to_bytes().to_vec())
    }
}

impl AgreementPrimitive for X25519Agreement {
    fn key_type(&self) -> KeyPairType {
        KeyPairType::X25519
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        Ok(x25519_key_pair())
    }

    fn agree(&self, key_pair: &KeyPair, peer: &PublicKey) -> Result<Vec<u8>> {
        let secret = x25519_static(key_pair)?;
        let peer = x25519_public(peer)?;

        let shared = secret.diffie_hellman(&peer);
        if !shared.was_contributory() {
            return Err(CryptoError::InvalidInput(
                "Peer public key is a low-order point".to_string(),
            ));
        }
        Ok(shared.to_bytes().to_vec())
    }
}

impl SignaturePrimitive for Ed25519Signer {
    fn key_type(&self) -> KeyPairType {
        KeyPairType::Ed25519
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        let signing_key = SigningKey::generate(&mut OsRng);
        Ok(KeyPair::new(
            KeyPairType::Ed25519,
            signing_key.verifying_key().to_bytes().to_vec(),
            signing_key.to_bytes().to_vec(),
        ))
    }

    fn sign(&self, key_pair: &KeyPair, message: &[u8]) -> Result<Vec<u8>> {
        if key_pair.key_type() != KeyPairType::Ed25519 {
            return Err(CryptoError::InvalidKeyPairType);
        }
        let bytes = key_pair.private_array::<32>()?;
        let signing_key = SigningKey::from_bytes(&bytes);
        Ok(signing_key.sign(message).to_bytes().to_vec())
    }

    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> Result<()> {
        if public_key.key_type() != KeyPairType::Ed25519 {
            return Err(CryptoError::InvalidKeyPairType);
        }
        let vk_bytes = to_array::<32>(public_key.as_bytes(), "Ed25519 verifying key")?;
        let verifying_key = VerifyingKey::from_bytes(&vk_bytes)?;
        let sig_bytes = to_array::<64>(signature, "Ed25519 signature")?;
        verifying_key.verify(message, &Signature::from_bytes(&sig_bytes))?;
        Ok(())
    }
}

/// Public key implied by a private key, for the types where that is defined.
fn derive_public(key_type: KeyPairType, private: &[u8]) -> Result<Option<Vec<u8>>> {
    match key_type {
        KeyPairType::X25519 => {
            let bytes = Zeroizing::new(to_array::<32>(private, "X25519 private key")?);
            let secret = StaticSecret::from(*bytes);
            Ok(Some(X25519Public::from(&secret).to_bytes().to_vec()))
        }
        KeyPairType::Ed25519 => {
            let bytes = Zeroizing::new(to_array::<32>(private, "Ed25519 private key")?);
            let signing_key = SigningKey::from_bytes(&bytes);
            Ok(Some(signing_key.verifying_key().to_bytes().to_vec()))
        }
        _ => Ok(None),
    }
}

impl KeyPairEncoder for RawKeyPairEncoder {
    fn encode_private(&self, key_pair: &KeyPair) -> Result<Zeroizing<Vec<u8>>> {
        let private = key_pair.private_bytes();
        let public = key_pair.public_key().as_bytes();
        let content_len = asn1::encoded_len(private.len()) + asn1::encoded_len(public.len());

        let mut out = Zeroizing::new(Vec::with_capacity(asn1::encoded_len(content_len)));
        out.push(TAG_SEQUENCE);
        asn1::write_length(&mut out, content_len);
        asn1::write_tlv(&mut out, TAG_OCTET_STRING, private);
        asn1::write_tlv(&mut out, TAG_OCTET_STRING, public);
        Ok(out)
    }

    fn decode_private(&self, key_type: KeyPairType, encoded: &[u8]) -> Result<KeyPair> {
        let mut outer = DerReader::new(encoded);
        let body = outer.read(TAG_SEQUENCE)?;
        outer.finish()?;

        let mut inner = DerReader::new(body);
        let private = inner.read(TAG_OCTET_STRING)?;
        let public = inner.read(TAG_OCTET_STRING)?;
        inner.finish()?;

        if let Some(expected) = derive_public(key_type, private)? {
            if expected != public {
                return Err(CryptoError::InvalidInput(format!(
                    "{} public key does not match private key",
                    key_type.name()
                )));
            }
        }
        Ok(KeyPair::new(key_type, public.to_vec(), private.to_vec()))
    }
}

/// Concrete implementation of `CryptoProvider` for the classic suite.
#[derive(Debug, Default)]
pub struct ClassicSuiteProvider {
    x25519_kem: X25519Kem,
    x25519: X25519Agreement,
    ed25519: Ed25519Signer,
    encoder: RawKeyPairEncoder,
    #[cfg(feature = "post-quantum")]
    kyber: crate::crypto::suites::pq::Kyber768Kem,
}

impl ClassicSuiteProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyTypePolicy for ClassicSuiteProvider {
    fn supports_sym_key_type(&self, key_type: SymKeyType) -> bool {
        key_type == SymKeyType::Aes
    }

    fn supports_stream_key_type(&self, _key_type: StreamKeyType) -> bool {
        false
    }

    fn supports_key_pair_type(&self, key_type: KeyPairType) -> bool {
        match key_type {
            KeyPairType::X25519 | KeyPairType::Ed25519 => true,
            KeyPairType::Kyber768 => cfg!(feature = "post-quantum"),
            _ => false,
        }
    }
}

impl CryptoProvider for ClassicSuiteProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn symmetric(&self, spec: &SymKeySpec) -> Result<Box<dyn SymmetricPrimitive>> {
        if !self.supports_sym_key_type(spec.key_type) {
            return Err(SpecError::UnsupportedKeyType.into());
        }
        if !spec.is_consistent() {
            return Err(SpecError::InconsistentSpec.into());
        }
        Ok(Box::new(AesEngine::new()))
    }

    fn kem(&self, key_type: KeyPairType) -> Result<&dyn KemPrimitive> {
        match key_type {
            KeyPairType::X25519 => Ok(&self.x25519_kem),
            #[cfg(feature = "post-quantum")]
            KeyPairType::Kyber768 => Ok(&self.kyber),
            other => Err(unsupported_key_pair(PROVIDER_NAME, other)),
        }
    }

    fn agreement(&self, key_type: KeyPairType) -> Result<&dyn AgreementPrimitive> {
        match key_type {
            KeyPairType::X25519 => Ok(&self.x25519),
            other => Err(unsupported_key_pair(PROVIDER_NAME, other)),
        }
    }

    fn signer(&self, key_type: KeyPairType) -> Result<&dyn SignaturePrimitive> {
        match key_type {
            KeyPairType::Ed25519 => Ok(&self.ed25519),
            other => Err(unsupported_key_pair(PROVIDER_NAME, other)),
        }
    }

    fn key_pair_encoder(&self, key_type: KeyPairType) -> Result<&dyn KeyPairEncoder> {
        if !self.supports_key_pair_type(key_type) {
            return Err(unsupported_key_pair(PROVIDER_NAME, key_type));
        }
        Ok(&self.encoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x25519_kem_round_trip() {
        let kem = X25519Kem;
        let recipient = kem.generate_key_pair().unwrap();
        let (secret, enc) = kem.encapsulate(recipient.public_key()).unwrap();
        assert_eq!(enc.len(), 32);
        assert_eq!(kem.extract(&recipient, &enc).unwrap(), secret);
    }

    #[test]
    fn test_x25519_rejects_low_order_point() {
        let kem = X25519Kem;
        let zero = PublicKey::new(KeyPairType::X25519, vec![0u8; 32]);
        assert!(matches!(
            kem.encapsulate(&zero),
            Err(CryptoError::EncapsulationFailure(_))
        ));
    }

    #[test]
    fn test_x25519_agreement_is_symmetric() {
        let dh = X25519Agreement;
        let a = dh.generate_key_pair().unwrap();
        let b = dh.generate_key_pair().unwrap();
        assert_eq!(
            dh.agree(&a, b.public_key()).unwrap(),
            dh.agree(&b, a.public_key()).unwrap()
        );
    }

    #[test]
    fn test_ed25519_sign_verify() {
        let signer = Ed25519Signer;
        let pair = signer.generate_key_pair().unwrap();
        let sig = signer.sign(&pair, b"hello").unwrap();
        assert!(signer.verify(pair.public_key(), b"hello", &sig).is_ok());
        assert!(matches!(
            signer.verify(pair.public_key(), b"hellO", &sig),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_encoder_round_trip_and_mismatch() {
        let pair = x25519_key_pair();
        let encoder = RawKeyPairEncoder;
        let encoded = encoder.encode_private(&pair).unwrap();
        let decoded = encoder.decode_private(KeyPairType::X25519, &encoded).unwrap();
        assert_eq!(decoded.private_bytes(), pair.private_bytes());
        assert_eq!(decoded.public_key(), pair.public_key());

        let other = x25519_key_pair();
        let forged = KeyPair::new(
            KeyPairType::X25519,
            other.public_key().as_bytes().to_vec(),
            pair.private_bytes().to_vec(),
        );
        let encoded = encoder.encode_private(&forged).unwrap();
        assert!(encoder.decode_private(KeyPairType::X25519, &encoded).is_err());
    }

    #[test]
    fn test_provider_capabilities() {
        let provider = ClassicSuiteProvider::new();
        assert!(provider.symmetric(&SymKeySpec::aes(crate::spec::Length::Len256)).is_ok());
        assert!(provider
            .symmetric(&SymKeySpec::of(SymKeyType::Aria, crate::spec::Length::Len128))
            .is_err());
        assert!(provider.kem(KeyPairType::X25519).is_ok());
        assert!(matches!(
            provider.agreement(KeyPairType::EcP256),
            Err(CryptoError::InvalidKeyPairType)
        ));
        assert!(provider.signer(KeyPairType::Ed25519).is_ok());
    }
}
