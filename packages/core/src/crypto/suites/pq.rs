//! Kyber-768 KEM over `pqcrypto-kyber`.

use crate::crypto::keys::{KeyPair, PublicKey};
use crate::crypto::provider::KemPrimitive;
use crate::error::{CryptoError, Result};
use crate::spec::KeyPairType;
use pqcrypto_kyber::kyber768;
use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Kyber768Kem;

impl KemPrimitive for Kyber768Kem {
    fn key_type(&self) -> KeyPairType {
        KeyPairType::Kyber768
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        let (pk, sk) = kyber768::keypair();
        Ok(KeyPair::new(
            KeyPairType::Kyber768,
            pk.as_bytes().to_vec(),
            sk.as_bytes().to_vec(),
        ))
    }

    fn encapsulate(&self, public_key: &PublicKey) -> Result<(Vec<u8>, Vec<u8>)> {
        if public_key.key_type() != KeyPairType::Kyber768 {
            return Err(CryptoError::InvalidKeyPairType);
        }
        let pk = kyber768::PublicKey::from_bytes(public_key.as_bytes())
            .map_err(|e| CryptoError::EncapsulationFailure(format!("Invalid Kyber public key: {}", e)))?;
        let (shared, ciphertext) = kyber768::encapsulate(&pk);
        Ok((shared.as_bytes().to_vec(), ciphertext.as_bytes().to_vec()))
    }

    fn extract(&self, key_pair: &KeyPair, encapsulation: &[u8]) -> Result<Vec<u8>> {
        if key_pair.key_type() != KeyPairType::Kyber768 {
            return Err(CryptoError::InvalidKeyPairType);
        }
        let sk = kyber768::SecretKey::from_bytes(key_pair.private_bytes())
            .map_err(|e| CryptoError::EncapsulationFailure(format!("Invalid Kyber secret key: {}", e)))?;
        let ct = kyber768::Ciphertext::from_bytes(encapsulation)
            .map_err(|e| CryptoError::EncapsulationFailure(format!("Invalid Kyber ciphertext: {}", e)))?;
        let shared = kyber768::decapsulate(&ct, &sk);
        Ok(shared.as_bytes().to_vec())
    }
}
