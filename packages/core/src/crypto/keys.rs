// Ключевые пары и публичные ключи

use crate::error::{CryptoError, Result};
use crate::spec::KeyPairType;
use std::fmt;
use zeroize::Zeroizing;

/// A public key tagged with its key pair type.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    key_type: KeyPairType,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(key_type: KeyPairType, bytes: Vec<u8>) -> Self {
        Self { key_type, bytes }
    }

    pub fn key_type(&self) -> KeyPairType {
        self.key_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Fails with `InvalidKeyPairType` unless both keys share an arithmetic family.
    pub fn check_same_family(&self, other: KeyPairType) -> Result<()> {
        if self.key_type.family() != other.family() || self.key_type != other {
            return Err(CryptoError::InvalidKeyPairType);
        }
        Ok(())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("key_type", &self.key_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A key pair. The private half is zeroized on drop.
#[derive(Clone)]
pub struct KeyPair {
    public: PublicKey,
    private: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    pub fn new(key_type: KeyPairType, public: Vec<u8>, private: Vec<u8>) -> Self {
        Self {
            public: PublicKey::new(key_type, public),
            private: Zeroizing::new(private),
        }
    }

    pub fn key_type(&self) -> KeyPairType {
        self.public.key_type
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_bytes(&self) -> &[u8] {
        &self.private
    }

    /// Copies the private key into a fixed-size array, zeroized on drop.
    pub fn private_array<const N: usize>(&self) -> Result<Zeroizing<[u8; N]>> {
        let mut out = Zeroizing::new([0u8; N]);
        if self.private.len() != N {
            return Err(CryptoError::InvalidInput(format!(
                "{} private key must be {} bytes, got {}",
                self.key_type().name(),
                N,
                self.private.len()
            )));
        }
        out.copy_from_slice(&self.private);
        Ok(out)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Converts a slice into a fixed-size array with a descriptive error.
pub(crate) fn to_array<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        CryptoError::InvalidInput(format!("Invalid {} length: expected {}, got {}", what, N, bytes.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_private_key() {
        let pair = KeyPair::new(KeyPairType::X25519, vec![1; 32], vec![0xAB; 32]);
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("X25519"));
        assert!(!rendered.contains("171"));
    }

    #[test]
    fn test_private_array_checks_length() {
        let pair = KeyPair::new(KeyPairType::X25519, vec![1; 32], vec![2; 31]);
        assert!(pair.private_array::<32>().is_err());

        let pair = KeyPair::new(KeyPairType::X25519, vec![1; 32], vec![2; 32]);
        assert_eq!(*pair.private_array::<32>().unwrap(), [2u8; 32]);
    }

    #[test]
    fn test_family_check() {
        let key = PublicKey::new(KeyPairType::X25519, vec![0; 32]);
        assert!(key.check_same_family(KeyPairType::X25519).is_ok());
        assert!(matches!(
            key.check_same_family(KeyPairType::EcP256),
            Err(CryptoError::InvalidKeyPairType)
        ));
        assert!(matches!(
            key.check_same_family(KeyPairType::X448),
            Err(CryptoError::InvalidKeyPairType)
        ));
    }
}
