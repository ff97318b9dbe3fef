//! Capability traits that separate the core from any crypto backend.
//!
//! The core never branches on a concrete algorithm. It asks a
//! [`CryptoProvider`] for the capability it needs (a block primitive, a KEM,
//! a DH-style agreement, a signer, a key encoder) and drives that through
//! the narrow interfaces below.

use crate::crypto::keys::{KeyPair, PublicKey};
use crate::error::{CryptoError, Result};
use crate::spec::{KeyPairType, StreamKeyType, SymKeySpec, SymKeyType};
use std::sync::Arc;
use zeroize::Zeroize;

/// A raw block cipher. Processes exactly one block per call and buffers nothing.
pub trait SymmetricPrimitive: Send {
    /// Native block length in bytes.
    fn block_size(&self) -> usize;

    /// Keys the primitive for encryption or decryption. No IV.
    fn init(&mut self, for_encryption: bool, key: &[u8]) -> Result<()>;

    /// Transforms one block. Both slices are exactly `block_size()` long.
    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<()>;
}

/// Key encapsulation.
pub trait KemPrimitive: Send + Sync {
    fn key_type(&self) -> KeyPairType;

    fn generate_key_pair(&self) -> Result<KeyPair>;

    /// Returns `(shared_secret, encapsulation)`.
    fn encapsulate(&self, public_key: &PublicKey) -> Result<(Vec<u8>, Vec<u8>)>;

    /// Recovers the shared secret from an encapsulation.
    fn extract(&self, key_pair: &KeyPair, encapsulation: &[u8]) -> Result<Vec<u8>>;

    /// Clears a secret previously handed out by this primitive.
    fn destroy_secret(&self, secret: &mut [u8]) -> Result<()> {
        secret.zeroize();
        Ok(())
    }
}

/// Diffie-Hellman style agreement.
pub trait AgreementPrimitive: Send + Sync {
    fn key_type(&self) -> KeyPairType;

    fn generate_key_pair(&self) -> Result<KeyPair>;

    fn agree(&self, key_pair: &KeyPair, peer: &PublicKey) -> Result<Vec<u8>>;

    /// Clears a secret previously handed out by this primitive.
    fn destroy_secret(&self, secret: &mut [u8]) -> Result<()> {
        secret.zeroize();
        Ok(())
    }
}

pub trait SignaturePrimitive: Send + Sync {
    fn key_type(&self) -> KeyPairType;

    fn generate_key_pair(&self) -> Result<KeyPair>;

    fn sign(&self, key_pair: &KeyPair, message: &[u8]) -> Result<Vec<u8>>;

    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> Result<()>;
}

/// Standard byte encodings of private keys, consumed opaquely by the key wrap.
pub trait KeyPairEncoder: Send + Sync {
    fn encode_private(&self, key_pair: &KeyPair) -> Result<zeroize::Zeroizing<Vec<u8>>>;

    fn decode_private(&self, key_type: KeyPairType, encoded: &[u8]) -> Result<KeyPair>;
}

/// Allow-lists consulted by spec validation.
pub trait KeyTypePolicy: Send + Sync {
    fn supports_sym_key_type(&self, key_type: SymKeyType) -> bool;

    fn supports_stream_key_type(&self, key_type: StreamKeyType) -> bool;

    fn supports_key_pair_type(&self, key_type: KeyPairType) -> bool;
}

/// Policy accepting every enumerated type. Used to reason about the full spec space.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl KeyTypePolicy for AllowAll {
    fn supports_sym_key_type(&self, _: SymKeyType) -> bool {
        true
    }

    fn supports_stream_key_type(&self, _: StreamKeyType) -> bool {
        true
    }

    fn supports_key_pair_type(&self, _: KeyPairType) -> bool {
        true
    }
}

/// A crypto backend: its allow-lists plus the capabilities it can hand out.
pub trait CryptoProvider: KeyTypePolicy {
    fn name(&self) -> &'static str;

    /// A fresh, unkeyed block primitive for `spec`.
    fn symmetric(&self, spec: &SymKeySpec) -> Result<Box<dyn SymmetricPrimitive>>;

    fn kem(&self, key_type: KeyPairType) -> Result<&dyn KemPrimitive>;

    fn agreement(&self, key_type: KeyPairType) -> Result<&dyn AgreementPrimitive>;

    fn signer(&self, key_type: KeyPairType) -> Result<&dyn SignaturePrimitive>;

    fn key_pair_encoder(&self, key_type: KeyPairType) -> Result<&dyn KeyPairEncoder>;
}

/// A shared provider's allow-lists as a standalone policy.
#[derive(Clone)]
pub struct ProviderPolicy(pub Arc<dyn CryptoProvider>);

impl KeyTypePolicy for ProviderPolicy {
    fn supports_sym_key_type(&self, key_type: SymKeyType) -> bool {
        self.0.supports_sym_key_type(key_type)
    }

    fn supports_stream_key_type(&self, key_type: StreamKeyType) -> bool {
        self.0.supports_stream_key_type(key_type)
    }

    fn supports_key_pair_type(&self, key_type: KeyPairType) -> bool {
        self.0.supports_key_pair_type(key_type)
    }
}

pub(crate) fn unsupported_key_pair(provider: &str, key_type: KeyPairType) -> CryptoError {
    use tracing::debug;
    debug!(
        target: "crypto::provider",
        provider,
        key_type = key_type.name(),
        "capability not offered for key pair type"
    );
    CryptoError::InvalidKeyPairType
}
