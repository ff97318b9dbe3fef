//! Rule-based acceptance of spec combinations.
//!
//! Cipher specs are checked in a fixed order and the first failing rule wins:
//!
//! 1. block and key length belong to the key type's supported sets
//! 2. the key type is on the policy's allow-list
//! 3. the mode is valid for the key type
//! 4. AEAD modes are not combined with known-incompatible legacy blocks
//! 5. short (64-bit) and non-standard blocks only go with modes that accept them
//! 6. padding is `None` exactly when the mode carries no padding
//!
//! All rules are pure functions of the checked value and the policy.

use crate::crypto::provider::{AllowAll, CryptoProvider, KeyTypePolicy, ProviderPolicy};
use crate::error::{CryptoError, Result, SpecError};
use crate::spec::{
    AgreementKind, AgreementSpec, CipherSpec, DigestType, Length, PbeCipherSpec, PbeSpec,
    StreamCipherSpec, SymKeySpec, SymKeyType,
};
use std::sync::Arc;

/// Canonical block length; shorter blocks are "short".
const STD_BLOCK: Length = Length::Len128;

/// The only digest accepted for password-based key derivation.
pub const APPROVED_PBE_DIGEST: DigestType = DigestType::Sha2_512;

#[derive(Clone)]
pub struct SpecValidator {
    policy: Arc<dyn KeyTypePolicy>,
}

impl SpecValidator {
    pub fn new(policy: Arc<dyn KeyTypePolicy>) -> Self {
        Self { policy }
    }

    /// Validator restricted to what the provider can actually run.
    pub fn for_provider(provider: Arc<dyn CryptoProvider>) -> Self {
        Self::new(Arc::new(ProviderPolicy(provider)))
    }

    /// Validator whose allow-list accepts every enumerated type.
    pub fn permissive() -> Self {
        Self::new(Arc::new(AllowAll))
    }

    pub fn check_sym_key_spec(&self, spec: &SymKeySpec) -> Result<()> {
        if !spec.is_consistent() {
            return Err(reject(SpecError::InconsistentSpec, spec));
        }
        if !self.policy.supports_sym_key_type(spec.key_type) {
            return Err(reject(SpecError::UnsupportedKeyType, spec));
        }
        Ok(())
    }

    pub fn check_cipher_spec(&self, spec: &CipherSpec) -> Result<()> {
        self.check_sym_key_spec(&spec.key_spec)?;
        let key = &spec.key_spec;
        let mode = spec.mode;

        if !mode.valid_for_key_type(key.key_type) {
            return Err(reject(SpecError::InvalidModeForKeyType, spec));
        }

        if mode.is_aead() && disallows_aad(key) {
            return Err(reject(SpecError::DisallowedAad, spec));
        }

        let short = key.block_length < STD_BLOCK;
        let standard = key.block_length == STD_BLOCK;
        if (short && !mode.allows_short_block()) || (!standard && mode.needs_std_block()) {
            return Err(reject(SpecError::BlockLengthRestriction, spec));
        }

        if !mode.has_padding() && spec.padding != crate::spec::Padding::None {
            return Err(reject(SpecError::InvalidPadding, spec));
        }
        Ok(())
    }

    pub fn check_stream_spec(&self, spec: &StreamCipherSpec) -> Result<()> {
        if !spec.is_consistent() {
            return Err(reject(SpecError::InconsistentSpec, spec));
        }
        if !self.policy.supports_stream_key_type(spec.key_type) {
            return Err(reject(SpecError::UnsupportedKeyType, spec));
        }
        if spec.aead && !spec.key_type.supports_aead() {
            return Err(reject(SpecError::AeadNotSupported, spec));
        }
        Ok(())
    }

    pub fn check_pbe_spec(&self, spec: &PbeSpec) -> Result<()> {
        if spec.digest != APPROVED_PBE_DIGEST {
            return Err(reject(SpecError::UnsupportedPbeDigest, spec.digest.name()));
        }
        if spec.iterations == 0 {
            return Err(reject(SpecError::InvalidPbeIterations, spec.digest.name()));
        }
        Ok(())
    }

    pub fn check_pbe_cipher_spec(&self, spec: &PbeCipherSpec) -> Result<()> {
        self.check_pbe_spec(&spec.pbe)?;
        self.check_cipher_spec(&spec.cipher)
    }

    pub fn check_agreement_spec(&self, spec: &AgreementSpec) -> Result<()> {
        let key_pair = spec.key_pair;
        if !self.policy.supports_key_pair_type(key_pair) {
            return Err(reject(SpecError::UnsupportedKeyType, spec));
        }
        let capable = match spec.kind {
            AgreementKind::Kem => key_pair.supports_kem(),
            AgreementKind::Mqv => key_pair.supports_mqv(),
            _ => key_pair.supports_dh(),
        };
        if !capable {
            return Err(reject(SpecError::InvalidAgreement, spec));
        }
        Ok(())
    }

    pub fn is_valid_sym_key_spec(&self, spec: &SymKeySpec) -> bool {
        self.check_sym_key_spec(spec).is_ok()
    }

    pub fn is_valid_cipher_spec(&self, spec: &CipherSpec) -> bool {
        self.check_cipher_spec(spec).is_ok()
    }

    pub fn is_valid_stream_spec(&self, spec: &StreamCipherSpec) -> bool {
        self.check_stream_spec(spec).is_ok()
    }

    pub fn is_valid_pbe_cipher_spec(&self, spec: &PbeCipherSpec) -> bool {
        self.check_pbe_cipher_spec(spec).is_ok()
    }

    pub fn is_valid_agreement_spec(&self, spec: &AgreementSpec) -> bool {
        self.check_agreement_spec(spec).is_ok()
    }
}

impl std::fmt::Debug for SpecValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecValidator").finish_non_exhaustive()
    }
}

/// The 64-bit RC5 variant has no defined AEAD construction.
fn disallows_aad(key: &SymKeySpec) -> bool {
    key.key_type == SymKeyType::Rc5 && key.block_length == Length::Len64
}

fn reject(reason: SpecError, spec: impl std::fmt::Display) -> CryptoError {
    use tracing::trace;
    trace!(target: "crypto::validation", spec = %spec, ?reason, "spec rejected");
    CryptoError::SpecInvalid(reason)
}
