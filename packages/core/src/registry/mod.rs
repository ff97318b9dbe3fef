//! Bidirectional map between structured specs and algorithm identifiers.
//!
//! Standardized combinations keep their published identifiers. Every other
//! supported spec gets an identifier synthesized under a private root:
//!
//! ```text
//! root.1.<keyType+1>.<blockLen+1>.<keyLen+1>.<mode+1>[.<padding+1>]   block ciphers
//! root.2.<keyType+1>.<keyLen+1>.<1 = plain | 2 = aead>                 stream ciphers
//! root.3.<keyPairType+1>.<kind+1>                                      agreements
//! ```
//!
//! The padding arc only appears for modes that carry padding. Every arc is an
//! ordinal plus one, so synthesis is injective over the enumerated space.

pub mod oid;
mod well_known;

pub use oid::AlgorithmIdentifier;

use crate::error::{CryptoError, Result};
use crate::spec::{
    AgreementKind, AgreementSpec, CipherMode, CipherSpec, KeyPairType, Length, Padding,
    StreamCipherSpec, StreamKeyType, SymKeySpec,
};
use crate::validation::SpecValidator;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Private enterprise root for synthesized identifiers.
pub static PRIVATE_ROOT: Lazy<AlgorithmIdentifier> =
    Lazy::new(|| AlgorithmIdentifier::known(&[1, 3, 6, 1, 4, 1, 52299]));

const CIPHER_BRANCH: u32 = 1;
const STREAM_BRANCH: u32 = 2;
const AGREEMENT_BRANCH: u32 = 3;

/// Any spec that can carry an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmSpec {
    Cipher(CipherSpec),
    Stream(StreamCipherSpec),
    Agreement(AgreementSpec),
}

impl From<CipherSpec> for AlgorithmSpec {
    fn from(spec: CipherSpec) -> Self {
        AlgorithmSpec::Cipher(spec)
    }
}

impl From<StreamCipherSpec> for AlgorithmSpec {
    fn from(spec: StreamCipherSpec) -> Self {
        AlgorithmSpec::Stream(spec)
    }
}

impl From<AgreementSpec> for AlgorithmSpec {
    fn from(spec: AgreementSpec) -> Self {
        AlgorithmSpec::Agreement(spec)
    }
}

impl fmt::Display for AlgorithmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmSpec::Cipher(s) => fmt::Display::fmt(s, f),
            AlgorithmSpec::Stream(s) => fmt::Display::fmt(s, f),
            AlgorithmSpec::Agreement(s) => fmt::Display::fmt(s, f),
        }
    }
}

/// Deterministic identifier for a spec under [`PRIVATE_ROOT`].
pub fn synthesize(spec: &AlgorithmSpec) -> AlgorithmIdentifier {
    match spec {
        AlgorithmSpec::Cipher(c) => {
            let k = &c.key_spec;
            let mut arcs = vec![
                CIPHER_BRANCH,
                k.key_type.ordinal() + 1,
                k.block_length.ordinal() + 1,
                k.key_length.ordinal() + 1,
                c.mode.ordinal() + 1,
            ];
            if c.mode.has_padding() {
                arcs.push(c.padding.ordinal() + 1);
            }
            PRIVATE_ROOT.branch(&arcs)
        }
        AlgorithmSpec::Stream(s) => PRIVATE_ROOT.branch(&[
            STREAM_BRANCH,
            s.key_type.ordinal() + 1,
            s.key_length.ordinal() + 1,
            if s.aead { 2 } else { 1 },
        ]),
        AlgorithmSpec::Agreement(a) => PRIVATE_ROOT.branch(&[
            AGREEMENT_BRANCH,
            a.key_pair.ordinal() + 1,
            a.kind.ordinal() + 1,
        ]),
    }
}

/// Immutable once built; share it behind a reference or `Arc`.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    by_spec: HashMap<AlgorithmSpec, AlgorithmIdentifier>,
    by_id: HashMap<AlgorithmIdentifier, AlgorithmSpec>,
}

impl IdentityRegistry {
    /// Registers the well-known table, then synthesizes identifiers for every
    /// remaining spec the validator accepts.
    pub fn build(validator: &SpecValidator) -> Result<Self> {
        use tracing::debug;

        let mut registry = Self::default();

        for (id, spec) in well_known::table() {
            if is_supported(validator, &spec) {
                registry.insert(id, spec)?;
            }
        }
        let well_known = registry.len();

        for spec in supported_space(validator) {
            if !registry.by_spec.contains_key(&spec) {
                registry.insert(synthesize(&spec), spec)?;
            }
        }

        debug!(
            target: "crypto::registry",
            well_known,
            synthesized = registry.len() - well_known,
            "identity registry built"
        );
        Ok(registry)
    }

    fn insert(&mut self, id: AlgorithmIdentifier, spec: AlgorithmSpec) -> Result<()> {
        if let Some(existing) = self.by_id.get(&id) {
            return Err(CryptoError::Provider(format!(
                "identifier {} already bound to {}, refusing {}",
                id, existing, spec
            )));
        }
        if let Some(existing) = self.by_spec.get(&spec) {
            return Err(CryptoError::Provider(format!(
                "spec {} already bound to {}, refusing {}",
                spec, existing, id
            )));
        }
        self.by_id.insert(id.clone(), spec);
        self.by_spec.insert(spec, id);
        Ok(())
    }

    pub fn identifier_for(&self, spec: impl Into<AlgorithmSpec>) -> Result<&AlgorithmIdentifier> {
        let spec = spec.into();
        self.by_spec
            .get(&spec)
            .ok_or_else(|| CryptoError::UnknownSpec(spec.to_string()))
    }

    pub fn spec_for(&self, id: &AlgorithmIdentifier) -> Result<AlgorithmSpec> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| CryptoError::UnknownIdentifier(id.to_string()))
    }

    /// Like [`Self::spec_for`] but only accepts block cipher specs.
    pub fn cipher_spec_for(&self, id: &AlgorithmIdentifier) -> Result<CipherSpec> {
        match self.spec_for(id)? {
            AlgorithmSpec::Cipher(spec) => Ok(spec),
            _ => Err(CryptoError::UnknownIdentifier(id.to_string())),
        }
    }

    pub fn contains(&self, id: &AlgorithmIdentifier) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AlgorithmIdentifier, &AlgorithmSpec)> {
        self.by_id.iter()
    }
}

fn is_supported(validator: &SpecValidator, spec: &AlgorithmSpec) -> bool {
    match spec {
        AlgorithmSpec::Cipher(s) => validator.is_valid_cipher_spec(s),
        AlgorithmSpec::Stream(s) => validator.is_valid_stream_spec(s),
        AlgorithmSpec::Agreement(s) => validator.is_valid_agreement_spec(s),
    }
}

/// Every spec the validator accepts, in enumeration order.
pub fn supported_space(validator: &SpecValidator) -> Vec<AlgorithmSpec> {
    let mut specs = Vec::new();

    for key_length in Length::ALL {
        for key_spec in SymKeySpec::all_for_key_length(key_length) {
            if !validator.is_valid_sym_key_spec(&key_spec) {
                continue;
            }
            for mode in CipherMode::ALL {
                let paddings: &[Padding] = if mode.has_padding() {
                    &Padding::ALL
                } else {
                    &[Padding::None]
                };
                for &padding in paddings {
                    let spec = CipherSpec::new(key_spec, mode, padding);
                    if validator.is_valid_cipher_spec(&spec) {
                        specs.push(spec.into());
                    }
                }
            }
        }
    }

    for key_type in StreamKeyType::ALL {
        for &key_length in key_type.key_lengths() {
            for aead in [false, true] {
                let spec = StreamCipherSpec::new(key_type, key_length, aead);
                if validator.is_valid_stream_spec(&spec) {
                    specs.push(spec.into());
                }
            }
        }
    }

    for key_pair in KeyPairType::ALL {
        for kind in AgreementKind::ALL {
            let spec = AgreementSpec::new(key_pair, kind);
            if validator.is_valid_agreement_spec(&spec) {
                specs.push(spec.into());
            }
        }
    }

    specs
}
