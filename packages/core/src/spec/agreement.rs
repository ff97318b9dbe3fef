//! Key pair and key agreement specs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic family of a key pair. Agreements only combine keys of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyPairFamily {
    Montgomery,
    Edwards,
    Weierstrass,
    FiniteField,
    Lattice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyPairType {
    X25519 = 0,
    X448 = 1,
    Ed25519 = 2,
    EcP256 = 3,
    EcP384 = 4,
    Dh2048 = 5,
    Kyber512 = 6,
    Kyber768 = 7,
    Kyber1024 = 8,
}

impl KeyPairType {
    pub const ALL: [KeyPairType; 9] = [
        KeyPairType::X25519,
        KeyPairType::X448,
        KeyPairType::Ed25519,
        KeyPairType::EcP256,
        KeyPairType::EcP384,
        KeyPairType::Dh2048,
        KeyPairType::Kyber512,
        KeyPairType::Kyber768,
        KeyPairType::Kyber1024,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<KeyPairType> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyPairType::X25519 => "X25519",
            KeyPairType::X448 => "X448",
            KeyPairType::Ed25519 => "ED25519",
            KeyPairType::EcP256 => "EC-P256",
            KeyPairType::EcP384 => "EC-P384",
            KeyPairType::Dh2048 => "DH-2048",
            KeyPairType::Kyber512 => "KYBER512",
            KeyPairType::Kyber768 => "KYBER768",
            KeyPairType::Kyber1024 => "KYBER1024",
        }
    }

    pub fn family(self) -> KeyPairFamily {
        match self {
            KeyPairType::X25519 | KeyPairType::X448 => KeyPairFamily::Montgomery,
            KeyPairType::Ed25519 => KeyPairFamily::Edwards,
            KeyPairType::EcP256 | KeyPairType::EcP384 => KeyPairFamily::Weierstrass,
            KeyPairType::Dh2048 => KeyPairFamily::FiniteField,
            KeyPairType::Kyber512 | KeyPairType::Kyber768 | KeyPairType::Kyber1024 => {
                KeyPairFamily::Lattice
            }
        }
    }

    /// Usable as a KEM (lattice KEMs, and Montgomery curves as DH-KEMs).
    pub fn supports_kem(self) -> bool {
        matches!(
            self.family(),
            KeyPairFamily::Lattice | KeyPairFamily::Montgomery
        )
    }

    pub fn supports_dh(self) -> bool {
        matches!(
            self.family(),
            KeyPairFamily::Montgomery | KeyPairFamily::Weierstrass | KeyPairFamily::FiniteField
        )
    }

    pub fn supports_mqv(self) -> bool {
        matches!(
            self.family(),
            KeyPairFamily::Weierstrass | KeyPairFamily::FiniteField
        )
    }

    pub fn supports_signature(self) -> bool {
        self.family() == KeyPairFamily::Edwards
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgreementKind {
    Anon = 0,
    Basic = 1,
    Signed = 2,
    Mqv = 3,
    Unified = 4,
    Kem = 5,
}

impl AgreementKind {
    pub const ALL: [AgreementKind; 6] = [
        AgreementKind::Anon,
        AgreementKind::Basic,
        AgreementKind::Signed,
        AgreementKind::Mqv,
        AgreementKind::Unified,
        AgreementKind::Kem,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<AgreementKind> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            AgreementKind::Anon => "ANON",
            AgreementKind::Basic => "BASIC",
            AgreementKind::Signed => "SIGNED",
            AgreementKind::Mqv => "MQV",
            AgreementKind::Unified => "UNIFIED",
            AgreementKind::Kem => "KEM",
        }
    }

    /// Kinds where the responder answers with a server hello.
    pub fn is_two_pass(self) -> bool {
        matches!(
            self,
            AgreementKind::Signed | AgreementKind::Mqv | AgreementKind::Unified
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgreementSpec {
    pub key_pair: KeyPairType,
    pub kind: AgreementKind,
}

impl AgreementSpec {
    pub fn new(key_pair: KeyPairType, kind: AgreementKind) -> Self {
        Self { key_pair, kind }
    }

    pub fn kem(key_pair: KeyPairType) -> Self {
        Self::new(key_pair, AgreementKind::Kem)
    }
}

impl fmt::Display for AgreementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key_pair.name(), self.kind.name())
    }
}
