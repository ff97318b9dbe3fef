//! Password-based encryption specs.

use super::CipherSpec;
use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DigestType {
    Sha2_256 = 0,
    Sha2_384 = 1,
    Sha2_512 = 2,
    Sha3_256 = 3,
    Sha3_512 = 4,
    Blake2b512 = 5,
    Sm3 = 6,
}

impl DigestType {
    pub fn name(self) -> &'static str {
        match self {
            DigestType::Sha2_256 => "SHA2-256",
            DigestType::Sha2_384 => "SHA2-384",
            DigestType::Sha2_512 => "SHA2-512",
            DigestType::Sha3_256 => "SHA3-256",
            DigestType::Sha3_512 => "SHA3-512",
            DigestType::Blake2b512 => "BLAKE2B-512",
            DigestType::Sm3 => "SM3",
        }
    }
}

/// Digest plus iteration count used to stretch a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PbeSpec {
    pub digest: DigestType,
    pub iterations: u32,
}

impl PbeSpec {
    pub fn new(digest: DigestType, iterations: u32) -> Self {
        Self { digest, iterations }
    }

    /// SHA2-512 with the configured iteration count.
    pub fn pbkdf2() -> Self {
        Self::new(DigestType::Sha2_512, Config::global().pbe_iterations)
    }
}

/// A PBE spec composed with the cipher the derived key is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PbeCipherSpec {
    pub pbe: PbeSpec,
    pub cipher: CipherSpec,
}

impl PbeCipherSpec {
    pub fn new(pbe: PbeSpec, cipher: CipherSpec) -> Self {
        Self { pbe, cipher }
    }
}

impl fmt::Display for PbeCipherSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PBKDF2-{}x{}-{}",
            self.pbe.digest.name(),
            self.pbe.iterations,
            self.cipher
        )
    }
}
